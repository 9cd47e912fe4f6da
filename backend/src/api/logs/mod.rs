//! Log table API: rows, facets and plan entitlement.

mod fetch_logs;
pub use fetch_logs::fetch_logs;

mod facet_counts;
pub use facet_counts::facet_counts;

mod entitlement;
pub use entitlement::plan_entitlement;

pub mod logs_sql;
