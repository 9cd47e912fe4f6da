//! Extra HTTP routes served next to the server functions.

mod export_logs;
pub use export_logs::export_logs;
