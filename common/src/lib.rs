//! Common library exports shared between frontend and backend.

extern crate serde;


pub mod filter_field;
pub mod column_filters;
pub mod filter_codec;
pub mod query_string;
pub mod search_params;
pub mod table_state;
pub mod facets;
pub mod slider;
pub mod entitlement;
pub mod debounce;
pub mod command;
pub mod storage;
pub mod recent_searches;
pub mod logs;
pub mod search_const;
