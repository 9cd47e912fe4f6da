//! Server side of the log explorer: ClickHouse queries behind the server functions.

pub mod api;
pub mod config;
pub mod db_utils;
pub mod server_extra;
