//! Database client helpers.

pub mod clickhouse_utils;
