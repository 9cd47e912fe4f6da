pub mod error_boundary;
pub mod data_table;
