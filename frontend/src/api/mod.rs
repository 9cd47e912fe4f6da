pub mod logs_api;
