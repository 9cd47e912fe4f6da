//! API handlers behind the frontend server functions.

pub mod logs;
