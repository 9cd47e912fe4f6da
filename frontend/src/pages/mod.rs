pub mod logs_page;
