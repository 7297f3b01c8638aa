pub mod alert;
pub mod metric;
pub mod monitor;
pub mod rolling_window;
pub mod source;
pub mod types;
