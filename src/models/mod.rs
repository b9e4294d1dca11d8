pub mod config;
pub mod reading;
pub mod run_report;
