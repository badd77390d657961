//! Concrete adapter implementations for ports.

pub mod csv_data_adapter;
pub mod file_config_adapter;
pub mod weekday_calendar_adapter;
pub mod text_report_adapter;
