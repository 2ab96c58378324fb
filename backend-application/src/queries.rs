pub mod alert_queries;
pub mod detection_config_queries;
pub mod scan_status_queries;
