pub mod alert_commands;
pub mod detection_config_commands;
pub mod scan_commands;
