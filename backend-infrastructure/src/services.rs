pub mod alert_sink;
pub mod health_service;
pub mod scan_scheduler;

pub use alert_sink::*;
pub use health_service::*;
pub use scan_scheduler::*;
