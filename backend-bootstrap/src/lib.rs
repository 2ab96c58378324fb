pub mod context;
pub mod lifecycle;
pub mod logging;

pub use lifecycle::{run_scan_once, run_standalone};
