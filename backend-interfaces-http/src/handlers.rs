pub mod alert_handlers;
pub mod ops_handlers;
pub mod rules_handlers;
pub mod scan_handlers;

pub use alert_handlers::*;
pub use ops_handlers::*;
pub use rules_handlers::*;
pub use scan_handlers::*;
