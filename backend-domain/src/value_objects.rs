// Domain value objects
pub mod alert_category;
pub mod alert_status;
pub mod identifiers;
pub mod risk_level;
pub mod roles;
pub mod service_category;
pub mod transaction_status;

pub use alert_category::*;
pub use alert_status::*;
pub use identifiers::*;
pub use risk_level::*;
pub use roles::*;
pub use service_category::*;
pub use transaction_status::*;
