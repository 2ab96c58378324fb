// Domain entities

pub mod aggregate;
pub mod alert;
pub mod detection_config;
pub mod evidence;
pub mod identity;
pub mod query;
pub mod runtime_config;
pub mod scan;
pub mod support_message;
pub mod transaction;

pub use aggregate::*;
pub use alert::*;
pub use detection_config::*;
pub use evidence::*;
pub use identity::*;
pub use query::*;
pub use runtime_config::*;
pub use scan::*;
pub use support_message::*;
pub use transaction::*;
