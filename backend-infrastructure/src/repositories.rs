pub mod alert_files;
pub mod config_files;
pub mod document_store;
pub mod snapshot_files;

pub use alert_files::*;
pub use config_files::*;
pub use document_store::*;
pub use snapshot_files::*;
