// Pure detection services: no I/O, no clocks of their own

pub mod aggregator;
pub mod alert_store;
pub mod lifecycle;
pub mod rule_evaluator;

pub use aggregator::*;
pub use alert_store::*;
pub use rule_evaluator::*;
