//! Service layer
//!
//! Services wrap the infrastructure the terminal itself stays free of.

pub mod logging;

pub use logging::{LogEntry, LogEvent, LoggingService};
