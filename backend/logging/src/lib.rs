//! Structured logging for patente.
//!
//! Handles subscriber setup (console plus optional rolling NDJSON file) and
//! scrubbing of credentials from strings before they are logged.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use tracing_appender::non_blocking::WorkerGuard;
pub use redact::redact_secrets;
