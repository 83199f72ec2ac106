//! Structured logging for the playground runtime.
//!
//! Console plus rolling NDJSON file output, and redaction of credentials that
//! travel in request URLs.

pub mod logger;
pub mod redact;

pub use logger::{init_console_logger, init_logger};
pub use redact::redact_sensitive_data;
