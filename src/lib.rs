//! # Rust Context Logger
//!
//! A structured, leveled logging facade that enriches every record with
//! request-scoped metadata carried in a [`RequestContext`].
//!
//! ## Features
//!
//! - **Context Extraction**: registered context keys are copied from the request
//!   context into each record, in registry order
//! - **Named Configuration**: options applied in order over sensible defaults,
//!   resolved onto development or production presets
//! - **Multiple Outputs**: stdout, stderr and files, with a separate error channel
//! - **Monitoring Mirror**: every written record can be forwarded to an external backend
//!
//! ## Example
//!
//! ```
//! use rust_context_logger::prelude::*;
//!
//! let logger = Logger::new([
//!     LoggerOption::Level("debug".to_string()),
//!     LoggerOption::AppMode(AppMode::Production),
//! ])
//! .unwrap();
//!
//! let ctx = RequestContext::new().with_value(ContextKey::REQUEST_ID, "req-7".to_string());
//! logger.info(Some(&ctx), "order placed", &[Field::new("items", 3)]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender};
    pub use crate::core::{
        AppMode, Appender, ChannelBackend, Config, ContextKey, ContextKeyRegistry, Encoding,
        Engine, EngineConfig, Field, FieldValue, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, LoggerOption, MonitoringBackend, RequestContext, Result,
        StructuredLogger, Termination, TerminationKind, TimestampFormat,
    };
}

pub use crate::appenders::{ConsoleAppender, FileAppender};
pub use crate::core::{
    AppMode, Appender, ChannelBackend, Config, ContextKey, ContextKeyRegistry, Encoding, Engine,
    EngineConfig, Field, FieldValue, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, LoggerOption, LoggingField, MonitoringBackend, RequestContext, Result,
    StructuredLogger, Termination, TerminationKind, TimestampFormat,
};
