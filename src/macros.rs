//! Logging macros with `format!` style messages.
//!
//! Each macro takes the logger, an `Option<&RequestContext>` and the format
//! arguments. Structured fields can be given before the message with
//! `fields: [...];`.
//!
//! # Examples
//!
//! ```
//! use rust_context_logger::prelude::*;
//! use rust_context_logger::{error, info};
//!
//! let logger = Logger::builder().build().unwrap();
//! let ctx = RequestContext::new().with_value(ContextKey::USER_ID, "u-1".to_string());
//!
//! info!(logger, Some(&ctx), "Server listening on port {}", 8080);
//! error!(logger, None, fields: [Field::new("code", 500)]; "upstream failed: {}", "timeout");
//! ```

/// Log at an explicit level.
///
/// Only the emitting levels are accepted: panic and fatal return a
/// [`Termination`](crate::Termination) and are called directly.
///
/// ```
/// # use rust_context_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_context_logger::log;
/// log!(logger, warn, None, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $method:ident, $ctx:expr, fields: [$($field:expr),* $(,)?]; $($arg:tt)+) => {
        $crate::StructuredLogger::$method(&$logger, $ctx, &format!($($arg)+), &[$($field),*])
    };
    ($logger:expr, $method:ident, $ctx:expr, $($arg:tt)+) => {
        $crate::StructuredLogger::$method(&$logger, $ctx, &format!($($arg)+), &[])
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_context_logger::prelude::*;
/// # let logger = Logger::new([LoggerOption::Level("debug".into())]).unwrap();
/// use rust_context_logger::debug;
/// debug!(logger, None, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, debug, $ctx, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, info, $ctx, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, warn, $ctx, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, error, $ctx, $($arg)+)
    };
}
