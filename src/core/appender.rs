//! Appender trait for log output destinations

use super::error::Result;

/// An output destination receiving already encoded records.
///
/// Appenders are owned by the engine and serialized behind its lock, so
/// implementations need no internal synchronization.
pub trait Appender: Send + Sync {
    /// Write one encoded record; the appender adds the line terminator
    fn append(&mut self, record: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
