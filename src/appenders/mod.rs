//! Appender implementations

pub mod console;
pub mod file;

pub use console::{ConsoleAppender, ConsoleTarget};
pub use file::FileAppender;

pub use crate::core::Appender;

use crate::core::Result;

/// Open the appender named by an output path.
///
/// `"stdout"` and `"stderr"` select the standard streams; anything else is a
/// file path, with an optional `file://` prefix.
pub fn open(path: &str) -> Result<Box<dyn Appender>> {
    match path {
        "stdout" => Ok(Box::new(ConsoleAppender::stdout())),
        "stderr" => Ok(Box::new(ConsoleAppender::stderr())),
        other => {
            let file_path = other.strip_prefix("file://").unwrap_or(other);
            Ok(Box::new(FileAppender::new(file_path)?))
        }
    }
}
