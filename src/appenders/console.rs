//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::Write;

/// Standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

pub struct ConsoleAppender {
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn stdout() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &str) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}", record)?;
            }
            ConsoleTarget::Stderr => {
                let mut err = std::io::stderr().lock();
                writeln!(err, "{}", record)?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        assert_eq!(ConsoleAppender::default().target(), ConsoleTarget::Stdout);
        assert_eq!(ConsoleAppender::stderr().target(), ConsoleTarget::Stderr);
        assert_eq!(ConsoleAppender::stderr().name(), "stderr");
    }

    #[test]
    fn test_append_and_flush() {
        let mut appender = ConsoleAppender::stdout();
        assert!(appender.append("console appender test line").is_ok());
        assert!(appender.flush().is_ok());
    }
}
