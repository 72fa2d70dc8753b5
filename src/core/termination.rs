//! Explicit termination signal returned by panic and fatal emissions

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationKind {
    /// Unwind the current thread
    Panic,
    /// Exit the process with status 1
    Fatal,
}

/// The entry has been recorded; the caller now decides how to stop.
///
/// Nothing happens until one of [`raise`], [`exit`] or [`execute`] is
/// called, so tests can inspect panic and fatal paths without unwinding or
/// ending the test process.
///
/// [`raise`]: Termination::raise
/// [`exit`]: Termination::exit
/// [`execute`]: Termination::execute
#[must_use = "a Termination does nothing unless raised, exited or executed"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    kind: TerminationKind,
    message: String,
}

impl Termination {
    pub const EXIT_CODE: i32 = 1;

    pub(crate) fn new(kind: TerminationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> TerminationKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Panic with the logged message
    pub fn raise(self) -> ! {
        panic!("{}", self.message)
    }

    /// Terminate the process with [`Termination::EXIT_CODE`]
    pub fn exit(self) -> ! {
        std::process::exit(Self::EXIT_CODE)
    }

    /// Raise for `Panic`, exit for `Fatal`
    pub fn execute(self) -> ! {
        match self.kind {
            TerminationKind::Panic => self.raise(),
            TerminationKind::Fatal => self.exit(),
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TerminationKind::Panic => "panic",
            TerminationKind::Fatal => "fatal",
        };
        write!(f, "{}: {}", kind, self.message)
    }
}
