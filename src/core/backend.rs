//! Mirroring log records to an external monitoring backend
//!
//! A backend is attached by wrapping the engine's core in a [`MirrorCore`]:
//! every entry the inner core writes is also handed to the backend.

use super::{
    engine::Core,
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::fmt;
use std::sync::Arc;

/// An external monitoring service receiving a copy of every record.
///
/// # Example
///
/// ```
/// use rust_context_logger::core::{LogEntry, MonitoringBackend, Result};
///
/// struct StdoutMonitor;
///
/// impl MonitoringBackend for StdoutMonitor {
///     fn name(&self) -> &str {
///         "stdout-monitor"
///     }
///
///     fn forward(&self, entry: &LogEntry) -> Result<()> {
///         println!("monitor: {}", entry.message);
///         Ok(())
///     }
/// }
/// ```
pub trait MonitoringBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Called once while the logger is built; an error aborts construction
    fn attach(&self) -> Result<()> {
        Ok(())
    }

    fn forward(&self, entry: &LogEntry) -> Result<()>;
}

/// Core wrapper mirroring written entries to a [`MonitoringBackend`]
pub struct MirrorCore {
    inner: Arc<dyn Core>,
    backend: Arc<dyn MonitoringBackend>,
    metrics: Arc<LoggerMetrics>,
}

impl MirrorCore {
    /// Attach `backend` and wrap `inner`
    pub fn wrap(
        inner: Arc<dyn Core>,
        backend: Arc<dyn MonitoringBackend>,
        metrics: Arc<LoggerMetrics>,
    ) -> Result<Arc<dyn Core>> {
        backend.attach()?;
        Ok(Arc::new(Self {
            inner,
            backend,
            metrics,
        }))
    }
}

impl Core for MirrorCore {
    fn enabled(&self, level: LogLevel) -> bool {
        self.inner.enabled(level)
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        let written = self.inner.write(entry);

        match self.backend.forward(entry) {
            Ok(()) => {
                self.metrics.record_forwarded();
            }
            Err(e) => {
                self.metrics.record_forward_failed();
                self.inner.report(&format!(
                    "[LOGGER ERROR] forward to '{}' failed: {}",
                    self.backend.name(),
                    e
                ));
            }
        }

        written
    }

    fn sync(&self) -> Result<()> {
        self.inner.sync()
    }

    fn report(&self, message: &str) {
        self.inner.report(message)
    }
}

/// Backend handing records to a bounded queue drained by a harvester.
///
/// Forwarding never blocks: when the queue is full the record is rejected
/// and reported as a forward failure.
///
/// # Example
///
/// ```
/// use rust_context_logger::core::ChannelBackend;
///
/// let (backend, receiver) = ChannelBackend::bounded("harvester", 1024);
/// std::thread::spawn(move || {
///     for entry in receiver {
///         // ship entry to the monitoring service
///         let _ = entry;
///     }
/// });
/// # drop(backend);
/// ```
pub struct ChannelBackend {
    name: String,
    sender: Sender<LogEntry>,
}

impl ChannelBackend {
    pub fn bounded(name: impl Into<String>, capacity: usize) -> (Self, Receiver<LogEntry>) {
        let (sender, receiver) = bounded(capacity);
        let backend = Self {
            name: name.into(),
            sender,
        };
        (backend, receiver)
    }

    /// Number of records waiting for the harvester
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

impl MonitoringBackend for ChannelBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&self) -> Result<()> {
        if self.sender.capacity() == Some(0) {
            return Err(LoggerError::backend_attach(
                &self.name,
                "queue capacity must be greater than zero",
            ));
        }
        Ok(())
    }

    fn forward(&self, entry: &LogEntry) -> Result<()> {
        match self.sender.try_send(entry.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(LoggerError::backend_forward(
                &self.name,
                format!("queue full ({} pending)", self.sender.len()),
            )),
            Err(TrySendError::Disconnected(_)) => {
                Err(LoggerError::backend_forward(&self.name, "harvester disconnected"))
            }
        }
    }
}

impl fmt::Debug for ChannelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelBackend")
            .field("name", &self.name)
            .field("pending", &self.pending())
            .finish()
    }
}
