//! Logging engine: level filtering, encoding and output

use super::{
    appender::Appender,
    encoding::{EncoderConfig, Encoding},
    error::{LoggerError, Result},
    field::Field,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    preset::EngineConfig,
};
use parking_lot::Mutex;
use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::Arc;

/// The part of the engine that decides whether an entry is wanted and
/// where it goes. Cores can be wrapped to add behavior to every write.
pub trait Core: Send + Sync {
    fn enabled(&self, level: LogLevel) -> bool;

    fn write(&self, entry: &LogEntry) -> Result<()>;

    fn sync(&self) -> Result<()>;

    /// Report an internal problem on the error outputs
    fn report(&self, message: &str);
}

/// Core writing encoded entries to a set of appenders
pub struct IoCore {
    min_level: LogLevel,
    encoding: Encoding,
    encoder: EncoderConfig,
    outputs: Mutex<Vec<Box<dyn Appender>>>,
    error_outputs: Mutex<Vec<Box<dyn Appender>>>,
    metrics: Arc<LoggerMetrics>,
}

impl IoCore {
    pub fn new(
        min_level: LogLevel,
        encoding: Encoding,
        encoder: EncoderConfig,
        outputs: Vec<Box<dyn Appender>>,
        error_outputs: Vec<Box<dyn Appender>>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            min_level,
            encoding,
            encoder,
            outputs: Mutex::new(outputs),
            error_outputs: Mutex::new(error_outputs),
            metrics,
        }
    }

    fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
        if let Some(s) = panic_info.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        }
    }
}

impl Core for IoCore {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write to every output with per-appender panic isolation, so one
    /// failing destination does not starve the others.
    fn write(&self, entry: &LogEntry) -> Result<()> {
        let record = self.encoding.encode(entry, &self.encoder);
        let mut failures = Vec::new();

        {
            let mut outputs = self.outputs.lock();
            for appender in outputs.iter_mut() {
                let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    appender.append(&record)
                }));

                match append_result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => failures.push(format!("{}: {}", appender.name(), e)),
                    Err(panic_info) => failures.push(format!(
                        "{} panicked: {}",
                        appender.name(),
                        Self::panic_message(panic_info.as_ref())
                    )),
                }
            }
        }

        if failures.is_empty() {
            self.metrics.record_written();
            return Ok(());
        }

        self.metrics.record_failed();
        let message = failures.join("; ");
        self.report(&format!("[LOGGER ERROR] write failed: {}", message));
        Err(LoggerError::writer(message))
    }

    fn sync(&self) -> Result<()> {
        let mut first_error = None;

        for appender in self.outputs.lock().iter_mut() {
            if let Err(e) = appender.flush() {
                first_error.get_or_insert(e);
            }
        }
        for appender in self.error_outputs.lock().iter_mut() {
            if let Err(e) = appender.flush() {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn report(&self, message: &str) {
        let mut error_outputs = self.error_outputs.lock();
        if error_outputs.is_empty() {
            eprintln!("{}", message);
            return;
        }

        for appender in error_outputs.iter_mut() {
            if appender.append(message).and_then(|_| appender.flush()).is_err() {
                eprintln!("{}", message);
            }
        }
    }
}

/// A configured logging engine.
///
/// Cloning is cheap; clones share the core. Child engines created with
/// [`Engine::with`] or [`Engine::named`] share the core but carry their own
/// bound fields and name.
#[derive(Clone)]
pub struct Engine {
    core: Arc<dyn Core>,
    config: Arc<EngineConfig>,
    metrics: Arc<LoggerMetrics>,
    name: Option<String>,
    fields: Arc<Vec<Field>>,
}

impl Engine {
    pub fn new(core: Arc<dyn Core>, config: Arc<EngineConfig>, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            name: config.name.clone(),
            fields: Arc::new(config.initial_fields.clone()),
            core,
            config,
            metrics,
        }
    }

    /// Replace the core with a wrapped version of itself
    pub fn wrap_core<F>(self, wrap: F) -> Result<Self>
    where
        F: FnOnce(Arc<dyn Core>) -> Result<Arc<dyn Core>>,
    {
        let core = wrap(Arc::clone(&self.core))?;
        Ok(Self { core, ..self })
    }

    pub fn core(&self) -> &Arc<dyn Core> {
        &self.core
    }

    /// The configuration this engine was built from
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub(crate) fn metrics_handle(&self) -> Arc<LoggerMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields bound to this engine, written before any per-call field
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.enabled(level)
    }

    /// Child engine carrying `fields` after the ones already bound
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Self {
        if fields.is_empty() {
            return self.clone();
        }

        let mut bound = Vec::with_capacity(self.fields.len() + fields.len());
        bound.extend_from_slice(&self.fields);
        bound.extend_from_slice(fields);

        Self {
            fields: Arc::new(bound),
            ..self.clone()
        }
    }

    /// Child engine whose name has `segment` appended, dot separated
    #[must_use]
    pub fn named(&self, segment: &str) -> Self {
        if segment.is_empty() {
            return self.clone();
        }

        let name = match &self.name {
            Some(parent) => format!("{}.{}", parent, segment),
            None => segment.to_string(),
        };

        Self {
            name: Some(name),
            ..self.clone()
        }
    }

    /// Emit `message` at `level` with `fields` after the bound ones.
    ///
    /// Returns whether the entry passed the level filter.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: &str, fields: &[Field]) -> bool {
        self.log_at(level, message, fields.to_vec(), Location::caller())
    }

    pub(crate) fn log_at(
        &self,
        level: LogLevel,
        message: &str,
        fields: Vec<Field>,
        location: &Location<'_>,
    ) -> bool {
        if !self.core.enabled(level) {
            self.metrics.record_filtered();
            return false;
        }

        let mut all_fields = Vec::with_capacity(self.fields.len() + fields.len());
        all_fields.extend_from_slice(&self.fields);
        all_fields.extend(fields);

        let mut entry = LogEntry::new(level, message)
            .with_logger_name(self.name.clone())
            .with_fields(all_fields);

        if !self.config.disable_caller {
            entry = entry.with_caller(Caller::from_location(location));
        }

        if !self.config.disable_stacktrace && level >= self.config.stacktrace_level {
            entry = entry.with_stacktrace(Backtrace::force_capture().to_string());
        }

        // Failures were already reported on the error outputs
        let _ = self.core.write(&entry);
        true
    }

    /// Flush every output
    pub fn sync(&self) -> Result<()> {
        self.core.sync()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("level", &self.config.level)
            .field("encoding", &self.config.encoding)
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn append(&mut self, _record: &str) -> Result<()> {
            Err(LoggerError::writer("disk full"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn append(&mut self, _record: &str) -> Result<()> {
            panic!("appender exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[derive(Clone, Default)]
    struct MemoryAppender {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Appender for MemoryAppender {
        fn append(&mut self, record: &str) -> Result<()> {
            self.lines.lock().push(record.to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    fn engine_with(
        outputs: Vec<Box<dyn Appender>>,
        errors: MemoryAppender,
        config: EngineConfig,
    ) -> Engine {
        let metrics = Arc::new(LoggerMetrics::new());
        let core = IoCore::new(
            config.level,
            config.encoding,
            config.encoder.clone(),
            outputs,
            vec![Box::new(errors)],
            Arc::clone(&metrics),
        );
        Engine::new(Arc::new(core), Arc::new(config), metrics)
    }

    fn json_config(level: LogLevel) -> EngineConfig {
        let mut config = EngineConfig::production();
        config.level = level;
        config
    }

    #[test]
    fn test_level_filtering() {
        let out = MemoryAppender::default();
        let engine = engine_with(
            vec![Box::new(out.clone())],
            MemoryAppender::default(),
            json_config(LogLevel::Warn),
        );

        assert!(!engine.log(LogLevel::Info, "hidden", &[]));
        assert!(engine.log(LogLevel::Error, "shown", &[]));

        assert_eq!(out.lines.lock().len(), 1);
        assert_eq!(engine.metrics().filtered_count(), 1);
        assert_eq!(engine.metrics().written_count(), 1);
    }

    #[test]
    fn test_failing_appender_isolated() {
        let out = MemoryAppender::default();
        let errors = MemoryAppender::default();
        let engine = engine_with(
            vec![Box::new(FailingAppender), Box::new(PanickingAppender), Box::new(out.clone())],
            errors.clone(),
            json_config(LogLevel::Info),
        );

        engine.log(LogLevel::Info, "still delivered", &[]);

        assert_eq!(out.lines.lock().len(), 1);
        assert_eq!(engine.metrics().failed_count(), 1);
        assert_eq!(engine.metrics().failure_rate(), 100.0);

        let reported = errors.lines.lock();
        assert_eq!(reported.len(), 1);
        assert!(reported[0].starts_with("[LOGGER ERROR]"));
        assert!(reported[0].contains("disk full"));
        assert!(reported[0].contains("appender exploded"));
    }

    #[test]
    fn test_with_and_named_do_not_mutate_parent() {
        let out = MemoryAppender::default();
        let engine = engine_with(
            vec![Box::new(out.clone())],
            MemoryAppender::default(),
            json_config(LogLevel::Debug),
        );

        let child = engine.with(&[Field::new("component", "db")]).named("store");
        let grandchild = child.named("pool");

        assert!(engine.fields().is_empty());
        assert_eq!(engine.name(), None);
        assert_eq!(child.fields().len(), 1);
        assert_eq!(grandchild.name(), Some("store.pool"));

        grandchild.log(LogLevel::Info, "checked out", &[Field::new("conn", 3)]);
        let line = out.lines.lock()[0].clone();
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["component"], "db");
        assert_eq!(parsed["conn"], 3);
        assert_eq!(parsed["logger"], "store.pool");
    }

    #[test]
    fn test_caller_and_stacktrace_toggles() {
        let out = MemoryAppender::default();
        let mut config = json_config(LogLevel::Debug);
        config.disable_caller = false;
        config.disable_stacktrace = false;
        config.stacktrace_level = LogLevel::Error;

        let engine = engine_with(vec![Box::new(out.clone())], MemoryAppender::default(), config);
        engine.log(LogLevel::Info, "no stack", &[]);
        engine.log(LogLevel::Error, "with stack", &[]);

        let lines = out.lines.lock();
        let info: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let error: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();

        assert!(info["caller"].as_str().unwrap().contains("engine.rs"));
        assert!(info.get("stack_trace").is_none());
        assert!(error["stack_trace"].is_string());
    }
}
