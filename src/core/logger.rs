//! Logger facade: context extraction in front of the engine

use super::{
    app_mode::AppMode,
    backend::MonitoringBackend,
    config::{Config, LoggerOption},
    context::{ContextKeyRegistry, RequestContext},
    encoding::Encoding,
    engine::Engine,
    error::Result,
    field::Field,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    preset::EngineConfig,
    termination::{Termination, TerminationKind},
    timestamp::TimestampFormat,
};
use std::panic::Location;
use std::sync::Arc;

/// Leveled, context-aware structured logging.
///
/// Every emission takes the request context (if any), extracts the
/// registered context keys from it and writes them before `fields`.
pub trait StructuredLogger {
    fn debug(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]);

    fn info(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]);

    fn warn(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]);

    fn error(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]);

    /// Record at panic level; unwinding is up to the caller
    fn panic(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) -> Termination;

    /// Record at fatal level and flush; exiting is up to the caller
    fn fatal(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) -> Termination;

    /// Child logger carrying `fields` on every emission
    fn with(&self, fields: &[Field]) -> Self
    where
        Self: Sized;

    fn raw(&self) -> &Engine;
}

/// The logger.
///
/// Cheap to clone; clones and children share the engine core, the outputs
/// and the context key registry.
///
/// # Example
///
/// ```
/// use rust_context_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level("debug")
///     .app_mode("production")
///     .build()
///     .unwrap();
///
/// let ctx = RequestContext::new().with_value(ContextKey::TRACE_ID, "abc123".to_string());
/// logger.info(Some(&ctx), "request handled", &[Field::new("status", 200)]);
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    engine: Engine,
    registry: ContextKeyRegistry,
    config: Arc<Config>,
}

impl Logger {
    /// Build a logger from `options` applied in order over the defaults
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = LoggerOption>,
    {
        super::config::resolve_options(options).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(crate) fn from_parts(engine: Engine, config: Config) -> Self {
        Self {
            engine,
            registry: config.context_keys.clone(),
            config: Arc::new(config),
        }
    }

    /// Child logger with `segment` appended to its name
    #[must_use]
    pub fn named(&self, segment: &str) -> Self {
        Self {
            engine: self.engine.named(segment),
            ..self.clone()
        }
    }

    /// Flush every output
    pub fn sync(&self) -> Result<()> {
        self.engine.sync()
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.engine.enabled(level)
    }

    pub fn level(&self) -> LogLevel {
        self.engine.config().level
    }

    /// The settings this logger was built from
    pub fn effective_config(&self) -> &Config {
        &self.config
    }

    /// The resolved engine settings, preset included
    pub fn engine_config(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// Counters shared by this logger and its children. `failure_rate`
    /// reports the share of records that hit a failing output.
    pub fn metrics(&self) -> &LoggerMetrics {
        self.engine.metrics()
    }

    /// Registry consulted on every emission; appends are visible immediately
    pub fn context_keys(&self) -> &ContextKeyRegistry {
        &self.registry
    }

    fn emit(
        &self,
        level: LogLevel,
        ctx: Option<&RequestContext>,
        msg: &str,
        fields: &[Field],
        location: &Location<'_>,
    ) -> bool {
        if !self.engine.enabled(level) {
            return self.engine.log_at(level, msg, Vec::new(), location);
        }

        let extracted = self.registry.extract(ctx);
        let mut all_fields = Vec::with_capacity(extracted.len() + fields.len());
        all_fields.extend(
            extracted
                .into_iter()
                .map(|field| Field::string(field.key.as_str(), field.value)),
        );
        all_fields.extend_from_slice(fields);

        self.engine.log_at(level, msg, all_fields, location)
    }
}

impl StructuredLogger for Logger {
    #[track_caller]
    fn debug(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) {
        self.emit(LogLevel::Debug, ctx, msg, fields, Location::caller());
    }

    #[track_caller]
    fn info(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) {
        self.emit(LogLevel::Info, ctx, msg, fields, Location::caller());
    }

    #[track_caller]
    fn warn(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) {
        self.emit(LogLevel::Warn, ctx, msg, fields, Location::caller());
    }

    #[track_caller]
    fn error(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) {
        self.emit(LogLevel::Error, ctx, msg, fields, Location::caller());
    }

    #[track_caller]
    fn panic(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) -> Termination {
        self.emit(LogLevel::Panic, ctx, msg, fields, Location::caller());
        Termination::new(TerminationKind::Panic, msg)
    }

    #[track_caller]
    fn fatal(&self, ctx: Option<&RequestContext>, msg: &str, fields: &[Field]) -> Termination {
        self.emit(LogLevel::Fatal, ctx, msg, fields, Location::caller());
        if let Err(e) = self.engine.sync() {
            self.engine
                .core()
                .report(&format!("[LOGGER ERROR] flush before exit failed: {}", e));
        }
        Termination::new(TerminationKind::Fatal, msg)
    }

    fn with(&self, fields: &[Field]) -> Self {
        Self {
            engine: self.engine.with(fields),
            ..self.clone()
        }
    }

    fn raw(&self) -> &Engine {
        &self.engine
    }
}

/// Fluent construction recording the same option sequence as
/// [`Logger::new`].
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    options: Vec<LoggerOption>,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn option(mut self, option: LoggerOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_config(self) -> Self {
        self.option(LoggerOption::DefaultConfig)
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(self, level: impl AsRef<str>) -> Self {
        self.option(LoggerOption::Level(level.as_ref().to_string()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoding(self, encoding: impl Into<Encoding>) -> Self {
        self.option(LoggerOption::Encoding(encoding.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn app_mode(self, mode: impl Into<AppMode>) -> Self {
        self.option(LoggerOption::AppMode(mode.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn monitoring_backend(self, backend: Arc<dyn MonitoringBackend>) -> Self {
        self.option(LoggerOption::MonitoringBackend(backend))
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_key(self, key: impl Into<String>) -> Self {
        self.option(LoggerOption::TimeKey(key.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_key(self, key: impl Into<String>) -> Self {
        self.option(LoggerOption::LevelKey(key.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn name_key(self, key: impl Into<String>) -> Self {
        self.option(LoggerOption::NameKey(key.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_key(self, key: impl Into<String>) -> Self {
        self.option(LoggerOption::CallerKey(key.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_key(self, key: impl Into<String>) -> Self {
        self.option(LoggerOption::MessageKey(key.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_key(self, key: impl Into<String>) -> Self {
        self.option(LoggerOption::StacktraceKey(key.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_stacktrace(self, disable: bool) -> Self {
        self.option(LoggerOption::DisableStacktrace(disable))
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_caller(self, disable: bool) -> Self {
        self.option(LoggerOption::DisableCaller(disable))
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_paths<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option(LoggerOption::OutputPaths(
            paths.into_iter().map(Into::into).collect(),
        ))
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_output_paths<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option(LoggerOption::ErrorOutputPaths(
            paths.into_iter().map(Into::into).collect(),
        ))
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(self, name: impl Into<String>) -> Self {
        self.option(LoggerOption::Name(name.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn colored_levels(self, colored: bool) -> Self {
        self.option(LoggerOption::ColoredLevels(colored))
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(self, format: TimestampFormat) -> Self {
        self.option(LoggerOption::TimestampFormat(format))
    }

    #[must_use = "builder methods return a new value"]
    pub fn context_keys(self, registry: ContextKeyRegistry) -> Self {
        self.option(LoggerOption::ContextKeys(registry))
    }

    #[must_use = "builder methods return a new value"]
    pub fn initial_fields(self, fields: Vec<Field>) -> Self {
        self.option(LoggerOption::InitialFields(fields))
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(self, config: Config) -> Self {
        self.option(LoggerOption::Config(Box::new(config)))
    }

    pub fn build(self) -> Result<Logger> {
        Logger::new(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContextKey, LogEntry, LoggerError};
    use parking_lot::Mutex;
    use std::path::Path;
    use tempfile::tempdir;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn file_logger(path: &Path, level: &str) -> Logger {
        Logger::builder()
            .level(level)
            .output_paths([path.display().to_string()])
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct RecordingBackend {
        entries: Mutex<Vec<LogEntry>>,
    }

    impl MonitoringBackend for RecordingBackend {
        fn name(&self) -> &str {
            "recording"
        }

        fn forward(&self, entry: &LogEntry) -> Result<()> {
            self.entries.lock().push(entry.clone());
            Ok(())
        }
    }

    struct RejectingBackend;

    impl MonitoringBackend for RejectingBackend {
        fn name(&self) -> &str {
            "rejecting"
        }

        fn attach(&self) -> Result<()> {
            Err(LoggerError::backend_attach("rejecting", "license key missing"))
        }

        fn forward(&self, _entry: &LogEntry) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_context_fields_precede_call_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = file_logger(&path, "info");

        let ctx = RequestContext::new()
            .with_value(ContextKey::REQUEST_ID, "req-1".to_string())
            .with_value(ContextKey::USER_ID, "u-42");
        logger.info(Some(&ctx), "handled", &[Field::new("status", 200)]);
        logger.sync().unwrap();

        let line = std::fs::read_to_string(&path).unwrap();
        let user = line.find("\"user_id\"").unwrap();
        let request = line.find("\"request_id\"").unwrap();
        let status = line.find("\"status\"").unwrap();
        // registry order, then call fields
        assert!(user < request);
        assert!(request < status);
    }

    #[test]
    fn test_level_filtering_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = file_logger(&path, "warning");

        logger.debug(None, "d", &[]);
        logger.info(None, "i", &[]);
        logger.warn(None, "w", &[]);
        logger.error(None, "e", &[]);
        logger.sync().unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["message"], "w");
        assert_eq!(lines[1]["message"], "e");
        assert_eq!(logger.metrics().filtered_count(), 2);
        assert_eq!(logger.metrics().failure_rate(), 0.0);
    }

    #[test]
    fn test_panic_and_fatal_record_without_terminating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = file_logger(&path, "debug");

        let panic = logger.panic(None, "bad state", &[]);
        let fatal = logger.fatal(None, "cannot continue", &[]);

        assert_eq!(panic.kind(), TerminationKind::Panic);
        assert_eq!(fatal.kind(), TerminationKind::Fatal);
        assert_eq!(fatal.message(), "cannot continue");

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["message"], "bad state");
        assert_eq!(lines[1]["message"], "cannot continue");
    }

    #[test]
    fn test_with_leaves_parent_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let parent = file_logger(&path, "info");
        let child = parent.with(&[Field::new("component", "billing")]);
        let grandchild = child.with(&[Field::new("attempt", 2)]);

        parent.info(None, "parent", &[]);
        child.info(None, "child", &[]);
        grandchild.info(None, "grandchild", &[]);
        parent.sync().unwrap();

        let lines = read_lines(&path);
        assert!(lines[0].get("component").is_none());
        assert_eq!(lines[1]["component"], "billing");
        assert_eq!(lines[2]["component"], "billing");
        assert_eq!(lines[2]["attempt"], 2);
    }

    #[test]
    fn test_named_child() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let logger = Logger::builder()
            .name("api")
            .output_paths([path.display().to_string()])
            .build()
            .unwrap();

        logger.info(None, "root", &[]);
        logger.named("auth").info(None, "child", &[]);
        logger.sync().unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines[0]["logger"], "api");
        assert_eq!(lines[1]["logger"], "api.auth");
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            Logger::builder().level("").build(),
            Err(LoggerError::EmptyLevel)
        ));
        assert!(matches!(
            Logger::builder().level("trace").build(),
            Err(LoggerError::InvalidLevel { .. })
        ));
        assert!(matches!(
            Logger::builder().app_mode("qa").build(),
            Err(LoggerError::InvalidAppMode { .. })
        ));
    }

    #[test]
    fn test_backend_receives_records() {
        let dir = tempdir().unwrap();
        let backend = Arc::new(RecordingBackend::default());
        let logger = Logger::builder()
            .output_paths([dir.path().join("app.log").display().to_string()])
            .monitoring_backend(backend.clone())
            .build()
            .unwrap();

        logger.info(None, "one", &[]);
        logger.error(None, "two", &[]);
        logger.debug(None, "filtered", &[]);

        let entries = backend.entries.lock();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].level, LogLevel::Error);
        assert_eq!(logger.metrics().forwarded_count(), 2);
    }

    #[test]
    fn test_backend_attach_failure_aborts_build() {
        let err = Logger::builder()
            .monitoring_backend(Arc::new(RejectingBackend))
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::BackendAttach { .. }));
    }

    #[test]
    fn test_effective_config_reflects_options() {
        let logger = Logger::new([
            LoggerOption::DefaultConfig,
            LoggerOption::Level("error".to_string()),
        ])
        .unwrap();

        let config = logger.effective_config();
        assert_eq!(config.level, "error");
        assert_eq!(config.message_key, "message");
        assert_eq!(config.output_paths, vec!["stdout"]);
        assert_eq!(logger.level(), LogLevel::Error);
        assert!(!logger.enabled(LogLevel::Warn));
        // development preset, resolver overrides encoding
        assert!(logger.engine_config().development);
        assert_eq!(logger.raw().config().encoding, Encoding::Json);
    }
}
