//! Logger configuration: defaults, named options and resolution
//!
//! A [`Config`] starts from [`Config::default`], receives a sequence of
//! [`LoggerOption`]s in order (the last write to a field wins) and is then
//! resolved into an [`EngineConfig`] by picking the preset for the
//! application mode and applying the settings on top of it.

use super::{
    app_mode::AppMode,
    backend::{MirrorCore, MonitoringBackend},
    context::ContextKeyRegistry,
    encoding::{Encoding, LevelEncoding},
    error::{LoggerError, Result},
    field::Field,
    log_level::LogLevel,
    logger::Logger,
    preset::EngineConfig,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Effective logger settings.
///
/// The level is kept as the configured name and only validated when the
/// logger is built, so invalid names surface as construction errors.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub level: String,
    pub encoding: Encoding,
    pub app_mode: AppMode,
    #[serde(skip)]
    pub monitoring_backend: Option<Arc<dyn MonitoringBackend>>,
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub disable_stacktrace: bool,
    pub disable_caller: bool,
    pub output_paths: Vec<String>,
    pub error_output_paths: Vec<String>,
    pub name: Option<String>,
    pub colored_levels: bool,
    /// Overrides the preset's timestamp format when set
    pub timestamp_format: Option<TimestampFormat>,
    pub initial_fields: Vec<Field>,
    #[serde(skip)]
    pub context_keys: ContextKeyRegistry,
}

impl Config {
    /// Reset the default bundle: level, encoding, mode, output keys,
    /// caller/stacktrace toggles and output paths. Other settings are kept.
    pub fn apply_defaults(&mut self) {
        self.level = LogLevel::Info.name().to_string();
        self.encoding = Encoding::Json;
        self.app_mode = AppMode::Development;
        self.time_key = "time".to_string();
        self.level_key = "level".to_string();
        self.name_key = "logger".to_string();
        self.caller_key = "caller".to_string();
        self.message_key = "message".to_string();
        self.stacktrace_key = "stack_trace".to_string();
        self.disable_stacktrace = true;
        self.disable_caller = true;
        self.output_paths = vec!["stdout".to_string()];
        self.error_output_paths = vec!["stderr".to_string()];
    }

    /// Load settings from JSON; absent keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and map the settings onto the preset for the app mode
    pub fn resolve(&self) -> Result<EngineConfig> {
        let mut engine = match self.app_mode {
            AppMode::Empty => return Err(LoggerError::invalid_app_mode(self.app_mode.as_str())),
            mode if mode.is_development_like() => EngineConfig::development(),
            _ => EngineConfig::production(),
        };

        engine.level = LogLevel::parse_name(&self.level)?;
        engine.encoding = self.encoding;
        engine.encoder.time_key = self.time_key.clone();
        engine.encoder.level_key = self.level_key.clone();
        engine.encoder.name_key = self.name_key.clone();
        engine.encoder.caller_key = self.caller_key.clone();
        engine.encoder.message_key = self.message_key.clone();
        engine.encoder.stacktrace_key = self.stacktrace_key.clone();
        engine.disable_stacktrace = self.disable_stacktrace;
        engine.disable_caller = self.disable_caller;
        engine.output_paths = self.output_paths.clone();
        engine.error_output_paths = self.error_output_paths.clone();
        engine.name = self.name.clone().filter(|name| !name.is_empty());
        engine.initial_fields = self.initial_fields.clone();

        if let Some(ref format) = self.timestamp_format {
            engine.encoder.timestamp_format = format.clone();
        }
        if self.colored_levels && self.encoding == Encoding::Console {
            engine.encoder.level_encoding = LevelEncoding::CapitalColor;
        }

        Ok(engine)
    }

    /// Resolve, build the engine and attach the monitoring backend
    pub fn build(self) -> Result<Logger> {
        let engine = self.resolve()?.build()?;

        let engine = match self.monitoring_backend {
            Some(ref backend) => {
                let metrics = engine.metrics_handle();
                engine.wrap_core(|core| MirrorCore::wrap(core, Arc::clone(backend), metrics))?
            }
            None => engine,
        };

        Ok(Logger::from_parts(engine, self))
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            level: String::new(),
            encoding: Encoding::Json,
            app_mode: AppMode::Development,
            monitoring_backend: None,
            time_key: String::new(),
            level_key: String::new(),
            name_key: String::new(),
            caller_key: String::new(),
            message_key: String::new(),
            stacktrace_key: String::new(),
            disable_stacktrace: true,
            disable_caller: true,
            output_paths: Vec::new(),
            error_output_paths: Vec::new(),
            name: None,
            colored_levels: false,
            timestamp_format: None,
            initial_fields: Vec::new(),
            context_keys: ContextKeyRegistry::new(),
        };
        config.apply_defaults();
        config
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("level", &self.level)
            .field("encoding", &self.encoding)
            .field("app_mode", &self.app_mode)
            .field(
                "monitoring_backend",
                &self.monitoring_backend.as_ref().map(|b| b.name().to_string()),
            )
            .field("time_key", &self.time_key)
            .field("level_key", &self.level_key)
            .field("name_key", &self.name_key)
            .field("caller_key", &self.caller_key)
            .field("message_key", &self.message_key)
            .field("stacktrace_key", &self.stacktrace_key)
            .field("disable_stacktrace", &self.disable_stacktrace)
            .field("disable_caller", &self.disable_caller)
            .field("output_paths", &self.output_paths)
            .field("error_output_paths", &self.error_output_paths)
            .field("name", &self.name)
            .field("colored_levels", &self.colored_levels)
            .field("timestamp_format", &self.timestamp_format)
            .field("initial_fields", &self.initial_fields)
            .field("context_keys", &self.context_keys.len())
            .finish()
    }
}

/// A single named setting, applied to a [`Config`] in sequence
#[derive(Clone)]
pub enum LoggerOption {
    /// Reset the default bundle, see [`Config::apply_defaults`]
    DefaultConfig,
    Level(String),
    Encoding(Encoding),
    AppMode(AppMode),
    MonitoringBackend(Arc<dyn MonitoringBackend>),
    TimeKey(String),
    LevelKey(String),
    NameKey(String),
    CallerKey(String),
    MessageKey(String),
    StacktraceKey(String),
    DisableStacktrace(bool),
    DisableCaller(bool),
    OutputPaths(Vec<String>),
    ErrorOutputPaths(Vec<String>),
    Name(String),
    ColoredLevels(bool),
    TimestampFormat(TimestampFormat),
    ContextKeys(ContextKeyRegistry),
    InitialFields(Vec<Field>),
    /// Replace every setting at once
    Config(Box<Config>),
}

impl LoggerOption {
    pub fn apply(self, config: &mut Config) {
        match self {
            LoggerOption::DefaultConfig => config.apply_defaults(),
            LoggerOption::Level(level) => config.level = level,
            LoggerOption::Encoding(encoding) => config.encoding = encoding,
            LoggerOption::AppMode(mode) => config.app_mode = mode,
            LoggerOption::MonitoringBackend(backend) => config.monitoring_backend = Some(backend),
            LoggerOption::TimeKey(key) => config.time_key = key,
            LoggerOption::LevelKey(key) => config.level_key = key,
            LoggerOption::NameKey(key) => config.name_key = key,
            LoggerOption::CallerKey(key) => config.caller_key = key,
            LoggerOption::MessageKey(key) => config.message_key = key,
            LoggerOption::StacktraceKey(key) => config.stacktrace_key = key,
            LoggerOption::DisableStacktrace(disable) => config.disable_stacktrace = disable,
            LoggerOption::DisableCaller(disable) => config.disable_caller = disable,
            LoggerOption::OutputPaths(paths) => config.output_paths = paths,
            LoggerOption::ErrorOutputPaths(paths) => config.error_output_paths = paths,
            LoggerOption::Name(name) => config.name = Some(name),
            LoggerOption::ColoredLevels(colored) => config.colored_levels = colored,
            LoggerOption::TimestampFormat(format) => config.timestamp_format = Some(format),
            LoggerOption::ContextKeys(registry) => config.context_keys = registry,
            LoggerOption::InitialFields(fields) => config.initial_fields = fields,
            LoggerOption::Config(replacement) => *config = *replacement,
        }
    }
}

impl fmt::Debug for LoggerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerOption::MonitoringBackend(backend) => f
                .debug_tuple("MonitoringBackend")
                .field(&backend.name())
                .finish(),
            LoggerOption::ContextKeys(registry) => {
                f.debug_tuple("ContextKeys").field(&registry.keys()).finish()
            }
            LoggerOption::Config(config) => f.debug_tuple("Config").field(config).finish(),
            LoggerOption::DefaultConfig => f.write_str("DefaultConfig"),
            LoggerOption::Level(v) => f.debug_tuple("Level").field(v).finish(),
            LoggerOption::Encoding(v) => f.debug_tuple("Encoding").field(v).finish(),
            LoggerOption::AppMode(v) => f.debug_tuple("AppMode").field(v).finish(),
            LoggerOption::TimeKey(v) => f.debug_tuple("TimeKey").field(v).finish(),
            LoggerOption::LevelKey(v) => f.debug_tuple("LevelKey").field(v).finish(),
            LoggerOption::NameKey(v) => f.debug_tuple("NameKey").field(v).finish(),
            LoggerOption::CallerKey(v) => f.debug_tuple("CallerKey").field(v).finish(),
            LoggerOption::MessageKey(v) => f.debug_tuple("MessageKey").field(v).finish(),
            LoggerOption::StacktraceKey(v) => f.debug_tuple("StacktraceKey").field(v).finish(),
            LoggerOption::DisableStacktrace(v) => {
                f.debug_tuple("DisableStacktrace").field(v).finish()
            }
            LoggerOption::DisableCaller(v) => f.debug_tuple("DisableCaller").field(v).finish(),
            LoggerOption::OutputPaths(v) => f.debug_tuple("OutputPaths").field(v).finish(),
            LoggerOption::ErrorOutputPaths(v) => {
                f.debug_tuple("ErrorOutputPaths").field(v).finish()
            }
            LoggerOption::Name(v) => f.debug_tuple("Name").field(v).finish(),
            LoggerOption::ColoredLevels(v) => f.debug_tuple("ColoredLevels").field(v).finish(),
            LoggerOption::TimestampFormat(v) => f.debug_tuple("TimestampFormat").field(v).finish(),
            LoggerOption::InitialFields(v) => f.debug_tuple("InitialFields").field(v).finish(),
        }
    }
}

/// Apply `options` in order on top of the default configuration
pub fn resolve_options<I>(options: I) -> Config
where
    I: IntoIterator<Item = LoggerOption>,
{
    let mut config = Config::default();
    for option in options {
        option.apply(&mut config);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.encoding, Encoding::Json);
        assert_eq!(config.app_mode, AppMode::Development);
        assert_eq!(config.time_key, "time");
        assert_eq!(config.stacktrace_key, "stack_trace");
        assert!(config.disable_stacktrace);
        assert!(config.disable_caller);
        assert_eq!(config.output_paths, vec!["stdout"]);
        assert_eq!(config.error_output_paths, vec!["stderr"]);
        assert_eq!(config.context_keys.len(), 11);
    }

    #[test]
    fn test_last_write_wins() {
        let config = resolve_options([
            LoggerOption::Level("debug".to_string()),
            LoggerOption::MessageKey("msg".to_string()),
            LoggerOption::Level("error".to_string()),
        ]);
        assert_eq!(config.level, "error");
        assert_eq!(config.message_key, "msg");
    }

    #[test]
    fn test_default_bundle_resets_earlier_options() {
        let config = resolve_options([
            LoggerOption::Level("debug".to_string()),
            LoggerOption::Name("api".to_string()),
            LoggerOption::DefaultConfig,
        ]);
        assert_eq!(config.level, "info");
        // outside the bundle
        assert_eq!(config.name.as_deref(), Some("api"));
    }

    #[test]
    fn test_resolve_presets() {
        let dev = resolve_options([LoggerOption::AppMode(AppMode::Staging)])
            .resolve()
            .unwrap();
        assert!(dev.development);

        let prod = resolve_options([LoggerOption::AppMode(AppMode::Production)])
            .resolve()
            .unwrap();
        assert!(!prod.development);
        assert_eq!(prod.encoder.level_encoding, LevelEncoding::Lowercase);
    }

    #[test]
    fn test_resolve_applies_overrides_on_preset() {
        let engine = resolve_options([
            LoggerOption::AppMode(AppMode::Development),
            LoggerOption::Level("warning".to_string()),
            LoggerOption::TimeKey("ts".to_string()),
            LoggerOption::DisableCaller(false),
        ])
        .resolve()
        .unwrap();

        // preset would have picked console/debug
        assert_eq!(engine.encoding, Encoding::Json);
        assert_eq!(engine.level, LogLevel::Warn);
        assert_eq!(engine.encoder.time_key, "ts");
        assert!(!engine.disable_caller);
        assert!(engine.disable_stacktrace);
    }

    #[test]
    fn test_resolve_rejects_empty_mode() {
        let err = resolve_options([LoggerOption::AppMode(AppMode::from("qa"))])
            .resolve()
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidAppMode { .. }));
    }

    #[test]
    fn test_resolve_rejects_bad_levels() {
        for level in ["", "verbose"] {
            let err = resolve_options([LoggerOption::Level(level.to_string())])
                .resolve()
                .unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains("debug, info, warning, error, panic, fatal"));
        }
    }

    #[test]
    fn test_colored_levels_only_for_console() {
        let json = resolve_options([LoggerOption::ColoredLevels(true)])
            .resolve()
            .unwrap();
        assert_ne!(json.encoder.level_encoding, LevelEncoding::CapitalColor);

        let console = resolve_options([
            LoggerOption::ColoredLevels(true),
            LoggerOption::Encoding(Encoding::Console),
        ])
        .resolve()
        .unwrap();
        assert_eq!(console.encoder.level_encoding, LevelEncoding::CapitalColor);
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(
            r#"{"level":"error","app_mode":"production","output_paths":["stderr"]}"#,
        )
        .unwrap();
        assert_eq!(config.level, "error");
        assert_eq!(config.app_mode, AppMode::Production);
        assert_eq!(config.output_paths, vec!["stderr"]);
        assert_eq!(config.message_key, "message");
    }
}
