//! Engine configuration and per-environment presets

use super::{
    encoding::{EncoderConfig, Encoding, LevelEncoding},
    engine::{Engine, IoCore},
    error::{LoggerError, Result},
    field::Field,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    timestamp::TimestampFormat,
};
use crate::appenders;
use std::sync::Arc;

/// Everything the engine needs to be built.
///
/// Start from [`EngineConfig::development`] or [`EngineConfig::production`]
/// and override what differs.
///
/// # Example
///
/// ```
/// use rust_context_logger::core::{EngineConfig, LogLevel};
///
/// let mut config = EngineConfig::production();
/// config.level = LogLevel::Warn;
/// let engine = config.build().unwrap();
/// assert!(!engine.enabled(LogLevel::Info));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub level: LogLevel,
    /// Set by the development preset; informational only
    pub development: bool,
    pub encoding: Encoding,
    pub encoder: EncoderConfig,
    pub disable_caller: bool,
    pub disable_stacktrace: bool,
    /// Minimum level at which a stacktrace is captured
    pub stacktrace_level: LogLevel,
    pub output_paths: Vec<String>,
    pub error_output_paths: Vec<String>,
    pub name: Option<String>,
    pub initial_fields: Vec<Field>,
}

impl EngineConfig {
    /// Verbose, human-friendly preset
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            development: true,
            encoding: Encoding::Console,
            encoder: EncoderConfig {
                level_encoding: LevelEncoding::Capital,
                timestamp_format: TimestampFormat::Iso8601,
                ..EncoderConfig::default()
            },
            disable_caller: false,
            disable_stacktrace: false,
            stacktrace_level: LogLevel::Warn,
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            name: None,
            initial_fields: Vec::new(),
        }
    }

    /// Performance-oriented preset
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            development: false,
            encoding: Encoding::Json,
            encoder: EncoderConfig {
                level_encoding: LevelEncoding::Lowercase,
                timestamp_format: TimestampFormat::UnixMillis,
                ..EncoderConfig::default()
            },
            disable_caller: false,
            disable_stacktrace: false,
            stacktrace_level: LogLevel::Error,
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            name: None,
            initial_fields: Vec::new(),
        }
    }

    /// Open the outputs and assemble an engine
    pub fn build(&self) -> Result<Engine> {
        if self.output_paths.is_empty() {
            return Err(LoggerError::NoOutputs);
        }

        let outputs = self
            .output_paths
            .iter()
            .map(|path| appenders::open(path))
            .collect::<Result<Vec<_>>>()?;

        let error_outputs = self
            .error_output_paths
            .iter()
            .map(|path| appenders::open(path))
            .collect::<Result<Vec<_>>>()?;

        let mut encoder = self.encoder.clone();
        if self.encoding == Encoding::Json && encoder.level_encoding == LevelEncoding::CapitalColor
        {
            encoder.level_encoding = LevelEncoding::Capital;
        }

        let metrics = Arc::new(LoggerMetrics::new());
        let core = IoCore::new(
            self.level,
            self.encoding,
            encoder,
            outputs,
            error_outputs,
            Arc::clone(&metrics),
        );

        Ok(Engine::new(Arc::new(core), Arc::new(self.clone()), metrics))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::production()
    }
}
