//! Core logger types and traits

pub mod app_mode;
pub mod appender;
pub mod backend;
pub mod config;
pub mod context;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod preset;
pub mod termination;
pub mod timestamp;

pub use app_mode::AppMode;
pub use appender::Appender;
pub use backend::{ChannelBackend, MirrorCore, MonitoringBackend};
pub use config::{Config, LoggerOption};
pub use context::{ContextKey, ContextKeyRegistry, LoggingField, RequestContext};
pub use encoding::{EncoderConfig, Encoding, LevelEncoding};
pub use engine::{Core, Engine, IoCore};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use log_entry::{Caller, LogEntry};
pub use log_level::{LogLevel, VALID_LEVEL_NAMES};
pub use logger::{Logger, LoggerBuilder, StructuredLogger};
pub use metrics::LoggerMetrics;
pub use preset::EngineConfig;
pub use termination::{Termination, TerminationKind};
pub use timestamp::TimestampFormat;
