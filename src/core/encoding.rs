//! Entry encoders
//!
//! Provides the two output encodings:
//! - Json: one JSON object per line, keys named by the [`EncoderConfig`]
//! - Console: tab separated, human-readable, structured fields as JSON

use super::field::Field;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialization used for every entry a logger writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Encoding {
    #[default]
    Json,
    Console,
}

impl Encoding {
    /// Parse an encoding name, falling back to `Console` for unknown names
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => Encoding::Json,
            _ => Encoding::Console,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Console => "console",
        }
    }

    /// Encode an entry as a single output record (no trailing newline)
    pub fn encode(&self, entry: &LogEntry, config: &EncoderConfig) -> String {
        match self {
            Encoding::Json => encode_json(entry, config),
            Encoding::Console => encode_console(entry, config),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Encoding {
    fn from(name: &str) -> Self {
        Encoding::from_name(name)
    }
}

impl From<String> for Encoding {
    fn from(name: String) -> Self {
        Encoding::from_name(&name)
    }
}

impl From<Encoding> for String {
    fn from(encoding: Encoding) -> Self {
        encoding.as_str().to_string()
    }
}

/// How the level is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelEncoding {
    /// `INFO`
    #[default]
    Capital,
    /// `INFO`, colored by severity (console encoding only)
    CapitalColor,
    /// `info`
    Lowercase,
}

impl LevelEncoding {
    pub fn render(&self, level: LogLevel) -> String {
        match self {
            LevelEncoding::Capital => level.to_str().to_string(),
            LevelEncoding::Lowercase => level.to_lowercase_str().to_string(),
            LevelEncoding::CapitalColor => colorize(level),
        }
    }
}

#[cfg(feature = "console")]
fn colorize(level: LogLevel) -> String {
    use colored::Colorize;
    level.to_str().color(level.color_code()).to_string()
}

#[cfg(not(feature = "console"))]
fn colorize(level: LogLevel) -> String {
    level.to_str().to_string()
}

/// Output key names and element formatting.
///
/// An empty key omits that element from the output entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub level_encoding: LevelEncoding,
    pub timestamp_format: TimestampFormat,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "time".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "message".to_string(),
            stacktrace_key: "stack_trace".to_string(),
            level_encoding: LevelEncoding::default(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl EncoderConfig {
    /// True when `key` names one of the record's own elements
    pub fn is_element_key(&self, key: &str) -> bool {
        !key.is_empty()
            && [
                &self.time_key,
                &self.level_key,
                &self.name_key,
                &self.caller_key,
                &self.message_key,
                &self.stacktrace_key,
            ]
            .iter()
            .any(|element| element.as_str() == key)
    }
}

fn encode_json(entry: &LogEntry, config: &EncoderConfig) -> String {
    let mut json_obj = serde_json::Map::new();

    if !config.time_key.is_empty() {
        json_obj.insert(
            config.time_key.clone(),
            config.timestamp_format.to_json_value(&entry.timestamp),
        );
    }

    if !config.level_key.is_empty() {
        let level = match config.level_encoding {
            // Escape codes have no place in JSON
            LevelEncoding::CapitalColor => LevelEncoding::Capital.render(entry.level),
            other => other.render(entry.level),
        };
        json_obj.insert(config.level_key.clone(), serde_json::Value::String(level));
    }

    if let (false, Some(name)) = (config.name_key.is_empty(), &entry.logger_name) {
        json_obj.insert(config.name_key.clone(), serde_json::Value::String(name.clone()));
    }

    if let (false, Some(caller)) = (config.caller_key.is_empty(), &entry.caller) {
        json_obj.insert(
            config.caller_key.clone(),
            serde_json::Value::String(caller.to_string()),
        );
    }

    if !config.message_key.is_empty() {
        json_obj.insert(
            config.message_key.clone(),
            serde_json::Value::String(entry.message.clone()),
        );
    }

    for field in &entry.fields {
        let key = if config.is_element_key(&field.key) {
            format!("fields.{}", field.key)
        } else {
            field.key.clone()
        };
        json_obj.insert(key, field.value.to_json_value());
    }

    if let (false, Some(stack)) = (config.stacktrace_key.is_empty(), &entry.stacktrace) {
        json_obj.insert(
            config.stacktrace_key.clone(),
            serde_json::Value::String(stack.clone()),
        );
    }

    serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
}

fn encode_console(entry: &LogEntry, config: &EncoderConfig) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(6);

    if !config.time_key.is_empty() {
        parts.push(config.timestamp_format.format(&entry.timestamp));
    }
    if !config.level_key.is_empty() {
        parts.push(config.level_encoding.render(entry.level));
    }
    if let (false, Some(name)) = (config.name_key.is_empty(), &entry.logger_name) {
        parts.push(name.clone());
    }
    if let (false, Some(caller)) = (config.caller_key.is_empty(), &entry.caller) {
        parts.push(caller.to_string());
    }
    if !config.message_key.is_empty() {
        parts.push(entry.message.clone());
    }
    if !entry.fields.is_empty() {
        parts.push(fields_as_json(&entry.fields));
    }

    let mut line = parts.join("\t");

    if let (false, Some(stack)) = (config.stacktrace_key.is_empty(), &entry.stacktrace) {
        line.push('\n');
        line.push_str(stack);
    }

    line
}

fn fields_as_json(fields: &[Field]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|f| (f.key.clone(), f.value.to_json_value()))
        .collect();
    serde_json::to_string(&serde_json::Value::Object(map)).unwrap_or_default()
}
