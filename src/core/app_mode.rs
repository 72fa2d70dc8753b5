//! Application mode selecting the engine preset

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment environment the logger runs in.
///
/// Parsing never fails: names outside the recognized set map to
/// [`AppMode::Empty`], which the resolver rejects when building a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppMode {
    #[default]
    Development,
    Staging,
    Production,
    Empty,
}

impl AppMode {
    pub fn from_name(name: &str) -> Self {
        match name {
            "development" => AppMode::Development,
            "staging" => AppMode::Staging,
            "production" => AppMode::Production,
            _ => AppMode::Empty,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Development => "development",
            AppMode::Staging => "staging",
            AppMode::Production => "production",
            AppMode::Empty => "empty",
        }
    }

    /// Development and staging share the verbose preset
    pub fn is_development_like(&self) -> bool {
        matches!(self, AppMode::Development | AppMode::Staging)
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AppMode {
    fn from(name: &str) -> Self {
        AppMode::from_name(name)
    }
}

impl From<String> for AppMode {
    fn from(name: String) -> Self {
        AppMode::from_name(&name)
    }
}

impl From<AppMode> for String {
    fn from(mode: AppMode) -> Self {
        mode.as_str().to_string()
    }
}
