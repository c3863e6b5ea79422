use std::fmt::Display;

use garde::Validate;
use serde::{Deserialize, Serialize};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra `EnvFilter` directives, e.g. `ratchet_crypto=debug`.
    #[garde(inner(ascii, length(min = 1)))]
    pub filter: Vec<String>,
    #[garde(skip)]
    pub level: Level,
    #[garde(skip)]
    pub format: Format,
    #[garde(skip)]
    pub ansi: bool,
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ filter: [{}], level: {}, format: {}, ansi: {} }}",
            self.filter.join(","),
            self.level,
            self.format,
            self.ansi
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: vec![],
            level: Level::default(),
            format: Format::default(),
            ansi: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, strum::Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<Level> for tracing::Level {
    fn from(value: Level) -> Self {
        match value {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

/// Output layout of the fmt layer.
#[derive(Debug, strum::Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Full,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_directive_rejected() {
        let config = Config {
            filter: vec![String::new()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display() {
        let config = Config {
            filter: vec!["ratchet_crypto=debug".to_string()],
            level: Level::Warn,
            format: Format::Compact,
            ansi: false,
        };
        assert_eq!(
            config.to_string(),
            "{ filter: [ratchet_crypto=debug], level: warn, format: compact, ansi: false }"
        );
    }
}
