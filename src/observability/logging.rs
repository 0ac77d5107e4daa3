//! Logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_FILTER_ENV: &str = "MEMOPEDIA_LOG";
/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "MEMOPEDIA_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown log format '{other}' (expected pretty or json)"
            ))),
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub filter: String,
    /// Optional log file; stderr otherwise.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Resolves settings against the process environment.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_settings_with(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Resolves settings against a variable lookup.
    ///
    /// The filter comes from `MEMOPEDIA_LOG`, then the config file, then
    /// `info` (`debug` when verbose). Unknown formats fall back to pretty.
    #[must_use]
    pub fn from_settings_with(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let filter = lookup(LOG_FILTER_ENV)
            .or_else(|| settings.and_then(|s| s.filter.clone()))
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| if verbose { "debug" } else { "info" }.to_string());

        let format = lookup(LOG_FORMAT_ENV)
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .and_then(|f| f.parse().ok())
            .unwrap_or_default();

        Self {
            format,
            filter,
            file: settings.and_then(|s| s.file.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("json", LogFormat::Json; "json")]
    #[test_case(" JSON ", LogFormat::Json; "case and whitespace")]
    #[test_case("pretty", LogFormat::Pretty; "pretty")]
    fn test_log_format_parse(input: &str, expected: LogFormat) {
        assert_eq!(input.parse::<LogFormat>().unwrap(), expected);
    }

    #[test]
    fn test_log_format_rejects_unknown() {
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_verbose_default_filter() {
        let config = LoggingConfig::from_settings_with(None, true, |_| None);
        assert_eq!(config.filter, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_beats_settings() {
        let settings = LoggingSettings {
            filter: Some("memopedia=trace".to_string()),
            format: Some("json".to_string()),
            file: Some(PathBuf::from("/tmp/memopedia.log")),
        };

        let from_file = LoggingConfig::from_settings_with(Some(&settings), false, |_| None);
        assert_eq!(from_file.filter, "memopedia=trace");
        assert_eq!(from_file.format, LogFormat::Json);
        assert_eq!(from_file.file, settings.file);

        let from_env = LoggingConfig::from_settings_with(Some(&settings), false, |key| {
            (key == LOG_FILTER_ENV).then(|| "warn".to_string())
        });
        assert_eq!(from_env.filter, "warn");
    }
}
