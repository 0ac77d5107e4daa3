//! Configuration management.
//!
//! Settings come from a TOML file, then environment variables on top:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `MEMOPEDIA_CONFIG_PATH` | config file location |
//! | `MEMOPEDIA_BASE_URL` | `base_url` |
//! | `MEMOPEDIA_PERSONA` | `persona_id` |
//! | `MEMOPEDIA_TIMEOUT_MS` | `http.timeout_ms` |
//! | `MEMOPEDIA_CONNECT_TIMEOUT_MS` | `http.connect_timeout_ms` |

use crate::client::{HttpConfig, HttpMemopediaClient};
use crate::services::OrchestratorOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "MEMOPEDIA_CONFIG_PATH";

/// Main configuration for memopedia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemopediaConfig {
    /// Server root of the Memopedia API.
    pub base_url: String,
    /// Persona to browse when none is given on the command line.
    pub persona_id: Option<String>,
    /// Ignore page responses superseded by a newer selection.
    pub discard_stale_pages: bool,
    /// HTTP timeouts.
    pub http: HttpConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, e.g. `memopedia=debug`.
    pub filter: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path; logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Server root.
    pub base_url: Option<String>,
    /// Default persona.
    pub persona_id: Option<String>,
    /// Stale page response handling.
    pub discard_stale_pages: Option<bool>,
    /// HTTP section.
    pub http: Option<ConfigFileHttp>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// HTTP section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileHttp {
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

impl Default for MemopediaConfig {
    fn default() -> Self {
        Self {
            base_url: HttpMemopediaClient::DEFAULT_BASE_URL.to_string(),
            persona_id: None,
            discard_stale_pages: false,
            http: HttpConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl MemopediaConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration and applies environment overrides.
    ///
    /// An explicit path, or one named by `MEMOPEDIA_CONFIG_PATH`, must load.
    /// Otherwise the default locations are tried.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::parse_toml(&contents).map_err(|e| match e {
            Error::OperationFailed { operation, cause } => Error::OperationFailed {
                operation,
                cause: format!("{}: {cause}", path.display()),
            },
            other => other,
        })
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn parse_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/memopedia/` on macOS)
    /// 2. XDG config dir (`~/.config/memopedia/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("memopedia").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("memopedia")
                .join("config.toml"),
        ];
        for path in candidates.iter().filter(|path| path.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file"),
            }
        }

        Self::default()
    }

    /// Applies process environment overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a variable lookup.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(base_url) = non_empty("MEMOPEDIA_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(persona_id) = non_empty("MEMOPEDIA_PERSONA") {
            self.persona_id = Some(persona_id);
        }
        if let Some(timeout_ms) = non_empty("MEMOPEDIA_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.http.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) =
            non_empty("MEMOPEDIA_CONNECT_TIMEOUT_MS").and_then(|v| v.parse().ok())
        {
            self.http.connect_timeout_ms = connect_timeout_ms;
        }
        self
    }

    /// Converts a `ConfigFile` to `MemopediaConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        config.persona_id = file.persona_id.filter(|p| !p.trim().is_empty());
        if let Some(discard) = file.discard_stale_pages {
            config.discard_stale_pages = discard;
        }
        if let Some(http) = file.http {
            if let Some(v) = http.timeout_ms {
                config.http.timeout_ms = v;
            }
            if let Some(v) = http.connect_timeout_ms {
                config.http.connect_timeout_ms = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Sets the server root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the default persona.
    #[must_use]
    pub fn with_persona(mut self, persona_id: impl Into<String>) -> Self {
        self.persona_id = Some(persona_id.into());
        self
    }

    /// Resolves the persona to use, preferring an explicit one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if neither is set.
    pub fn resolve_persona(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .or(self.persona_id.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidInput(
                    "no persona given; pass --persona or set persona_id / MEMOPEDIA_PERSONA"
                        .to_string(),
                )
            })
    }

    /// Builds an HTTP client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `base_url` is malformed.
    pub fn client(&self) -> Result<HttpMemopediaClient> {
        Ok(HttpMemopediaClient::new(&self.base_url)?.with_http_config(self.http))
    }

    /// Orchestrator options derived from this configuration.
    #[must_use]
    pub const fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            discard_stale: self.discard_stale_pages,
        }
    }
}
