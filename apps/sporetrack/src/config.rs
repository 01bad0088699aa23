//! # Configuration
//!
//! Sporetrack reads an optional TOML file and then applies environment
//! overrides. CLI flags, where present, override both.
//!
//! ## File
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100          # requests/second, 0 disables
//! cors_origins = "http://localhost:3000"
//!
//! [render]
//! date_style = "us"         # us | eu | iso | long
//! strict_stages = false     # reject unknown currentStage values
//! ```
//!
//! ## Environment Variables
//!
//! - `SPORETRACK_HOST`, `SPORETRACK_PORT`
//! - `SPORETRACK_RATE_LIMIT`
//! - `SPORETRACK_CORS_ORIGINS`: comma-separated origins, or "*" for all
//! - `SPORETRACK_DATE_STYLE`
//! - `SPORETRACK_STRICT_STAGES`: `1`/`true`/`yes` to enable

use serde::{Deserialize, Serialize};
use sporetrack_core::{DateStyle, SporetrackError};
use std::path::Path;

/// Config file read from the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "sporetrack.toml";

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// CONFIG STRUCTURE
// =============================================================================

/// Effective application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub render: RenderConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Comma-separated allowed origins, "*" for all, unset for localhost only.
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            cors_origins: None,
        }
    }
}

/// How workflow views are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub date_style: DateStyle,
    /// Treat an unrecognized `currentStage` as an error instead of
    /// rendering every stage pending.
    pub strict_stages: bool,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, SporetrackError> {
        toml::from_str(contents).map_err(|e| SporetrackError::ConfigError(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SporetrackError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            SporetrackError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(SporetrackError::ConfigError(format!(
                "Config file '{}' exceeds {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SporetrackError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load the effective configuration.
    ///
    /// An explicit path must exist. Without one, `sporetrack.toml` is used if
    /// present, otherwise defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, SporetrackError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `SPORETRACK_*` overrides from a variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SporetrackError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SPORETRACK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SPORETRACK_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                SporetrackError::ConfigError(format!("SPORETRACK_PORT is not a port: {:?}", port))
            })?;
        }
        if let Some(limit) = lookup("SPORETRACK_RATE_LIMIT") {
            self.server.rate_limit = limit.trim().parse().map_err(|_| {
                SporetrackError::ConfigError(format!(
                    "SPORETRACK_RATE_LIMIT is not a number: {:?}",
                    limit
                ))
            })?;
        }
        if let Some(origins) = lookup("SPORETRACK_CORS_ORIGINS") {
            self.server.cors_origins = Some(origins);
        }
        if let Some(style) = lookup("SPORETRACK_DATE_STYLE") {
            self.render.date_style = style.parse()?;
        }
        if let Some(strict) = lookup("SPORETRACK_STRICT_STAGES") {
            self.render.strict_stages = parse_flag(&strict)?;
        }
        Ok(())
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_flag(raw: &str) -> Result<bool, SporetrackError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(SporetrackError::ConfigError(format!(
            "expected a boolean, got {:?}",
            other
        ))),
    }
}

// =============================================================================
// TESTS
// =============================================================================
