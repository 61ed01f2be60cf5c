//! Terminal configuration
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! an optional TOML file, and command-line flags applied by `main`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{Result, TerminalError};

/// Default tracing filter when neither the environment nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "librus_terminal=warn";

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "LIBRUS_TERMINAL_LOG";

/// Longest accepted session lifetime: one week
pub const MAX_SESSION_LIFETIME_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for the interactive terminal
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerminalConfig {
    /// Whether the prompt and diagnostics use ANSI colors
    pub enable_color: bool,

    /// Text shown at the start of the prompt, before the login state
    pub prompt_label: String,

    /// How long a login stays valid before `check_if_expired` rejects it
    ///
    /// The portal drops idle sessions after roughly half an hour, so the
    /// default stays just under that.
    pub session_lifetime_secs: u64,

    /// TOML file with portal data; the embedded demo data is used when unset
    pub fixture_path: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `librus_terminal=debug`
    pub log_filter: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            enable_color: true,
            prompt_label: "Librus".to_string(),
            session_lifetime_secs: 25 * 60,
            fixture_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TerminalConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TerminalConfig = toml::from_str(content)
            .map_err(|e| TerminalError::ConfigError(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TerminalError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_lifetime_secs)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.prompt_label.trim().is_empty() {
            return Err(TerminalError::ConfigError(
                "prompt_label must not be empty".into(),
            ));
        }

        if self.session_lifetime_secs == 0 {
            return Err(TerminalError::ConfigError(
                "session_lifetime_secs must be positive".into(),
            ));
        }

        if self.session_lifetime_secs > MAX_SESSION_LIFETIME_SECS {
            return Err(TerminalError::ConfigError(format!(
                "session_lifetime_secs must be at most {}",
                MAX_SESSION_LIFETIME_SECS
            )));
        }

        if self.log_filter.trim().is_empty() {
            return Err(TerminalError::ConfigError(
                "log_filter must not be empty".into(),
            ));
        }

        Ok(())
    }
}
