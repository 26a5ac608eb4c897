//! Application settings loading from config.toml
//!
//! This module provides the application-level defaults the reconciliation
//! core depends on: the default team and currency for new team-setting
//! records, the fixed role assigned on self-registration, and the
//! configurable transaction/budget category-match invariant. Every field
//! has a serde default, so a missing or partial config.toml yields the
//! stock behavior.

use crate::core::role::Role;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

fn default_team() -> String {
    "Video Game Consoles SDE Team".to_string()
}

fn default_allowed_teams() -> Vec<String> {
    vec![default_team()]
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_allowed_currencies() -> Vec<String> {
    vec!["USD".to_string(), "GBP".to_string()]
}

fn default_communication_preference() -> String {
    "email".to_string()
}

fn default_role() -> String {
    "regular".to_string()
}

/// Application configuration structure representing config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Team assigned to identities that register without one
    #[serde(default = "default_team")]
    pub default_team: String,
    /// Closed set of team names an identity may belong to
    #[serde(default = "default_allowed_teams")]
    pub allowed_teams: Vec<String>,
    /// Currency for newly created team-setting records
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Closed set of accepted currencies
    #[serde(default = "default_allowed_currencies")]
    pub allowed_currencies: Vec<String>,
    /// Communication preference for newly created team-setting records
    #[serde(default = "default_communication_preference")]
    pub default_communication_preference: String,
    /// Role assigned on self-registration; elevation is a separate,
    /// admin-only operation
    #[serde(default = "default_role")]
    pub default_role: String,
    /// When true, a transaction's category must match its budget's category
    #[serde(default)]
    pub strict_category_match: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_team: default_team(),
            allowed_teams: default_allowed_teams(),
            default_currency: default_currency(),
            allowed_currencies: default_allowed_currencies(),
            default_communication_preference: default_communication_preference(),
            default_role: default_role(),
            strict_category_match: false,
        }
    }
}

impl AppConfig {
    /// Parses the configured self-registration role.
    ///
    /// Registration paths must not infer the role from caller input; this
    /// constant is the single source of truth.
    pub fn registration_role(&self) -> Result<Role> {
        Role::parse(&self.default_role)
    }

    /// Whether `team` is one of the allowed team names.
    #[must_use]
    pub fn is_allowed_team(&self, team: &str) -> bool {
        self.allowed_teams.iter().any(|t| t == team)
    }

    /// Whether `currency` is one of the accepted currencies.
    #[must_use]
    pub fn is_allowed_currency(&self, currency: &str) -> bool {
        self.allowed_currencies.iter().any(|c| c == currency)
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The configured default role is not a recognized role value
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    // Fail fast on a bad role constant rather than at first registration
    config.registration_role()?;
    Ok(config)
}

/// Loads application configuration from the default location (./config.toml),
/// falling back to the stock defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    if Path::new("config.toml").exists() {
        load_config("config.toml")
    } else {
        Ok(AppConfig::default())
    }
}
