//! Application settings loaded via OrthoConfig.
//!
//! Values come from `TRACKER_*` environment variables, an optional
//! configuration file, or command-line flags. They are read once at startup
//! and passed to the services that need them.

use std::fmt;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::auth::Authenticator;

/// Errors raised when interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown environment `{value}`; expected development or production")]
    UnknownEnvironment { value: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Init data signatures are not checked.
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(SettingsError::UnknownEnvironment {
                value: value.to_owned(),
            }),
        }
    }
}

/// Settings for the tracker core.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRACKER")]
pub struct AppSettings {
    /// Deployment environment, `development` or `production`.
    pub environment: Option<String>,
    /// Telegram bot token used to verify init data signatures.
    pub bot_token: Option<String>,
    /// Quantity at or below which a product counts as low stock.
    #[ortho_config(default = 10)]
    pub low_stock_threshold: u32,
}

impl AppSettings {
    /// Parsed environment, defaulting to development.
    pub fn environment(&self) -> Result<Environment, SettingsError> {
        self.environment
            .as_deref()
            .map_or(Ok(Environment::default()), |raw| raw.parse())
    }

    /// Bot token wrapped so it is wiped from memory on drop.
    ///
    /// Blank tokens count as unset.
    pub fn bot_token(&self) -> Option<Zeroizing<String>> {
        self.bot_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Zeroizing::new(token.to_owned()))
    }

    /// Build the request authenticator for these settings.
    pub fn authenticator(&self) -> Result<Authenticator, SettingsError> {
        Ok(Authenticator::new(self.environment()?, self.bot_token()))
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("environment", &self.environment)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("low_stock_threshold", &self.low_stock_threshold)
            .finish()
    }
}
