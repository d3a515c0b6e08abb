//! Caller identification from Telegram init data.
//!
//! The mini app sends its signed init data in [`INIT_DATA_HEADER`]. The
//! lookup path treats a missing or unverifiable header as anonymous; the
//! enforcement path turns that into an `Unauthorized` error.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::Environment;
use crate::domain::Error;
use crate::domain::init_data::{telegram_user_id, verify_init_data};

/// Header carrying the raw init data query string.
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// Resolves the Telegram id of the caller.
#[derive(Clone)]
pub struct Authenticator {
    environment: Environment,
    bot_token: Option<Zeroizing<String>>,
}

impl Authenticator {
    pub fn new(environment: Environment, bot_token: Option<Zeroizing<String>>) -> Self {
        Self {
            environment,
            bot_token,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Telegram id of the caller, if the header identifies one.
    ///
    /// In development the signature is not checked. Elsewhere a missing bot
    /// token or a bad signature yields `None`.
    pub fn current_user(&self, header: Option<&str>) -> Option<i64> {
        let init_data = header.filter(|value| !value.trim().is_empty())?;

        if self.environment == Environment::Development {
            warn!("init data signature check skipped in development");
            return telegram_user_id(init_data);
        }

        let Some(bot_token) = self.bot_token.as_ref() else {
            warn!("bot token is not configured; rejecting init data");
            return None;
        };
        if !verify_init_data(init_data, bot_token) {
            debug!("init data signature did not verify");
            return None;
        }
        telegram_user_id(init_data)
    }

    /// Like [`Self::current_user`], failing with `Unauthorized` on `None`.
    pub fn require_user(&self, header: Option<&str>) -> Result<i64, Error> {
        self.current_user(header)
            .ok_or_else(|| Error::unauthorized("Telegram authorisation is required"))
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("environment", &self.environment)
            .field("bot_token_configured", &self.bot_token.is_some())
            .finish()
    }
}
