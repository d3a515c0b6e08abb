//! Check a Telegram init data payload against the configured bot token.
//!
//! The payload is taken from `--init-data` or, when omitted, from standard
//! input. The bot token comes from `--bot-token` or `TRACKER_BOT_TOKEN`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Read};

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use tracker::config::AppSettings;
use tracker::domain::init_data::{telegram_user, verify_init_data};
use zeroize::Zeroizing;

/// `verify-init-data` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "verify-init-data",
    about = "Verify the signature of Telegram mini app init data",
    version
)]
struct CliArgs {
    /// Raw init data query string. Read from stdin when omitted.
    #[arg(long = "init-data", value_name = "query")]
    init_data: Option<String>,
    /// Bot token. Falls back to `TRACKER_BOT_TOKEN` when omitted.
    #[arg(long = "bot-token", value_name = "token")]
    bot_token: Option<String>,
}

/// Outcome printed for a checked payload.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Verdict {
    valid: bool,
    telegram_id: Option<i64>,
}

impl Verdict {
    fn render(&self) -> String {
        let telegram_id = self
            .telegram_id
            .map_or_else(|| "none".to_owned(), |id| id.to_string());
        format!("valid={}\ntelegram_id={telegram_id}", self.valid)
    }
}

fn check(init_data: &str, bot_token: &str) -> Verdict {
    let valid = verify_init_data(init_data, bot_token);
    let telegram_id = valid
        .then(|| telegram_user(init_data))
        .flatten()
        .map(|user| user.id);
    Verdict { valid, telegram_id }
}

fn read_payload(argument: Option<String>, mut input: impl Read) -> Result<String> {
    let raw = match argument {
        Some(raw) => raw,
        None => {
            let mut buffer = String::new();
            input
                .read_to_string(&mut buffer)
                .wrap_err("failed to read init data from stdin")?;
            buffer
        }
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(eyre!("init data is empty"));
    }
    Ok(trimmed.to_owned())
}

fn resolve_bot_token(argument: Option<String>) -> Result<Zeroizing<String>> {
    if let Some(token) = argument.filter(|token| !token.trim().is_empty()) {
        return Ok(Zeroizing::new(token.trim().to_owned()));
    }
    let settings = AppSettings::load_from_iter([OsString::from("verify-init-data")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    settings
        .bot_token()
        .ok_or_else(|| eyre!("no bot token given; pass --bot-token or set TRACKER_BOT_TOKEN"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let init_data = read_payload(args.init_data, io::stdin().lock())?;
    let bot_token = resolve_bot_token(args.bot_token)?;

    let verdict = check(&init_data, &bot_token);
    println!("{}", verdict.render());
    if !verdict.valid {
        return Err(eyre!("init data signature is invalid"));
    }
    info!(telegram_id = ?verdict.telegram_id, "init data verified");
    Ok(())
}
