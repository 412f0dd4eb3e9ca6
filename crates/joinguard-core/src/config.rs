use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration for the gatekeeper, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// The channel the bot is expected to guard. The Telegram API already
    /// scopes updates to the bot token; this is kept for operator visibility.
    pub channel_id: String,
    /// Fixed delay between poll passes. Bounds the request rate; not adaptive.
    pub poll_interval: Duration,
    /// How long the getUpdates call may block server-side when idle.
    pub long_poll_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let channel_id = env_str("TELEGRAM_CHANNEL_ID").unwrap_or_default();
        if channel_id.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_CHANNEL_ID environment variable is required".to_string(),
            ));
        }

        let poll_interval = Duration::from_millis(env_u64("POLL_INTERVAL_MS").unwrap_or(5_000));
        let long_poll_timeout =
            Duration::from_secs(env_u64("LONG_POLL_TIMEOUT_SECS").unwrap_or(30));

        Ok(Self {
            telegram_bot_token,
            channel_id,
            poll_interval,
            long_poll_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}
