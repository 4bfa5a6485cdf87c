use std::path::PathBuf;
use std::time::Duration;

use log::warn;

const DEFAULT_ENGINE: &str = "gpt-3.5-turbo";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_DB_PATH: &str = "db.sqlite";
const DEFAULT_SCORES_PATH: &str = "best_scores.json";

/// Runtime settings, read from the environment (and `.env`).
///
/// The Telegram token is not part of it: teloxide reads `TELOXIDE_TOKEN`
/// itself in `Bot::from_env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` puts the bot in offline mode.
    pub chatgpt_api_key: Option<String>,
    pub chatgpt_engine: String,
    pub request_timeout: Duration,
    pub db_path: PathBuf,
    pub scores_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match get("QUIZ_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(
                        "Invalid QUIZ_TIMEOUT_SECS {:?}, using {}",
                        raw, DEFAULT_TIMEOUT_SECS
                    );
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            chatgpt_api_key: get("CHATGPT_API_KEY"),
            chatgpt_engine: get("CHATGPT_ENGINE").unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
            db_path: get("QUIZ_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
                .into(),
            scores_path: get("QUIZ_SCORES_PATH")
                .unwrap_or_else(|| DEFAULT_SCORES_PATH.to_string())
                .into(),
        }
    }
}
