use crate::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const API_KEY_VAR: &str = "RIOT_API_KEY";

/// Where the Riot credential comes from. Resolved on every request so a
/// key added after startup is picked up.
#[derive(Debug, Clone)]
pub enum ApiKey {
    Fixed(String),
    Env(String),
}

impl ApiKey {
    pub fn resolve(&self) -> Result<String, AppError> {
        let key = match self {
            ApiKey::Fixed(key) => key.clone(),
            ApiKey::Env(var) => env::var(var).unwrap_or_default(),
        };

        if key.trim().is_empty() {
            let source = match self {
                ApiKey::Fixed(_) => "no API key configured".to_string(),
                ApiKey::Env(var) => format!("{} not found in environment or .env file", var),
            };
            return Err(AppError::ConfigError(source));
        }

        Ok(key)
    }
}

/// Backfill schedule. Both the cap and the delay are tuned against the
/// upstream rate limits (~20 req/s, ~100 req/2min).
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub concurrency: usize,
    pub preview_count: usize,
    pub history_limit: usize,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub requests_per_second: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy {
            concurrency: 12,
            preview_count: 5,
            history_limit: 100,
            batch_size: 20,
            batch_delay: Duration::from_secs(25),
            requests_per_second: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub server: String,
    pub policy: FetchPolicy,
    pub ddragon_locale: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = FetchPolicy::default();
        let policy = FetchPolicy {
            concurrency: parse_var("FETCH_CONCURRENCY", defaults.concurrency)?.max(1),
            preview_count: parse_var("PREVIEW_COUNT", defaults.preview_count)?.clamp(1, 100),
            history_limit: parse_var("HISTORY_LIMIT", defaults.history_limit)?.clamp(1, 100),
            batch_size: parse_var("BACKFILL_BATCH_SIZE", defaults.batch_size)?.max(1),
            batch_delay: Duration::from_secs(parse_var(
                "BACKFILL_BATCH_DELAY_SECS",
                defaults.batch_delay.as_secs(),
            )?),
            requests_per_second: parse_var(
                "RIOT_REQUESTS_PER_SECOND",
                defaults.requests_per_second,
            )?
            .max(1),
        };

        let server = env::var("RIOT_SERVER").unwrap_or_else(|_| "EUW".to_string());
        let ddragon_locale = env::var("DDRAGON_LOCALE").unwrap_or_else(|_| "en_US".to_string());

        Ok(Config {
            api_key: ApiKey::Env(API_KEY_VAR.to_string()),
            server,
            policy,
            ddragon_locale,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("{} must be a non-negative integer, got {:?}", name, raw))
        }),
        _ => Ok(default),
    }
}
