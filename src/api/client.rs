use crate::config::ApiKey;
use crate::error::AppError;
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

use super::endpoints;
use super::models::*;
use super::transport::Transport;

const TOKEN_HEADER: &str = "X-Riot-Token";

pub struct RiotApiClient {
    transport: Arc<dyn Transport>,
    api_key: ApiKey,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RiotApiClient {
    pub fn new(transport: Arc<dyn Transport>, api_key: ApiKey, requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));
        RiotApiClient {
            transport,
            api_key,
            rate_limiter,
        }
    }

    // Blocks until the per-second budget has room for one more request.
    fn throttle(&self) {
        let clock = DefaultClock::default();
        while let Err(not_until) = self.rate_limiter.check() {
            thread::sleep(not_until.wait_time_from(clock.now()));
        }
    }

    /// GET `url` with the Riot token injected. Never retries.
    pub fn fetch_authenticated(&self, url: &str) -> Result<Value, AppError> {
        let api_key = self.api_key.resolve()?;

        self.throttle();
        debug!("GET {}", url);
        let response = self
            .transport
            .get(url, &[(TOKEN_HEADER, api_key.as_str())])
            .map_err(|e| {
                warn!(%url, error = %e, "request failed");
                e
            })?;

        if !response.is_success() {
            warn!(
                %url,
                status = response.status,
                status_text = %response.status_text,
                body = %response.body,
                "riot api error"
            );
            return Err(AppError::Upstream {
                status: response.status,
                status_text: response.status_text,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            warn!(%url, error = %e, "malformed response body");
            AppError::JsonError(e.to_string())
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let value = self.fetch_authenticated(url)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn get_account(&self, regional: &str, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        let url = endpoints::account_by_riot_id(regional, game_name, tag_line)?;
        self.get_json(&url).map_err(|e| {
            if e.is_not_found() {
                AppError::PlayerNotFound(format!("{}#{}", game_name, tag_line))
            } else {
                e
            }
        })
    }

    pub fn get_summoner(&self, platform: &str, puuid: &str) -> Result<SummonerDto, AppError> {
        let url = endpoints::summoner_by_puuid(platform, puuid)?;
        self.get_json(&url)
    }

    pub fn get_league_entries(&self, platform: &str, summoner_id: &str) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = endpoints::league_entries_by_summoner(platform, summoner_id)?;
        self.get_json(&url)
    }

    pub fn get_match_ids(&self, regional: &str, puuid: &str, start: u32, count: u32) -> Result<Vec<String>, AppError> {
        let url = endpoints::match_ids_by_puuid(regional, puuid, start, count)?;
        self.get_json(&url)
    }

    pub fn get_match(&self, regional: &str, match_id: &str) -> Result<MatchDto, AppError> {
        let url = endpoints::match_by_id(regional, match_id)?;
        self.get_json(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::{json, text, FakeTransport};
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn client_with(transport: Arc<FakeTransport>, key: ApiKey) -> RiotApiClient {
        RiotApiClient::new(transport, key, 1000)
    }

    #[test]
    fn injects_token_header() {
        let transport = Arc::new(FakeTransport::new(|_| json(200, json!({ "ok": true }))));
        let client = client_with(transport.clone(), ApiKey::Fixed("RGAPI-1".into()));

        let value = client.fetch_authenticated("https://europe.api.riotgames.com/x").unwrap();
        assert_eq!(value, json!({ "ok": true }));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].url.contains("RGAPI-1"));
        assert_eq!(
            requests[0].headers,
            vec![("X-Riot-Token".to_string(), "RGAPI-1".to_string())]
        );
    }

    #[test]
    fn throttle_waits_for_the_next_slot() {
        let transport = Arc::new(FakeTransport::new(|_| json(200, json!({}))));
        let client = RiotApiClient::new(transport.clone(), ApiKey::Fixed("k".into()), 2);

        let started = Instant::now();
        for _ in 0..4 {
            client.fetch_authenticated("https://europe.api.riotgames.com/x").unwrap();
        }
        let elapsed = started.elapsed();

        // burst of two, then one slot every 500ms
        assert!(elapsed >= Duration::from_millis(900), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(5), "{:?}", elapsed);
        assert_eq!(transport.requests().len(), 4);
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let transport = Arc::new(FakeTransport::new(|_| json(200, json!({}))));
        let client = client_with(transport.clone(), ApiKey::Env("LEAGUE_RECAP_TEST_NO_SUCH_KEY".into()));

        let err = client.fetch_authenticated("https://europe.api.riotgames.com/x").unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn non_success_keeps_status_and_body() {
        let transport = Arc::new(FakeTransport::new(|_| text(403, "{\"status\":\"Forbidden\"}")));
        let client = client_with(transport.clone(), ApiKey::Fixed("k".into()));

        match client.fetch_authenticated("https://europe.api.riotgames.com/x") {
            Err(AppError::Upstream {
                status,
                status_text,
                body,
            }) => {
                assert_eq!(status, 403);
                assert_eq!(status_text, "Forbidden");
                assert_eq!(body, "{\"status\":\"Forbidden\"}");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
        // no internal retry
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        let transport = Arc::new(FakeTransport::new(|_| text(200, "<html>")));
        let client = client_with(transport, ApiKey::Fixed("k".into()));
        let err = client.fetch_authenticated("https://europe.api.riotgames.com/x").unwrap_err();
        assert!(matches!(err, AppError::JsonError(_)));
    }

    #[test]
    fn unknown_account_is_player_not_found() {
        let transport = Arc::new(FakeTransport::new(|_| text(404, "")));
        let client = client_with(transport, ApiKey::Fixed("k".into()));
        let err = client.get_account("europe", "Nobody", "000").unwrap_err();
        assert!(matches!(err, AppError::PlayerNotFound(ref who) if who == "Nobody#000"));
    }
}
