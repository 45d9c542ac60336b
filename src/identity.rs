use crate::api::client::RiotApiClient;
use crate::api::models::{AccountDto, LeagueEntryDto, SummonerDto};
use crate::error::AppError;
use crate::region::region_info;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Everything known about a player after lookup. `summoner` is absent when
/// the account has no profile on the resolved shard; `league` is then empty.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Bootstrap {
    pub account: AccountDto,
    pub summoner: Option<SummonerDto>,
    pub league: Vec<LeagueEntryDto>,
    pub platform: String,
    pub regional: String,
}

impl Bootstrap {
    pub fn puuid(&self) -> &str {
        &self.account.puuid
    }

    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.account.game_name, self.account.tag_line)
    }
}

pub fn resolve_identity(
    client: &RiotApiClient,
    game_name: &str,
    tag_line: &str,
    server: &str,
) -> Result<Bootstrap, AppError> {
    if game_name.trim().is_empty() || tag_line.trim().is_empty() {
        return Err(AppError::InvalidRequest("name & tag required".to_string()));
    }

    let routing = region_info(server);

    // The account is mandatory, everything after it is best effort.
    let account = client.get_account(routing.regional, game_name, tag_line)?;

    let summoner = match client.get_summoner(routing.platform, &account.puuid) {
        Ok(summoner) => {
            debug!(has_id = summoner.summoner_id.is_some(), "summoner found");
            Some(summoner)
        }
        Err(e) => {
            warn!(platform = routing.platform, error = %e, "summoner by-puuid failed");
            None
        }
    };

    let summoner_id = summoner
        .as_ref()
        .and_then(|s| s.summoner_id.as_deref())
        .filter(|id| !id.is_empty());

    let league = match summoner_id {
        Some(id) => client
            .get_league_entries(routing.platform, id)
            .unwrap_or_else(|e| {
                warn!(platform = routing.platform, error = %e, "league entries failed");
                Vec::new()
            }),
        None => {
            debug!(platform = routing.platform, "no summoner id on this shard, league skipped");
            Vec::new()
        }
    };

    Ok(Bootstrap {
        account,
        summoner,
        league,
        platform: routing.platform.to_string(),
        regional: routing.regional.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::{json, text, FakeTransport};
    use crate::api::transport::HttpResponse;
    use crate::config::ApiKey;
    use serde_json::json;
    use std::sync::Arc;

    fn account() -> HttpResponse {
        json(200, json!({ "puuid": "p-1", "gameName": "Faker", "tagLine": "KR1" }))
    }

    fn resolve(handler: impl Fn(&str) -> HttpResponse + Send + Sync + 'static) -> (Result<Bootstrap, AppError>, Vec<String>) {
        let transport = Arc::new(FakeTransport::new(handler));
        let client = RiotApiClient::new(transport.clone(), ApiKey::Fixed("k".into()), 1000);
        let result = resolve_identity(&client, "Faker", "KR1", "KR");
        (result, transport.urls())
    }

    #[test]
    fn full_profile() {
        let (result, urls) = resolve(|url| {
            if url.contains("/accounts/") {
                account()
            } else if url.contains("/summoners/") {
                json(200, json!({ "id": "enc-1", "profileIconId": 6, "summonerLevel": 700 }))
            } else {
                json(200, json!([{
                    "queueType": "RANKED_SOLO_5x5", "tier": "CHALLENGER", "rank": "I",
                    "leaguePoints": 1200, "wins": 300, "losses": 250
                }]))
            }
        });

        let boot = result.unwrap();
        assert_eq!(boot.puuid(), "p-1");
        assert_eq!(boot.riot_id(), "Faker#KR1");
        assert_eq!(boot.summoner.as_ref().map(|s| s.summoner_level), Some(700));
        assert_eq!(boot.league.len(), 1);
        assert_eq!((boot.platform.as_str(), boot.regional.as_str()), ("kr", "asia"));
        assert_eq!(urls.len(), 3);
        assert!(urls[0].starts_with("https://asia.api.riotgames.com/riot/account"));
        assert!(urls[2].ends_with("/by-summoner/enc-1"));
    }

    #[test]
    fn missing_shard_profile_degrades() {
        let (result, urls) = resolve(|url| {
            if url.contains("/accounts/") {
                account()
            } else {
                text(404, "{\"status\":{\"message\":\"Data not found\"}}")
            }
        });

        let boot = result.unwrap();
        assert_eq!(boot.summoner, None);
        assert!(boot.league.is_empty());
        // league is never asked for without a summoner id
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn summoner_without_id_skips_league() {
        let (result, urls) = resolve(|url| {
            if url.contains("/accounts/") {
                account()
            } else {
                json(200, json!({ "profileIconId": 6, "summonerLevel": 30 }))
            }
        });

        let boot = result.unwrap();
        assert!(boot.summoner.is_some());
        assert!(boot.league.is_empty());
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn league_failure_is_an_empty_list() {
        let (result, _) = resolve(|url| {
            if url.contains("/accounts/") {
                account()
            } else if url.contains("/summoners/") {
                json(200, json!({ "id": "enc-1", "summonerLevel": 30 }))
            } else {
                text(500, "boom")
            }
        });

        let boot = result.unwrap();
        assert!(boot.summoner.is_some());
        assert!(boot.league.is_empty());
    }

    #[test]
    fn unknown_account_fails_whole_lookup() {
        let (result, urls) = resolve(|_| text(404, ""));
        assert!(matches!(result, Err(AppError::PlayerNotFound(_))));
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn upstream_account_error_propagates() {
        let (result, _) = resolve(|_| text(403, "forbidden"));
        assert!(matches!(result, Err(AppError::Upstream { status: 403, .. })));
    }

    #[test]
    fn blank_tag_is_rejected_before_network() {
        let transport = Arc::new(FakeTransport::new(|_| account()));
        let client = RiotApiClient::new(transport.clone(), ApiKey::Fixed("k".into()), 1000);
        let err = resolve_identity(&client, "Faker", "", "KR").unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(transport.requests().is_empty());
    }
}
