//! JSON request/response operations used by the presentation layer.
//!
//! Each operation takes a JSON body and always produces a response. Bad
//! input is answered with 400 before any upstream call, anything else that
//! fails with 500. Both carry `{"error": message}`.

use crate::api::client::RiotApiClient;
use crate::api::models::MatchSlot;
use crate::error::AppError;
use crate::identity::{resolve_identity, Bootstrap};
use crate::matches::fetcher::fetch_matches;
use crate::matches::ids::{list_match_ids, MAX_PAGE};
use crate::pipeline::MatchSource;
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Bootstrap,
    MatchIds,
    Matches,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Value,
}

impl ServiceResponse {
    fn ok(body: Value) -> Self {
        ServiceResponse { status: 200, body }
    }

    fn error(e: &AppError) -> Self {
        ServiceResponse {
            status: e.status(),
            body: json!({ "error": e.to_string() }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BootstrapRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    tag: String,
    server: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchIdsRequest {
    #[serde(default)]
    puuid: String,
    server: Option<String>,
    #[serde(default = "default_count")]
    count: i64,
    #[serde(default)]
    start: u32,
}

fn default_count() -> i64 {
    MAX_PAGE as i64
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchesRequest {
    #[serde(default)]
    match_ids: Vec<String>,
    server: Option<String>,
}

fn parse<T: DeserializeOwned>(body: &Value) -> Result<T, AppError> {
    serde_json::from_value(body.clone())
        .map_err(|e| AppError::InvalidRequest(format!("malformed body: {}", e)))
}

/// Owns the Riot client and the fetch concurrency. The pipeline talks to it
/// through [`MatchSource`], the CLI `call` command through
/// [`MatchService::handle`].
pub struct MatchService {
    client: RiotApiClient,
    concurrency: usize,
    default_server: String,
}

impl MatchService {
    pub fn new(client: RiotApiClient, concurrency: usize, default_server: impl Into<String>) -> Self {
        MatchService {
            client,
            concurrency,
            default_server: default_server.into(),
        }
    }

    fn server<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        requested
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.default_server)
    }

    pub fn handle(&self, operation: Operation, body: &Value) -> ServiceResponse {
        let result = match operation {
            Operation::Bootstrap => self.bootstrap_json(body),
            Operation::MatchIds => self.match_ids_json(body),
            Operation::Matches => self.matches_json(body),
        };

        match result {
            Ok(body) => ServiceResponse::ok(body),
            Err(e) => {
                error!(?operation, error = %e, "service call failed");
                ServiceResponse::error(&e)
            }
        }
    }

    fn bootstrap_json(&self, body: &Value) -> Result<Value, AppError> {
        let req: BootstrapRequest = parse(body)?;
        let bootstrap = resolve_identity(&self.client, &req.name, &req.tag, self.server(&req.server))?;
        Ok(serde_json::to_value(bootstrap)?)
    }

    fn match_ids_json(&self, body: &Value) -> Result<Value, AppError> {
        let req: MatchIdsRequest = parse(body)?;
        let ids = list_match_ids(&self.client, &req.puuid, self.server(&req.server), req.count, req.start)?;
        Ok(json!({ "ids": ids }))
    }

    fn matches_json(&self, body: &Value) -> Result<Value, AppError> {
        let req: MatchesRequest = parse(body)?;
        let slots = fetch_matches(&self.client, &req.match_ids, self.server(&req.server), self.concurrency)?;
        Ok(json!({ "matches": slots }))
    }
}

impl MatchSource for MatchService {
    fn bootstrap(&self, game_name: &str, tag_line: &str, server: &str) -> Result<Bootstrap, AppError> {
        resolve_identity(&self.client, game_name, tag_line, server)
    }

    fn match_ids(&self, puuid: &str, server: &str, count: i64, start: u32) -> Result<Vec<String>, AppError> {
        list_match_ids(&self.client, puuid, server, count, start)
    }

    fn matches(&self, ids: &[String], server: &str) -> Result<Vec<MatchSlot>, AppError> {
        fetch_matches(&self.client, ids, server, self.concurrency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::{json, text, FakeTransport};
    use crate::api::transport::HttpResponse;
    use crate::config::ApiKey;
    use std::sync::Arc;

    fn service(handler: impl Fn(&str) -> HttpResponse + Send + Sync + 'static) -> (MatchService, Arc<FakeTransport>) {
        let transport = Arc::new(FakeTransport::new(handler));
        let client = RiotApiClient::new(transport.clone(), ApiKey::Fixed("k".into()), 1000);
        (MatchService::new(client, 4, "EUW"), transport)
    }

    fn riot(url: &str) -> HttpResponse {
        if url.contains("/accounts/by-riot-id/") {
            json(200, json!({ "puuid": "p-1", "gameName": "Faker", "tagLine": "KR1" }))
        } else if url.contains("/summoners/by-puuid/") {
            json(200, json!({ "profileIconId": 7, "summonerLevel": 500 }))
        } else if url.contains("/ids?") {
            json(200, json!(["EUW1_1", "EUW1_2"]))
        } else if url.ends_with("EUW1_404") {
            text(404, "{}")
        } else if let Some(id) = url.rsplit('/').next() {
            json(200, json!({ "metadata": { "matchId": id }, "info": { "queueId": 420, "participants": [] } }))
        } else {
            text(500, "")
        }
    }

    #[test]
    fn bootstrap_returns_identity_and_routing() {
        let (svc, transport) = service(riot);
        let res = svc.handle(Operation::Bootstrap, &json!({ "name": "Faker", "tag": "KR1", "server": "kr" }));

        assert_eq!(res.status, 200);
        assert_eq!(res.body["account"]["puuid"], "p-1");
        assert_eq!(res.body["platform"], "kr");
        assert_eq!(res.body["regional"], "asia");
        assert_eq!(res.body["league"], json!([]));
        // no summoner id on the shard, so no league request
        assert_eq!(transport.urls().len(), 2);
    }

    #[test]
    fn bootstrap_without_tag_is_a_client_error() {
        let (svc, transport) = service(riot);
        let res = svc.handle(Operation::Bootstrap, &json!({ "name": "Faker" }));

        assert_eq!(res.status, 400);
        assert!(res.body["error"].as_str().unwrap().contains("name & tag required"));
        assert!(transport.urls().is_empty());
    }

    #[test]
    fn unknown_player_is_a_server_error() {
        let (svc, _) = service(|_| text(404, r#"{"status":{"status_code":404}}"#));
        let res = svc.handle(Operation::Bootstrap, &json!({ "name": "Nobody", "tag": "0000" }));

        assert_eq!(res.status, 500);
        assert_eq!(res.body, json!({ "error": "Player not found: Nobody#0000" }));
    }

    #[test]
    fn match_ids_defaults_window_and_server() {
        let (svc, transport) = service(riot);
        let res = svc.handle(Operation::MatchIds, &json!({ "puuid": "p-1" }));

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({ "ids": ["EUW1_1", "EUW1_2"] }));
        let url = &transport.urls()[0];
        assert!(url.starts_with("https://europe.api.riotgames.com/"));
        assert!(url.ends_with("?start=0&count=100"));
    }

    #[test]
    fn match_ids_clamps_count() {
        let (svc, transport) = service(riot);
        svc.handle(Operation::MatchIds, &json!({ "puuid": "p-1", "count": 500, "start": 20 }));
        assert!(transport.urls()[0].ends_with("?start=20&count=100"));
    }

    #[test]
    fn match_ids_requires_puuid() {
        let (svc, transport) = service(riot);
        assert_eq!(svc.handle(Operation::MatchIds, &json!({})).status, 400);
        assert!(transport.urls().is_empty());
    }

    #[test]
    fn matches_keep_one_slot_per_id() {
        let (svc, _) = service(riot);
        let res = svc.handle(Operation::Matches, &json!({ "matchIds": ["EUW1_1", "EUW1_404", "EUW1_3"] }));

        assert_eq!(res.status, 200);
        let slots = res.body["matches"].as_array().unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0]["metadata"]["matchId"], "EUW1_1");
        assert_eq!(slots[1]["metadata"]["matchId"], "EUW1_404");
        assert!(slots[1]["error"].as_str().unwrap().contains("404"));
        assert_eq!(slots[2]["info"]["queueId"], 420);
    }

    #[test]
    fn matches_reject_bad_bodies_before_network() {
        let (svc, transport) = service(riot);
        assert_eq!(svc.handle(Operation::Matches, &json!({ "matchIds": [] })).status, 400);
        assert_eq!(svc.handle(Operation::Matches, &json!({})).status, 400);
        assert_eq!(svc.handle(Operation::Matches, &json!({ "matchIds": "EUW1_1" })).status, 400);
        assert_eq!(svc.handle(Operation::Matches, &json!([1, 2])).status, 400);
        assert!(transport.urls().is_empty());
    }

    #[test]
    fn missing_key_is_a_server_error() {
        let transport = Arc::new(FakeTransport::new(riot));
        let client = RiotApiClient::new(transport.clone(), ApiKey::Fixed("  ".into()), 1000);
        let svc = MatchService::new(client, 4, "EUW");

        let res = svc.handle(Operation::MatchIds, &json!({ "puuid": "p-1" }));
        assert_eq!(res.status, 500);
        assert!(transport.urls().is_empty());
    }

    #[test]
    fn serves_as_pipeline_source() {
        let (svc, _) = service(riot);
        let source: &dyn MatchSource = &svc;

        let player = source.bootstrap("Faker", "KR1", "EUW").unwrap();
        let ids = source.match_ids(player.puuid(), "EUW", 5, 0).unwrap();
        let slots = source.matches(&ids, "EUW").unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].match_id(), "EUW1_2");
    }
}
