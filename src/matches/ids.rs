use crate::api::client::RiotApiClient;
use crate::error::AppError;
use crate::region::region_info;

/// Upstream hard cap for one match-id page.
pub const MAX_PAGE: u32 = 100;

pub fn clamp_count(count: i64) -> u32 {
    count.clamp(1, MAX_PAGE as i64) as u32
}

/// Most recent first. `start` is an offset into the full history; no dedup
/// happens here.
pub fn list_match_ids(
    client: &RiotApiClient,
    puuid: &str,
    server: &str,
    count: i64,
    start: u32,
) -> Result<Vec<String>, AppError> {
    if puuid.trim().is_empty() {
        return Err(AppError::InvalidRequest("puuid required".to_string()));
    }

    let routing = region_info(server);
    client.get_match_ids(routing.regional, puuid, start, clamp_count(count))
}
