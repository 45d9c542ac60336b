use crate::api::client::RiotApiClient;
use crate::api::models::MatchSlot;
use crate::error::AppError;
use crate::pool::bounded_map;
use crate::region::region_info;
use tracing::{debug, error};

/// Default number of match requests in flight, kept under ~20 req/s.
pub const DEFAULT_CONCURRENCY: usize = 12;

/// Fetches every id in `ids`, at most `concurrency` at a time.
///
/// The output has one slot per input id, in input order. A failed id turns
/// into a placeholder carrying the error message; it never aborts the
/// batch. Only an empty input is an error.
pub fn fetch_matches(
    client: &RiotApiClient,
    ids: &[String],
    server: &str,
    concurrency: usize,
) -> Result<Vec<MatchSlot>, AppError> {
    if ids.is_empty() {
        return Err(AppError::InvalidRequest("matchIds required".to_string()));
    }

    let routing = region_info(server);
    debug!(count = ids.len(), concurrency, regional = routing.regional, "fetching matches");

    Ok(bounded_map(ids, concurrency, |id| {
        fetch_one(client, routing.regional, id)
    }))
}

fn fetch_one(client: &RiotApiClient, regional: &str, match_id: &str) -> MatchSlot {
    match client.get_match(regional, match_id) {
        Ok(record) if record.id().trim().is_empty() => {
            error!(%match_id, "match body without matchId");
            MatchSlot::failed(match_id, "match body without matchId")
        }
        Ok(record) if record.id() != match_id => {
            error!(%match_id, returned = record.id(), "match body for another id");
            MatchSlot::failed(match_id, format!("match body for another id: {}", record.id()))
        }
        Ok(record) => MatchSlot::Record(Box::new(record)),
        Err(e) => {
            error!(%match_id, error = %e, "match fetch failed");
            MatchSlot::failed(match_id, e.to_string())
        }
    }
}
