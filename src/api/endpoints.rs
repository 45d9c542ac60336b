// URL builders for the Riot endpoints this tool consumes. Path segments are
// percent-encoded by `url`, so Riot IDs with spaces or unicode are safe.
use crate::error::AppError;
use url::Url;

const API_DOMAIN: &str = "api.riotgames.com";

fn api_url(host: &str, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = Url::parse(&format!("https://{}.{}", host, API_DOMAIN))
        .map_err(|e| AppError::InvalidRequest(format!("invalid routing host {:?}: {}", host, e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::InvalidRequest(format!("invalid routing host {:?}", host)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub fn account_by_riot_id(regional: &str, game_name: &str, tag_line: &str) -> Result<String, AppError> {
    api_url(
        regional,
        &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
    )
    .map(String::from)
}

pub fn summoner_by_puuid(platform: &str, puuid: &str) -> Result<String, AppError> {
    api_url(platform, &["lol", "summoner", "v4", "summoners", "by-puuid", puuid]).map(String::from)
}

pub fn league_entries_by_summoner(platform: &str, summoner_id: &str) -> Result<String, AppError> {
    api_url(platform, &["lol", "league", "v4", "entries", "by-summoner", summoner_id])
        .map(String::from)
}

pub fn match_ids_by_puuid(
    regional: &str,
    puuid: &str,
    start: u32,
    count: u32,
) -> Result<String, AppError> {
    let mut url = api_url(regional, &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"])?;
    url.query_pairs_mut()
        .append_pair("start", &start.to_string())
        .append_pair("count", &count.to_string());
    Ok(url.into())
}

pub fn match_by_id(regional: &str, match_id: &str) -> Result<String, AppError> {
    api_url(regional, &["lol", "match", "v5", "matches", match_id]).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_url_encodes_riot_id() {
        let url = account_by_riot_id("europe", "Le Rat", "EUW").unwrap();
        assert_eq!(
            url,
            "https://europe.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Le%20Rat/EUW"
        );
    }

    #[test]
    fn match_ids_url_carries_window() {
        let url = match_ids_by_puuid("americas", "abc", 20, 100).unwrap();
        assert_eq!(
            url,
            "https://americas.api.riotgames.com/lol/match/v5/matches/by-puuid/abc/ids?start=20&count=100"
        );
    }

    #[test]
    fn platform_hosts_are_used_for_shard_data() {
        assert_eq!(
            summoner_by_puuid("kr", "p1").unwrap(),
            "https://kr.api.riotgames.com/lol/summoner/v4/summoners/by-puuid/p1"
        );
        assert_eq!(
            league_entries_by_summoner("euw1", "s1").unwrap(),
            "https://euw1.api.riotgames.com/lol/league/v4/entries/by-summoner/s1"
        );
        assert_eq!(
            match_by_id("europe", "EUW1_42").unwrap(),
            "https://europe.api.riotgames.com/lol/match/v5/matches/EUW1_42"
        );
    }
}
