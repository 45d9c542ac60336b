use serde::Serialize;

pub const DEFAULT_SERVER: &str = "EUW";

/// Routing pair for one server: the platform shard hosts summoner and
/// league data, the regional cluster hosts accounts and matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Routing {
    pub platform: &'static str,
    pub regional: &'static str,
}

const fn routing(platform: &'static str, regional: &'static str) -> Routing {
    Routing { platform, regional }
}

const EUW: Routing = routing("euw1", "europe");

/// Resolves a server code. Unknown or empty codes fall back to EUW.
pub fn region_info(server: &str) -> Routing {
    match server.trim().to_ascii_uppercase().as_str() {
        "EUW" => EUW,
        "EUNE" => routing("eun1", "europe"),
        "NA" => routing("na1", "americas"),
        "KR" => routing("kr", "asia"),
        "JP" => routing("jp1", "asia"),
        "BR" => routing("br1", "americas"),
        "LAN" => routing("la1", "americas"),
        "LAS" => routing("la2", "americas"),
        "OCE" => routing("oc1", "americas"),
        "TR" => routing("tr1", "europe"),
        "RU" => routing("ru", "europe"),
        "PH" => routing("ph2", "sea"),
        "SG" => routing("sg2", "sea"),
        "TH" => routing("th2", "sea"),
        "TW" => routing("tw2", "sea"),
        "VN" => routing("vn2", "sea"),
        _ => EUW,
    }
}
