//! Descriptive statistics over the games one player took part in.
//!
//! Everything here is a pure function of the player id, the (already
//! filtered) matches and the optional reference lookup. Per-game values are
//! `None` when no game was selected, which is rendered as [`NO_DATA`] and
//! must never be confused with a real zero.

use super::champion_stats::{ChampionStats, ChampionStatsTracker};
use super::ranking::{FrequencyCounter, RankedId};
use crate::api::models::{MatchDto, ParticipantDto};
use crate::reference::ReferenceLookup;
use serde::Serialize;

pub const NO_DATA: &str = "—";

pub const TOP_ITEMS: usize = 8;
pub const TOP_SPELLS: usize = 4;
pub const TOP_STYLES: usize = 3;
pub const TOP_KEYSTONES: usize = 6;
pub const TOP_CHAMPIONS: usize = 8;

const UNKNOWN_CHAMPION: &str = "Unknown";

/// A per-game value, `None` when there is no game to average over.
pub type Metric = Option<f64>;

/// Sum over all selected games plus the per-game average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub total: i64,
    pub per_game: Metric,
}

impl Stat {
    fn over(parts: &[&ParticipantDto], field: impl Fn(&ParticipantDto) -> i64) -> Stat {
        let total = parts.iter().map(|&p| field(p)).sum();
        Stat {
            total,
            per_game: average(total, parts.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: Metric,
    pub kda: Metric,
    pub damage_to_champions: Metric,
    pub vision_score: Metric,
    pub gold_earned: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Combat {
    pub kills: Stat,
    pub deaths: Stat,
    pub assists: Stat,
    pub largest_killing_spree: i64,
    pub largest_multi_kill: i64,
    pub largest_critical_strike: i64,
    pub max_champ_level: i64,
    pub quadra_kills: i64,
    pub penta_kills: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageDealt {
    pub total: Stat,
    pub to_champions: Stat,
    pub physical: Stat,
    pub physical_to_champions: Stat,
    pub magic: Stat,
    pub magic_to_champions: Stat,
    pub true_damage: Stat,
    pub true_to_champions: Stat,
    pub to_turrets: Stat,
    pub to_objectives: Stat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tanking {
    pub taken: Stat,
    pub physical: Stat,
    pub magic: Stat,
    pub true_damage: Stat,
    pub self_mitigated: Stat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Objectives {
    pub turret_kills: Stat,
    pub turret_takedowns: Stat,
    pub inhibitor_kills: Stat,
    pub inhibitor_takedowns: Stat,
    pub barons: Stat,
    pub dragons: Stat,
    pub heralds: Stat,
    pub stolen: Stat,
    pub stolen_assists: Stat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vision {
    pub score: Stat,
    pub wards_placed: Stat,
    pub wards_killed: Stat,
    pub control_wards_bought: Stat,
    pub detectors_placed: Stat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Economy {
    pub gold_earned: Stat,
    pub gold_spent: Stat,
    pub minions: Stat,
    pub neutral_minions: Stat,
    pub ally_jungle: Stat,
    pub enemy_jungle: Stat,
    pub consumables: Stat,
    pub items_purchased: Stat,
    pub top_items: Vec<RankedId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellsRunes {
    pub top_spells: Vec<RankedId>,
    pub primary_styles: Vec<RankedId>,
    pub secondary_styles: Vec<RankedId>,
    pub keystones: Vec<RankedId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub time_dead: Stat,
    pub longest_time_alive: i64,
    pub cc_time: Stat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub kpis: Kpis,
    pub combat: Combat,
    pub damage: DamageDealt,
    pub tanking: Tanking,
    pub objectives: Objectives,
    pub vision: Vision,
    pub economy: Economy,
    pub spells_runes: SpellsRunes,
    pub timing: Timing,
    pub champions: Vec<ChampionStats>,
}

pub fn kda(kills: i64, deaths: i64, assists: i64) -> f64 {
    let takedowns = (kills + assists) as f64;
    if deaths > 0 {
        takedowns / deaths as f64
    } else {
        takedowns
    }
}

fn average(total: i64, games: usize) -> Metric {
    (games > 0).then(|| total as f64 / games as f64)
}

fn max_of(parts: &[&ParticipantDto], field: impl Fn(&ParticipantDto) -> i64) -> i64 {
    parts.iter().map(|&p| field(p)).max().unwrap_or(0)
}

pub fn aggregate(
    puuid: &str,
    matches: &[&MatchDto],
    lookup: Option<&dyn ReferenceLookup>,
) -> AggregateSummary {
    // games without this player are stale or malformed; skip them
    let parts: Vec<&ParticipantDto> = matches.iter().filter_map(|m| m.participant(puuid)).collect();
    let n = parts.len();

    let kills = Stat::over(&parts, |p| p.kills);
    let deaths = Stat::over(&parts, |p| p.deaths);
    let assists = Stat::over(&parts, |p| p.assists);
    let wins = parts.iter().filter(|p| p.win).count();

    let damage = DamageDealt {
        total: Stat::over(&parts, |p| p.total_damage_dealt),
        to_champions: Stat::over(&parts, |p| p.total_damage_dealt_to_champions),
        physical: Stat::over(&parts, |p| p.physical_damage_dealt),
        physical_to_champions: Stat::over(&parts, |p| p.physical_damage_dealt_to_champions),
        magic: Stat::over(&parts, |p| p.magic_damage_dealt),
        magic_to_champions: Stat::over(&parts, |p| p.magic_damage_dealt_to_champions),
        true_damage: Stat::over(&parts, |p| p.true_damage_dealt),
        true_to_champions: Stat::over(&parts, |p| p.true_damage_dealt_to_champions),
        to_turrets: Stat::over(&parts, |p| p.damage_dealt_to_turrets),
        to_objectives: Stat::over(&parts, |p| p.damage_dealt_to_objectives),
    };

    let vision = Vision {
        score: Stat::over(&parts, |p| p.vision_score),
        wards_placed: Stat::over(&parts, |p| p.wards_placed),
        wards_killed: Stat::over(&parts, |p| p.wards_killed),
        control_wards_bought: Stat::over(&parts, |p| p.vision_wards_bought_in_game),
        detectors_placed: Stat::over(&parts, |p| p.detector_wards_placed),
    };

    let mut items = FrequencyCounter::new();
    let mut spells = FrequencyCounter::new();
    let mut primary_styles = FrequencyCounter::new();
    let mut secondary_styles = FrequencyCounter::new();
    let mut keystones = FrequencyCounter::new();
    let mut champions = ChampionStatsTracker::new();

    for p in &parts {
        items.add_present(p.items());
        spells.add_present(p.spells());
        primary_styles.add_present(p.primary_style().map(|s| s.style));
        secondary_styles.add_present(p.secondary_style().map(|s| s.style));
        keystones.add_present(p.keystone());

        let meta = lookup.and_then(|l| l.champion(&p.champion_name, p.champion_id));
        match meta {
            Some(meta) => champions.add_game(&meta.id, &meta.name, p.win),
            None if !p.champion_name.is_empty() => {
                champions.add_game(&p.champion_name, &p.champion_name, p.win)
            }
            None => champions.add_game(UNKNOWN_CHAMPION, UNKNOWN_CHAMPION, p.win),
        }
    }

    let economy = Economy {
        gold_earned: Stat::over(&parts, |p| p.gold_earned),
        gold_spent: Stat::over(&parts, |p| p.gold_spent),
        minions: Stat::over(&parts, |p| p.total_minions_killed),
        neutral_minions: Stat::over(&parts, |p| p.neutral_minions_killed),
        ally_jungle: Stat::over(&parts, |p| p.ally_jungle_minions()),
        enemy_jungle: Stat::over(&parts, |p| p.enemy_jungle_minions()),
        consumables: Stat::over(&parts, |p| p.consumables_purchased),
        items_purchased: Stat::over(&parts, |p| p.items_purchased),
        top_items: items.top(TOP_ITEMS),
    };

    AggregateSummary {
        kpis: Kpis {
            games: n,
            wins,
            losses: n - wins,
            win_rate: (n > 0).then(|| wins as f64 / n as f64 * 100.0),
            kda: (n > 0).then(|| kda(kills.total, deaths.total, assists.total)),
            damage_to_champions: damage.to_champions.per_game,
            vision_score: vision.score.per_game,
            gold_earned: economy.gold_earned.per_game,
        },
        combat: Combat {
            kills,
            deaths,
            assists,
            largest_killing_spree: max_of(&parts, |p| p.largest_killing_spree),
            largest_multi_kill: max_of(&parts, |p| p.largest_multi_kill),
            largest_critical_strike: max_of(&parts, |p| p.largest_critical_strike),
            max_champ_level: max_of(&parts, |p| p.champ_level),
            quadra_kills: Stat::over(&parts, |p| p.quadra_kills).total,
            penta_kills: Stat::over(&parts, |p| p.penta_kills).total,
        },
        damage,
        tanking: Tanking {
            taken: Stat::over(&parts, |p| p.total_damage_taken),
            physical: Stat::over(&parts, |p| p.physical_damage_taken),
            magic: Stat::over(&parts, |p| p.magic_damage_taken),
            true_damage: Stat::over(&parts, |p| p.true_damage_taken),
            self_mitigated: Stat::over(&parts, |p| p.damage_self_mitigated),
        },
        objectives: Objectives {
            turret_kills: Stat::over(&parts, |p| p.turret_kills),
            turret_takedowns: Stat::over(&parts, |p| p.turret_takedowns),
            inhibitor_kills: Stat::over(&parts, |p| p.inhibitor_kills),
            inhibitor_takedowns: Stat::over(&parts, |p| p.inhibitor_takedowns),
            barons: Stat::over(&parts, |p| p.baron_kills),
            dragons: Stat::over(&parts, |p| p.dragon_kills),
            heralds: Stat::over(&parts, |p| p.rift_herald_kills),
            stolen: Stat::over(&parts, |p| p.objectives_stolen),
            stolen_assists: Stat::over(&parts, |p| p.objectives_stolen_assists),
        },
        vision,
        economy,
        spells_runes: SpellsRunes {
            top_spells: spells.top(TOP_SPELLS),
            primary_styles: primary_styles.top(TOP_STYLES),
            secondary_styles: secondary_styles.top(TOP_STYLES),
            keystones: keystones.top(TOP_KEYSTONES),
        },
        timing: Timing {
            time_dead: Stat::over(&parts, |p| p.total_time_spent_dead),
            longest_time_alive: max_of(&parts, |p| p.longest_time_spent_living),
            cc_time: Stat::over(&parts, |p| p.time_ccing_others),
        },
        champions: champions.most_played(TOP_CHAMPIONS),
    }
}

/// `—` for missing data, otherwise fixed decimals.
pub fn fmt_metric(metric: Metric, decimals: usize) -> String {
    match metric {
        Some(value) => format!("{:.*}", decimals, value),
        None => NO_DATA.to_string(),
    }
}

pub fn fmt_percent(metric: Metric) -> String {
    match metric {
        Some(value) => format!("{:.0}%", value),
        None => NO_DATA.to_string(),
    }
}
