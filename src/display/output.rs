use crate::analysis::filter::queue_label;
use crate::analysis::ranking::RankedId;
use crate::analysis::stats::{fmt_metric, fmt_percent, kda, AggregateSummary, Stat};
use crate::api::models::{MatchDto, ParticipantDto};
use crate::identity::Bootstrap;
use crate::reference::{Category, ReferenceLookup};
use chrono::{DateTime, Local, Utc};
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct KpiRow {
    metric: String,
    value: String,
}

#[derive(Tabled)]
struct StatRow {
    metric: String,
    total: String,
    #[tabled(rename = "per game")]
    per_game: String,
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: String,
    name: String,
    picks: String,
}

#[derive(Tabled)]
struct ChampionRow {
    champion: String,
    games: String,
    #[tabled(rename = "W/L")]
    record: String,
    win_rate: String,
}

#[derive(Tabled)]
struct MatchRow {
    date: String,
    queue: String,
    champion: String,
    role: String,
    result: String,
    #[tabled(rename = "K/D/A")]
    kda: String,
    spells: String,
    items: String,
    duration: String,
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

fn section(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "=".repeat(60).cyan());
}

fn stat_row(metric: &str, stat: Stat) -> StatRow {
    StatRow {
        metric: metric.to_string(),
        total: stat.total.to_string(),
        per_game: fmt_metric(stat.per_game, 1),
    }
}

fn kpi(metric: &str, value: String) -> KpiRow {
    KpiRow {
        metric: metric.to_string(),
        value,
    }
}

/// `m:ss`, as shown by the client.
pub fn fmt_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn fmt_start(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn ranked_rows(ranked: &[RankedId], category: Category, lookup: &dyn ReferenceLookup) -> Vec<RankRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, r)| RankRow {
            rank: format!("#{}", idx + 1),
            name: lookup.label(category, r.id),
            picks: r.count.to_string(),
        })
        .collect()
}

fn ranked_table(title: &str, ranked: &[RankedId], category: Category, lookup: &dyn ReferenceLookup) {
    println!("\n{}", title.bold().yellow());
    if ranked.is_empty() {
        println!("{}", "No data".yellow());
        return;
    }
    print_table(ranked_rows(ranked, category, lookup));
}

pub fn display_player(player: &Bootstrap, profile_icon: Option<String>) {
    println!("\n{}", format!("🎮 {}", player.riot_id()).bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    match &player.summoner {
        Some(summoner) => println!("{} {}", "Level:".bold(), summoner.summoner_level),
        None => println!("{}", "No profile on this server".yellow()),
    }
    if let Some(icon) = profile_icon {
        println!("{} {}", "Icon:".bold(), icon.dimmed());
    }
    println!("{} {} / {}", "Routing:".bold(), player.platform, player.regional);

    if player.league.is_empty() {
        println!("{} Unranked", "Ranked:".bold());
        return;
    }
    for entry in &player.league {
        println!(
            "{} {} {} {} · {} LP · {}W {}L",
            "Ranked:".bold(),
            entry.queue_type,
            entry.tier.bold(),
            entry.rank,
            entry.league_points,
            entry.wins.to_string().green(),
            entry.losses.to_string().red()
        );
    }
}

pub fn display_summary(summary: &AggregateSummary, lookup: &dyn ReferenceLookup) {
    let k = &summary.kpis;
    section(&format!("📊 OVERVIEW ({} games)", k.games));
    if k.games == 0 {
        println!("{}", "No games match the current filters".yellow());
    }
    print_table(vec![
        kpi("Record", format!("{}W / {}L", k.wins, k.losses)),
        kpi("Win rate", fmt_percent(k.win_rate)),
        kpi("KDA", fmt_metric(k.kda, 2)),
        kpi("Damage to champions", fmt_metric(k.damage_to_champions, 0)),
        kpi("Vision score", fmt_metric(k.vision_score, 1)),
        kpi("Gold earned", fmt_metric(k.gold_earned, 0)),
    ]);

    let c = &summary.combat;
    section("⚔️ COMBAT");
    print_table(vec![stat_row("Kills", c.kills), stat_row("Deaths", c.deaths), stat_row("Assists", c.assists)]);
    print_table(vec![
        kpi("Largest killing spree", c.largest_killing_spree.to_string()),
        kpi("Largest multikill", c.largest_multi_kill.to_string()),
        kpi("Largest critical strike", c.largest_critical_strike.to_string()),
        kpi("Highest champion level", c.max_champ_level.to_string()),
        kpi("Quadra kills", c.quadra_kills.to_string()),
        kpi("Penta kills", c.penta_kills.to_string()),
    ]);

    let d = &summary.damage;
    section("💥 DAMAGE DEALT");
    print_table(vec![
        stat_row("Total", d.total),
        stat_row("To champions", d.to_champions),
        stat_row("Physical", d.physical),
        stat_row("Physical to champions", d.physical_to_champions),
        stat_row("Magic", d.magic),
        stat_row("Magic to champions", d.magic_to_champions),
        stat_row("True", d.true_damage),
        stat_row("True to champions", d.true_to_champions),
        stat_row("To turrets", d.to_turrets),
        stat_row("To objectives", d.to_objectives),
    ]);

    let t = &summary.tanking;
    section("🛡️ TANKING");
    print_table(vec![
        stat_row("Damage taken", t.taken),
        stat_row("Physical taken", t.physical),
        stat_row("Magic taken", t.magic),
        stat_row("True taken", t.true_damage),
        stat_row("Self mitigated", t.self_mitigated),
    ]);

    let o = &summary.objectives;
    section("🏰 OBJECTIVES");
    print_table(vec![
        stat_row("Turret kills", o.turret_kills),
        stat_row("Turret takedowns", o.turret_takedowns),
        stat_row("Inhibitor kills", o.inhibitor_kills),
        stat_row("Inhibitor takedowns", o.inhibitor_takedowns),
        stat_row("Barons", o.barons),
        stat_row("Dragons", o.dragons),
        stat_row("Heralds", o.heralds),
        stat_row("Objectives stolen", o.stolen),
        stat_row("Steal assists", o.stolen_assists),
    ]);

    let v = &summary.vision;
    section("👁️ VISION");
    print_table(vec![
        stat_row("Vision score", v.score),
        stat_row("Wards placed", v.wards_placed),
        stat_row("Wards killed", v.wards_killed),
        stat_row("Control wards bought", v.control_wards_bought),
        stat_row("Detectors placed", v.detectors_placed),
    ]);

    let e = &summary.economy;
    section("💰 ECONOMY");
    print_table(vec![
        stat_row("Gold earned", e.gold_earned),
        stat_row("Gold spent", e.gold_spent),
        stat_row("Minions", e.minions),
        stat_row("Neutral minions", e.neutral_minions),
        stat_row("Ally jungle", e.ally_jungle),
        stat_row("Enemy jungle", e.enemy_jungle),
        stat_row("Consumables", e.consumables),
        stat_row("Items purchased", e.items_purchased),
    ]);
    ranked_table("Most built items", &e.top_items, Category::Item, lookup);

    let s = &summary.spells_runes;
    section("✨ SPELLS & RUNES");
    ranked_table("Summoner spells", &s.top_spells, Category::Spell, lookup);
    ranked_table("Primary styles", &s.primary_styles, Category::RuneStyle, lookup);
    ranked_table("Secondary styles", &s.secondary_styles, Category::RuneStyle, lookup);
    ranked_table("Keystones", &s.keystones, Category::Keystone, lookup);

    let tm = &summary.timing;
    section("⏱️ TIMING");
    print_table(vec![
        stat_row("Time dead (s)", tm.time_dead),
        stat_row("Crowd control (s)", tm.cc_time),
    ]);
    println!("{} {}", "Longest life:".bold(), fmt_duration(tm.longest_time_alive));

    section("🏆 CHAMPIONS");
    if summary.champions.is_empty() {
        println!("{}", "No data".yellow());
    } else {
        let rows = summary
            .champions
            .iter()
            .map(|c| ChampionRow {
                champion: c.name.clone(),
                games: c.games.to_string(),
                record: format!("{}/{}", c.wins, c.losses),
                win_rate: format!("{:.0}%", c.win_rate),
            })
            .collect();
        print_table::<ChampionRow>(rows);
    }
    println!();
}

fn match_row(m: &MatchDto, p: &ParticipantDto, lookup: &dyn ReferenceLookup) -> MatchRow {
    let role = match p.position() {
        "" => "—".to_string(),
        "UTILITY" => "SUPPORT".to_string(),
        position => position.to_string(),
    };
    let items: Vec<String> = p
        .items()
        .iter()
        .filter(|&&id| id != 0)
        .map(|&id| lookup.label(Category::Item, id))
        .collect();
    let spells: Vec<String> = p
        .spells()
        .iter()
        .filter(|&&id| id != 0)
        .map(|&id| lookup.label(Category::Spell, id))
        .collect();

    MatchRow {
        date: fmt_start(m.info.game_start_timestamp),
        queue: queue_label(m.info.queue_id),
        champion: p.champion_name.clone(),
        role,
        result: if p.win {
            "WIN".green().to_string()
        } else {
            "LOSS".red().to_string()
        },
        kda: format!(
            "{}/{}/{} ({:.2})",
            p.kills,
            p.deaths,
            p.assists,
            kda(p.kills, p.deaths, p.assists)
        ),
        spells: spells.join(", "),
        items: items.join(", "),
        duration: fmt_duration(m.info.game_duration),
    }
}

/// Most recent first, at most `limit` rows.
pub fn display_match_history(matches: &[&MatchDto], puuid: &str, limit: usize, lookup: &dyn ReferenceLookup) {
    section(&format!("📜 RECENT MATCHES (last {})", limit.min(matches.len())));

    let mut recent: Vec<&MatchDto> = matches.to_vec();
    recent.sort_by(|a, b| b.info.game_start_timestamp.cmp(&a.info.game_start_timestamp));

    let rows: Vec<MatchRow> = recent
        .into_iter()
        .filter_map(|m| m.participant(puuid).map(|p| match_row(m, p, lookup)))
        .take(limit)
        .collect();

    if rows.is_empty() {
        println!("{}", "No matches".yellow());
        return;
    }
    print_table(rows);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::fixtures::solo_game;
    use crate::reference::StaticNames;

    #[test]
    fn durations_read_like_the_client() {
        assert_eq!(fmt_duration(1805), "30:05");
        assert_eq!(fmt_duration(59), "0:59");
        assert_eq!(fmt_duration(-3), "0:00");
    }

    #[test]
    fn start_time_needs_a_valid_timestamp() {
        assert_eq!(fmt_start(i64::MAX), "—");
        assert_eq!(fmt_start(1_700_000_000_000).len(), "2023-11-14 22:13".len());
    }

    #[test]
    fn ranked_rows_use_labels_and_fallbacks() {
        let ranked = [RankedId { id: 4, count: 9 }, RankedId { id: 99, count: 1 }];
        let rows = ranked_rows(&ranked, Category::Spell, &StaticNames);

        assert_eq!(rows[0].rank, "#1");
        assert_eq!(rows[0].name, "Flash");
        assert_eq!(rows[0].picks, "9");
        assert_eq!(rows[1].name, "Spell 99");
    }

    #[test]
    fn match_row_shows_role_and_build() {
        let mut game = solo_game("EUW1_1", "me", "Ahri", true);
        let p = &mut game.info.participants[0];
        p.team_position = "UTILITY".to_string();
        p.summoner1_id = 4;
        p.summoner2_id = 14;
        p.item0 = 3157;
        p.item3 = 3020;

        let row = match_row(&game, &game.info.participants[0], &StaticNames);
        assert_eq!(row.champion, "Ahri");
        assert_eq!(row.role, "SUPPORT");
        assert_eq!(row.spells, "Flash, Ignite");
        assert_eq!(row.items, "Item 3157, Item 3020");

        let bare = match_row(&game, &game.info.participants[1], &StaticNames);
        assert_eq!(bare.role, "—");
        assert_eq!(bare.items, "");
    }
}
