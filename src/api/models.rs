use serde::{Deserialize, Serialize};

// Account V1 response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub tag_line: String,
}

// Summoner V4 response. `id` is shard-scoped and may be missing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    #[serde(default, alias = "id")]
    pub summoner_id: Option<String>,
    #[serde(default)]
    pub profile_icon_id: i64,
    #[serde(default)]
    pub summoner_level: i64,
}

// League V4 response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i64,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
}

// Match V5 response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

impl MatchDto {
    pub fn id(&self) -> &str {
        &self.metadata.match_id
    }

    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    #[serde(default)]
    pub queue_id: i64,
    #[serde(default)]
    pub game_duration: i64,
    #[serde(default)]
    pub game_start_timestamp: i64,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_id: i64,
    pub champion_name: String,
    pub team_id: i64,
    pub individual_position: String,
    pub team_position: String,
    pub win: bool,

    // Combat
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub largest_killing_spree: i64,
    pub largest_multi_kill: i64,
    pub quadra_kills: i64,
    pub penta_kills: i64,
    pub largest_critical_strike: i64,
    pub champ_level: i64,

    // Damage dealt
    pub total_damage_dealt: i64,
    pub total_damage_dealt_to_champions: i64,
    pub physical_damage_dealt: i64,
    pub physical_damage_dealt_to_champions: i64,
    pub magic_damage_dealt: i64,
    pub magic_damage_dealt_to_champions: i64,
    pub true_damage_dealt: i64,
    pub true_damage_dealt_to_champions: i64,
    pub damage_dealt_to_turrets: i64,
    pub damage_dealt_to_objectives: i64,

    // Damage taken
    pub total_damage_taken: i64,
    pub physical_damage_taken: i64,
    pub magic_damage_taken: i64,
    pub true_damage_taken: i64,
    pub damage_self_mitigated: i64,

    // Objectives
    pub turret_kills: i64,
    pub turret_takedowns: i64,
    pub inhibitor_kills: i64,
    pub inhibitor_takedowns: i64,
    pub baron_kills: i64,
    pub dragon_kills: i64,
    pub rift_herald_kills: i64,
    pub objectives_stolen: i64,
    pub objectives_stolen_assists: i64,

    // Vision
    pub vision_score: i64,
    pub wards_placed: i64,
    pub wards_killed: i64,
    pub vision_wards_bought_in_game: i64,
    pub detector_wards_placed: i64,

    // Economy
    pub gold_earned: i64,
    pub gold_spent: i64,
    pub total_minions_killed: i64,
    pub neutral_minions_killed: i64,
    pub neutral_minions_killed_team_jungle: i64,
    pub neutral_minions_killed_enemy_jungle: i64,
    pub total_ally_jungle_minions_killed: i64,
    pub total_enemy_jungle_minions_killed: i64,
    pub consumables_purchased: i64,
    pub items_purchased: i64,

    // Timing
    pub total_time_spent_dead: i64,
    pub longest_time_spent_living: i64,
    #[serde(rename = "timeCCingOthers")]
    pub time_ccing_others: i64,

    // Build
    pub item0: i64,
    pub item1: i64,
    pub item2: i64,
    pub item3: i64,
    pub item4: i64,
    pub item5: i64,
    pub item6: i64,
    pub summoner1_id: i64,
    pub summoner2_id: i64,
    pub perks: PerksDto,
}

impl ParticipantDto {
    pub fn items(&self) -> [i64; 7] {
        [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
    }

    pub fn position(&self) -> &str {
        [self.individual_position.as_str(), self.team_position.as_str()]
            .into_iter()
            .find(|pos| !pos.is_empty() && *pos != "Invalid")
            .unwrap_or("")
    }

    /// Payloads carry the older or the newer key, sometimes both.
    pub fn ally_jungle_minions(&self) -> i64 {
        self.neutral_minions_killed_team_jungle
            .max(self.total_ally_jungle_minions_killed)
    }

    pub fn enemy_jungle_minions(&self) -> i64 {
        self.neutral_minions_killed_enemy_jungle
            .max(self.total_enemy_jungle_minions_killed)
    }

    pub fn spells(&self) -> [i64; 2] {
        [self.summoner1_id, self.summoner2_id]
    }

    pub fn primary_style(&self) -> Option<&PerkStyleDto> {
        self.perks.styles.first()
    }

    pub fn secondary_style(&self) -> Option<&PerkStyleDto> {
        self.perks.styles.get(1)
    }

    /// First selection of the primary tree.
    pub fn keystone(&self) -> Option<i64> {
        self.primary_style()
            .and_then(|s| s.selections.first())
            .map(|s| s.perk)
            .filter(|perk| *perk != 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerksDto {
    pub styles: Vec<PerkStyleDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerkStyleDto {
    pub style: i64,
    pub selections: Vec<PerkSelectionDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerkSelectionDto {
    pub perk: i64,
}

/// Placeholder kept in a match slot when that id could not be fetched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FailedMatch {
    pub error: String,
    pub metadata: MatchMetadata,
}

/// One result slot per requested match id.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MatchSlot {
    Failed(FailedMatch),
    Record(Box<MatchDto>),
}

impl MatchSlot {
    pub fn failed(match_id: &str, error: impl Into<String>) -> Self {
        MatchSlot::Failed(FailedMatch {
            error: error.into(),
            metadata: MatchMetadata {
                match_id: match_id.to_string(),
            },
        })
    }

    pub fn match_id(&self) -> &str {
        match self {
            MatchSlot::Failed(f) => &f.metadata.match_id,
            MatchSlot::Record(m) => m.id(),
        }
    }

    pub fn record(&self) -> Option<&MatchDto> {
        match self {
            MatchSlot::Record(m) => Some(m),
            MatchSlot::Failed(_) => None,
        }
    }
}
