use crate::api::models::MatchDto;
use crate::matches::set::MatchSet;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeSet;

/// Games shorter than this are treated as remakes.
pub const DEFAULT_MIN_DURATION_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QueueGroup {
    Ranked,
    Draft,
    Blind,
    Quickplay,
    Aram,
}

impl QueueGroup {
    pub const ALL: [QueueGroup; 5] = [
        QueueGroup::Ranked,
        QueueGroup::Draft,
        QueueGroup::Blind,
        QueueGroup::Quickplay,
        QueueGroup::Aram,
    ];

    pub fn queue_ids(self) -> &'static [i64] {
        match self {
            QueueGroup::Ranked => &[420, 440],
            QueueGroup::Draft => &[400],
            QueueGroup::Blind => &[430],
            QueueGroup::Quickplay => &[490],
            QueueGroup::Aram => &[450],
        }
    }

    pub fn of_queue(queue_id: i64) -> Option<QueueGroup> {
        Self::ALL
            .into_iter()
            .find(|group| group.queue_ids().contains(&queue_id))
    }
}

pub fn queue_label(queue_id: i64) -> String {
    match queue_id {
        420 => "Solo/Duo".to_string(),
        440 => "Flex".to_string(),
        400 => "Draft".to_string(),
        430 => "Blind".to_string(),
        490 => "Quickplay".to_string(),
        450 => "ARAM".to_string(),
        other => other.to_string(),
    }
}

/// Client-side selection over an already fetched match set. Changing it
/// never triggers a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Enabled groups. Empty means no queue filtering at all.
    pub queue_groups: BTreeSet<QueueGroup>,
    pub min_duration_seconds: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            queue_groups: QueueGroup::ALL.into_iter().collect(),
            min_duration_seconds: DEFAULT_MIN_DURATION_SECS,
        }
    }
}

impl FilterCriteria {
    pub fn new(groups: impl IntoIterator<Item = QueueGroup>, min_duration_seconds: i64) -> Self {
        FilterCriteria {
            queue_groups: groups.into_iter().collect(),
            min_duration_seconds,
        }
    }

    pub fn accepts(&self, record: &MatchDto) -> bool {
        let queue_ok = self.queue_groups.is_empty()
            || QueueGroup::of_queue(record.info.queue_id)
                .is_some_and(|group| self.queue_groups.contains(&group));
        queue_ok && record.info.game_duration >= self.min_duration_seconds
    }

    pub fn apply<'a>(&self, matches: &'a MatchSet) -> Vec<&'a MatchDto> {
        matches.iter().filter(|m| self.accepts(m)).collect()
    }
}
