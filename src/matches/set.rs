use crate::api::models::{MatchDto, MatchSlot};
use std::collections::HashMap;

/// Matches keyed by match id, in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    records: Vec<MatchDto>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub replaced: usize,
    pub failed: usize,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by id. A replaced record keeps its position.
    /// Returns true when the id was new.
    pub fn insert(&mut self, record: MatchDto) -> bool {
        match self.index.get(record.id()) {
            Some(&pos) => {
                self.records[pos] = record;
                false
            }
            None => {
                self.index.insert(record.id().to_string(), self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    /// Merges the successful slots of a fetch batch. Placeholders are only
    /// counted.
    pub fn merge_slots(&mut self, slots: impl IntoIterator<Item = MatchSlot>) -> MergeReport {
        let mut report = MergeReport::default();
        for slot in slots {
            match slot {
                MatchSlot::Record(record) => {
                    if self.insert(*record) {
                        report.added += 1;
                    } else {
                        report.replaced += 1;
                    }
                }
                MatchSlot::Failed(_) => report.failed += 1,
            }
        }
        report
    }

    pub fn merge(&mut self, other: MatchSet) {
        self.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.index.contains_key(match_id)
    }

    pub fn get(&self, match_id: &str) -> Option<&MatchDto> {
        self.index.get(match_id).map(|&pos| &self.records[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchDto> {
        self.records.iter()
    }
}

impl Extend<MatchDto> for MatchSet {
    fn extend<I: IntoIterator<Item = MatchDto>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<MatchDto> for MatchSet {
    fn from_iter<I: IntoIterator<Item = MatchDto>>(iter: I) -> Self {
        let mut set = MatchSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::fixtures::solo_game;
    use std::collections::HashSet;

    fn set_of(ids: &[&str]) -> MatchSet {
        ids.iter().map(|id| solo_game(id, "me", "Ahri", true)).collect()
    }

    #[test]
    fn merge_is_a_union_by_id() {
        let mut left = set_of(&["A", "B", "C"]);
        let right = set_of(&["C", "D", "A", "E"]);

        let expected: HashSet<&str> = ["A", "B", "C", "D", "E"].into_iter().collect();
        left.merge(right);

        assert_eq!(left.len(), expected.len());
        let ids: Vec<&str> = left.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn last_write_wins_in_place() {
        let mut set = set_of(&["A", "B"]);
        assert!(!set.insert(solo_game("A", "me", "Zed", false)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().map(|m| m.id()), Some("A"));
        assert_eq!(set.get("A").unwrap().info.participants[0].champion_name, "Zed");
    }

    #[test]
    fn merge_slots_skips_placeholders() {
        let mut set = set_of(&["A"]);
        let report = set.merge_slots(vec![
            MatchSlot::Record(Box::new(solo_game("A", "me", "Ahri", true))),
            MatchSlot::failed("B", "Riot API 500"),
            MatchSlot::Record(Box::new(solo_game("C", "me", "Ahri", true))),
        ]);

        assert_eq!(
            report,
            MergeReport {
                added: 1,
                replaced: 1,
                failed: 1
            }
        );
        assert!(!set.contains("B"));
        assert_eq!(set.len(), 2);
    }
}
