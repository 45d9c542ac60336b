use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedId {
    pub id: i64,
    pub count: usize,
}

/// Occurrence counter that remembers first-seen order, so equal counts rank
/// by whichever id showed up first.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    counts: Vec<RankedId>,
    index: HashMap<i64, usize>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: i64) {
        match self.index.get(&id) {
            Some(&pos) => self.counts[pos].count += 1,
            None => {
                self.index.insert(id, self.counts.len());
                self.counts.push(RankedId { id, count: 1 });
            }
        }
    }

    /// Adds every non-zero id; zero is an empty slot upstream.
    pub fn add_present(&mut self, ids: impl IntoIterator<Item = i64>) {
        for id in ids.into_iter().filter(|id| *id != 0) {
            self.add(id);
        }
    }

    pub fn top(&self, n: usize) -> Vec<RankedId> {
        let mut ranked = self.counts.clone();
        // stable: ties keep insertion order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}
