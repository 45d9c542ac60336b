use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionStats {
    pub id: String,
    pub name: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage, 0-100.
    pub win_rate: f64,
}

#[derive(Debug, Clone)]
struct Tally {
    id: String,
    name: String,
    games: usize,
    wins: usize,
}

/// Games and wins per champion, in first-played order.
#[derive(Debug, Default)]
pub struct ChampionStatsTracker {
    tallies: Vec<Tally>,
    index: HashMap<String, usize>,
}

impl ChampionStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_game(&mut self, id: &str, name: &str, won: bool) {
        let pos = match self.index.get(id) {
            Some(&pos) => pos,
            None => {
                self.index.insert(id.to_string(), self.tallies.len());
                self.tallies.push(Tally {
                    id: id.to_string(),
                    name: name.to_string(),
                    games: 0,
                    wins: 0,
                });
                self.tallies.len() - 1
            }
        };

        let tally = &mut self.tallies[pos];
        tally.games += 1;
        if won {
            tally.wins += 1;
        }
    }

    /// Most played first, ties in first-played order.
    pub fn most_played(&self, n: usize) -> Vec<ChampionStats> {
        let mut stats: Vec<ChampionStats> = self
            .tallies
            .iter()
            .map(|t| ChampionStats {
                id: t.id.clone(),
                name: t.name.clone(),
                games: t.games,
                wins: t.wins,
                losses: t.games - t.wins,
                win_rate: if t.games == 0 {
                    0.0
                } else {
                    t.wins as f64 / t.games as f64 * 100.0
                },
            })
            .collect();

        stats.sort_by(|a, b| b.games.cmp(&a.games));
        stats.truncate(n);
        stats
    }
}
