//! Match statistics tracking.
//!
//! Accumulates results and search counters over a run of matches between
//! engine A and engine B, for the summary logged at the end.

use std::time::Duration;

use games_uttt::{Player, Winner};
use mcts::SearchStats;
use tracing::info;

/// Search counters summed over every move of a match.
#[derive(Debug, Default, Clone)]
pub struct SearchTotals {
    pub searches: u32,
    pub iterations: u64,
    pub nodes_allocated: usize,
    pub terminal_hits: u64,
    pub search_time: Duration,
}

impl SearchTotals {
    /// Add stats from a single search.
    pub fn add(&mut self, stats: &SearchStats) {
        self.searches += 1;
        self.iterations += stats.iterations;
        self.nodes_allocated += stats.nodes_allocated;
        self.terminal_hits += stats.terminal_hits;
        self.search_time += stats.elapsed;
    }

    fn merge(&mut self, other: &SearchTotals) {
        self.searches += other.searches;
        self.iterations += other.iterations;
        self.nodes_allocated += other.nodes_allocated;
        self.terminal_hits += other.terminal_hits;
        self.search_time += other.search_time;
    }

    /// Average iterations per second of search time.
    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.search_time.as_secs_f64();
        if secs > 0.0 {
            self.iterations as f64 / secs
        } else {
            0.0
        }
    }
}

/// Outcome of one finished match.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub index: u32,
    /// Side engine A played
    pub a_side: Player,
    pub winner: Winner,
    pub plies: u8,
    pub totals: SearchTotals,
}

impl MatchRecord {
    /// Whether engine A won, lost, or drew.
    pub fn a_result(&self) -> Option<bool> {
        self.winner.player().map(|player| player == self.a_side)
    }
}

/// Running totals over all matches.
#[derive(Debug, Default)]
pub struct MatchStats {
    matches: u32,
    a_wins: u32,
    b_wins: u32,
    draws: u32,
    x_wins: u32,
    total_plies: u64,
    totals: SearchTotals,
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: &MatchRecord) {
        self.matches += 1;
        self.total_plies += u64::from(record.plies);
        match record.a_result() {
            Some(true) => self.a_wins += 1,
            Some(false) => self.b_wins += 1,
            None => self.draws += 1,
        }
        if record.winner == Winner::PlayerOne {
            self.x_wins += 1;
        }
        self.totals.merge(&record.totals);
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    /// Wins for engine A, engine B, and draws.
    pub fn score(&self) -> (u32, u32, u32) {
        (self.a_wins, self.b_wins, self.draws)
    }

    pub fn avg_plies(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.matches as f64
        }
    }

    pub fn totals(&self) -> &SearchTotals {
        &self.totals
    }

    pub fn log_summary(&self) {
        info!(
            matches = self.matches,
            a_wins = self.a_wins,
            b_wins = self.b_wins,
            draws = self.draws,
            x_wins = self.x_wins,
            avg_plies = format!("{:.1}", self.avg_plies()),
            searches = self.totals.searches,
            iterations = self.totals.iterations,
            iterations_per_sec = format!("{:.0}", self.totals.iterations_per_second()),
            "Match summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: u32, a_side: Player, winner: Winner, plies: u8) -> MatchRecord {
        let mut totals = SearchTotals::default();
        totals.add(&SearchStats {
            iterations: 1000,
            nodes_allocated: 5000,
            terminal_hits: 10,
            elapsed: Duration::from_millis(100),
            ..SearchStats::default()
        });
        MatchRecord {
            index,
            a_side,
            winner,
            plies,
            totals,
        }
    }

    #[test]
    fn test_result_attribution() {
        let mut stats = MatchStats::new();
        stats.record(&record(0, Player::One, Winner::PlayerOne, 40));
        stats.record(&record(1, Player::Two, Winner::PlayerOne, 50));
        stats.record(&record(2, Player::One, Winner::Draw, 81));

        assert_eq!(stats.matches(), 3);
        assert_eq!(stats.score(), (1, 1, 1));
        assert_eq!(stats.x_wins, 2);
        assert!((stats.avg_plies() - 57.0).abs() < 1e-9);
    }

    #[test]
    fn test_a_result() {
        assert_eq!(
            record(0, Player::Two, Winner::PlayerTwo, 30).a_result(),
            Some(true)
        );
        assert_eq!(
            record(0, Player::Two, Winner::PlayerOne, 30).a_result(),
            Some(false)
        );
        assert_eq!(record(0, Player::Two, Winner::Draw, 30).a_result(), None);
    }

    #[test]
    fn test_search_totals_accumulate() {
        let mut stats = MatchStats::new();
        stats.record(&record(0, Player::One, Winner::PlayerTwo, 40));
        stats.record(&record(1, Player::Two, Winner::PlayerTwo, 40));

        let totals = stats.totals();
        assert_eq!(totals.searches, 2);
        assert_eq!(totals.iterations, 2000);
        assert_eq!(totals.nodes_allocated, 10_000);
        assert_eq!(totals.search_time, Duration::from_millis(200));
        assert!((totals.iterations_per_second() - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_stats() {
        let stats = MatchStats::new();
        assert_eq!(stats.avg_plies(), 0.0);
        assert_eq!(stats.totals().iterations_per_second(), 0.0);
        stats.log_summary();
    }
}
