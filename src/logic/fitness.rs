//! Whole-schedule fitness. Deterministic; the only acceptance test for multi-start and refinement.

use crate::models::{player_index, Schedule};

/// Starting value before penalties.
pub const BASELINE_SCORE: f64 = 10_000.0;
/// Per match of spread between busiest and idlest player.
pub const MATCH_SPREAD_PENALTY: f64 = 100.0;
/// Multiplied by the cube of a player's longest sit-out run (runs of 2+ only).
pub const CONSECUTIVE_SIT_OUT_PENALTY: f64 = 50.0;
pub const OPPONENT_RANGE_PENALTY: f64 = 50.0;
pub const OPPONENT_VARIANCE_PENALTY: f64 = 100.0;
pub const NEVER_OPPOSED_PENALTY: f64 = 10.0;
/// Per pair that met across the net 3+ times.
pub const HEAVY_OPPONENT_PENALTY: f64 = 30.0;
pub const EVEN_OPPONENTS_BONUS: f64 = 200.0;
pub const FULL_COVERAGE_BONUS: f64 = 200.0;
/// Per extra partnering of the same pair; dominates every other term.
pub const REPEAT_PARTNERSHIP_PENALTY: f64 = 1000.0;

/// Raw measurements the fitness is computed from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleMetrics {
    pub min_matches: u32,
    pub max_matches: u32,
    /// Longest consecutive sit-out run, per player in id order.
    pub longest_sit_out_runs: Vec<u32>,
    pub opponent_range: u32,
    pub opponent_variance: f64,
    pub never_opposed_pairs: usize,
    pub heavy_opponent_pairs: usize,
    /// Sum over pairs of (times partnered - 1) for pairs partnered 2+ times.
    pub repeated_partnerships: u32,
}

impl ScheduleMetrics {
    pub fn match_spread(&self) -> u32 {
        self.max_matches - self.min_matches
    }
}

/// Upper-triangle pair counter over dense player indices.
struct PairCounts {
    n: usize,
    counts: Vec<u32>,
}

impl PairCounts {
    fn new(n: usize) -> Self {
        Self {
            n,
            counts: vec![0; n * n],
        }
    }

    fn add(&mut self, a: usize, b: usize) {
        if a >= self.n || b >= self.n || a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.counts[lo * self.n + hi] += 1;
    }

    /// Every unordered pair's count, including zeros.
    fn values(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.n).flat_map(move |i| (i + 1..self.n).map(move |j| self.counts[i * self.n + j]))
    }
}

pub fn schedule_metrics(schedule: &Schedule) -> ScheduleMetrics {
    let n = schedule.player_stats.len();
    let rounds = schedule.num_rounds() as usize;

    let mut match_counts = vec![0u32; n];
    let mut played = vec![vec![false; rounds + 1]; n];
    let mut partners = PairCounts::new(n);
    let mut opponents = PairCounts::new(n);

    for m in &schedule.matches {
        let idx = m.player_ids().map(player_index);
        for &i in &idx {
            if i < n {
                match_counts[i] += 1;
                if let Some(slot) = played[i].get_mut(m.round as usize) {
                    *slot = true;
                }
            }
        }
        partners.add(idx[0], idx[1]);
        partners.add(idx[2], idx[3]);
        for &a in &idx[..2] {
            for &b in &idx[2..] {
                opponents.add(a, b);
            }
        }
    }

    let longest_sit_out_runs = played
        .iter()
        .map(|rounds_played| {
            let mut longest: u32 = 0;
            let mut run: u32 = 0;
            for &p in rounds_played.iter().skip(1) {
                if p {
                    run = 0;
                } else {
                    run += 1;
                    longest = longest.max(run);
                }
            }
            longest
        })
        .collect();

    let opp: Vec<u32> = opponents.values().collect();
    let opp_min = opp.iter().copied().min().unwrap_or(0);
    let opp_max = opp.iter().copied().max().unwrap_or(0);
    let opponent_variance = if opp.is_empty() {
        0.0
    } else {
        let mean = opp.iter().map(|&c| c as f64).sum::<f64>() / opp.len() as f64;
        opp.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / opp.len() as f64
    };

    ScheduleMetrics {
        min_matches: match_counts.iter().copied().min().unwrap_or(0),
        max_matches: match_counts.iter().copied().max().unwrap_or(0),
        longest_sit_out_runs,
        opponent_range: opp_max - opp_min,
        opponent_variance,
        never_opposed_pairs: opp.iter().filter(|&&c| c == 0).count(),
        heavy_opponent_pairs: opp.iter().filter(|&&c| c >= 3).count(),
        repeated_partnerships: partners.values().filter(|&c| c > 1).map(|c| c - 1).sum(),
    }
}

/// Fitness from precomputed metrics.
pub fn score_metrics(metrics: &ScheduleMetrics) -> f64 {
    let mut score = BASELINE_SCORE;
    score -= MATCH_SPREAD_PENALTY * metrics.match_spread() as f64;

    for &run in &metrics.longest_sit_out_runs {
        if run > 1 {
            score -= CONSECUTIVE_SIT_OUT_PENALTY * (run as f64).powi(3);
        }
    }

    score -= OPPONENT_RANGE_PENALTY * metrics.opponent_range as f64;
    score -= OPPONENT_VARIANCE_PENALTY * metrics.opponent_variance;
    score -= NEVER_OPPOSED_PENALTY * metrics.never_opposed_pairs as f64;
    score -= HEAVY_OPPONENT_PENALTY * metrics.heavy_opponent_pairs as f64;
    if metrics.opponent_range <= 1 {
        score += EVEN_OPPONENTS_BONUS;
    }
    if metrics.never_opposed_pairs == 0 {
        score += FULL_COVERAGE_BONUS;
    }

    score -= REPEAT_PARTNERSHIP_PENALTY * metrics.repeated_partnerships as f64;
    score
}

/// Whole-schedule fitness; higher is better.
pub fn score_schedule(schedule: &Schedule) -> f64 {
    score_metrics(&schedule_metrics(schedule))
}
