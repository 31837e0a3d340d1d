//! Candidate scoring: weighted sum of balance, must-play, partnership, opposition and court terms.
//!
//! Pure reads of player state; higher is better.

use crate::logic::candidates::MatchCandidate;
use crate::models::{player_index, PlayerId, PlayerState, ScoringWeights};

pub const NEW_PARTNER_BONUS: f64 = 500.0;
/// Multiplied by the number of times the pair has already partnered.
pub const REPEAT_PARTNER_PENALTY: f64 = 500.0;

pub const NEW_OPPONENT_BONUS: f64 = 100.0;
pub const SECOND_MEETING_BONUS: f64 = 20.0;
/// Multiplied by the square of the previous meetings.
pub const REPEAT_OPPONENT_PENALTY: f64 = 50.0;

pub const AT_MINIMUM_BONUS: f64 = 100.0;
pub const NEAR_MINIMUM_BONUS: f64 = 50.0;
/// Per match above minimum + 1.
pub const EXCESS_MATCH_PENALTY: f64 = 100.0;

pub const SAT_OUT_LAST_ROUND_BONUS: f64 = 1000.0;
pub const IDLE_ROUND_BONUS: f64 = 50.0;

pub const NEW_COURT_BONUS: f64 = 10.0;
pub const REPEAT_COURT_PENALTY: f64 = 10.0;

/// Read-only view of a run's state while picking one match.
#[derive(Clone, Copy, Debug)]
pub struct ScoringContext<'a> {
    pub round: u32,
    pub states: &'a [PlayerState],
    /// Lowest match count across all players.
    pub min_match_count: u32,
    pub weights: ScoringWeights,
}

impl<'a> ScoringContext<'a> {
    pub fn new(round: u32, states: &'a [PlayerState], weights: ScoringWeights) -> Self {
        let min_match_count = states.iter().map(|s| s.match_count).min().unwrap_or(0);
        Self {
            round,
            states,
            min_match_count,
            weights,
        }
    }

    fn state(&self, id: PlayerId) -> Option<&PlayerState> {
        self.states.get(player_index(id))
    }
}

/// Weighted total for one candidate.
pub fn score_candidate(candidate: &MatchCandidate, ctx: &ScoringContext<'_>) -> f64 {
    let w = ctx.weights;
    w.balance * balance_score(candidate, ctx)
        + w.must_play * must_play_score(candidate, ctx)
        + w.partnership * partnership_score(candidate, ctx)
        + w.opposition * opposition_score(candidate, ctx)
        + w.court * court_score(candidate, ctx)
}

pub fn partnership_score(candidate: &MatchCandidate, ctx: &ScoringContext<'_>) -> f64 {
    [candidate.team_1, candidate.team_2]
        .iter()
        .map(|&[a, b]| {
            let times = ctx.state(a).map_or(0, |s| s.times_partnered(b));
            if times == 0 {
                NEW_PARTNER_BONUS
            } else {
                -REPEAT_PARTNER_PENALTY * times as f64
            }
        })
        .sum()
}

pub fn opposition_score(candidate: &MatchCandidate, ctx: &ScoringContext<'_>) -> f64 {
    candidate
        .opponent_pairs()
        .iter()
        .map(|&(a, b)| {
            let times = ctx.state(a).map_or(0, |s| s.times_opposed(b));
            match times {
                0 => NEW_OPPONENT_BONUS,
                1 => SECOND_MEETING_BONUS,
                n => -REPEAT_OPPONENT_PENALTY * (n * n) as f64,
            }
        })
        .sum()
}

pub fn balance_score(candidate: &MatchCandidate, ctx: &ScoringContext<'_>) -> f64 {
    candidate
        .players()
        .iter()
        .filter_map(|&id| ctx.state(id))
        .map(|s| match s.match_count.saturating_sub(ctx.min_match_count) {
            0 => AT_MINIMUM_BONUS,
            1 => NEAR_MINIMUM_BONUS,
            excess => -EXCESS_MATCH_PENALTY * (excess - 1) as f64,
        })
        .sum()
}

pub fn must_play_score(candidate: &MatchCandidate, ctx: &ScoringContext<'_>) -> f64 {
    candidate
        .players()
        .iter()
        .filter_map(|&id| ctx.state(id))
        .map(|s| {
            let mut score = IDLE_ROUND_BONUS * s.rounds_idle(ctx.round) as f64;
            if s.sat_out_previous(ctx.round) {
                score += SAT_OUT_LAST_ROUND_BONUS;
            }
            score
        })
        .sum()
}

pub fn court_score(candidate: &MatchCandidate, ctx: &ScoringContext<'_>) -> f64 {
    candidate
        .players()
        .iter()
        .filter_map(|&id| ctx.state(id))
        .map(|s| {
            if s.has_played_court(candidate.court) {
                -REPEAT_COURT_PENALTY
            } else {
                NEW_COURT_BONUS
            }
        })
        .sum()
}
