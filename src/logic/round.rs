//! Round assembly: greedily seat the best-scoring candidate until courts or players run out.

use crate::logic::candidates::{generate_candidates, MatchCandidate, MAX_CANDIDATES_PER_PICK};
use crate::logic::scoring::{score_candidate, ScoringContext};
use crate::models::{player_index, PlayerId, PlayerState, ScoringWeights};
use rand::seq::SliceRandom;
use rand::Rng;

/// Knobs shared by every round of one attempt.
#[derive(Clone, Copy, Debug)]
pub struct RoundSettings {
    pub num_courts: u32,
    pub avoid_consecutive_sitting_out: bool,
    pub weights: ScoringWeights,
    pub candidate_limit: usize,
}

impl RoundSettings {
    pub fn new(num_courts: u32, avoid_consecutive_sitting_out: bool, weights: ScoringWeights) -> Self {
        Self {
            num_courts,
            avoid_consecutive_sitting_out,
            weights,
            candidate_limit: MAX_CANDIDATES_PER_PICK,
        }
    }
}

/// Matches seated in one round (ordered by court) and who sat out (ordered by id).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoundOutcome {
    pub matches: Vec<MatchCandidate>,
    pub sitting_out: Vec<PlayerId>,
}

/// Fill one round. Player state is updated for every committed match.
///
/// Stops when no court is left, fewer than 4 players remain, or no candidate
/// could be generated. A round that seats nothing is not an error here.
pub fn assemble_round<R: Rng + ?Sized>(
    round: u32,
    player_ids: &[PlayerId],
    states: &mut [PlayerState],
    settings: &RoundSettings,
    rng: &mut R,
) -> RoundOutcome {
    let mut available: Vec<PlayerId> = player_ids.to_vec();
    let mut open_courts: Vec<u32> = (1..=settings.num_courts).collect();
    let mut matches: Vec<MatchCandidate> = Vec::new();

    // One pick per court at most; the +1 only guards against a stuck loop.
    let max_steps = settings.num_courts as usize + 1;
    for _ in 0..max_steps {
        if open_courts.is_empty() || available.len() < 4 {
            break;
        }

        available.shuffle(rng);
        open_courts.shuffle(rng);

        let must_play: Vec<PlayerId> = if settings.avoid_consecutive_sitting_out {
            available
                .iter()
                .copied()
                .filter(|&id| {
                    states
                        .get(player_index(id))
                        .is_some_and(|s| s.sat_out_previous(round))
                })
                .collect()
        } else {
            Vec::new()
        };

        let pool = generate_candidates(
            &available,
            &open_courts,
            &must_play,
            settings.candidate_limit,
            rng,
        );
        let Some(best) = pick_best(&pool, &ScoringContext::new(round, states, settings.weights))
        else {
            break;
        };

        commit_candidate(&best, round, states);
        let seated = best.players();
        available.retain(|id| !seated.contains(id));
        open_courts.retain(|&c| c != best.court);
        matches.push(best);
    }

    if matches.is_empty() {
        log::warn!("Round {} seated no matches ({} players available)", round, player_ids.len());
    }

    matches.sort_by_key(|m| m.court);
    available.sort_unstable();
    RoundOutcome {
        matches,
        sitting_out: available,
    }
}

/// Highest-scoring candidate; ties go to the earliest in the pool.
pub fn pick_best(pool: &[MatchCandidate], ctx: &ScoringContext<'_>) -> Option<MatchCandidate> {
    let mut best: Option<(MatchCandidate, f64)> = None;
    for candidate in pool {
        let score = score_candidate(candidate, ctx);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((*candidate, score));
        }
    }
    best.map(|(c, _)| c)
}

/// Record a seated match in every participant's state.
pub fn commit_candidate(candidate: &MatchCandidate, round: u32, states: &mut [PlayerState]) {
    for id in candidate.players() {
        if let Some(s) = states.get_mut(player_index(id)) {
            s.match_count += 1;
            s.last_played_round = Some(round);
            s.courts_played.insert(candidate.court);
        }
    }
    for [a, b] in [candidate.team_1, candidate.team_2] {
        bump(states, a, b, |s| &mut s.partnerships);
    }
    for (a, b) in candidate.opponent_pairs() {
        bump(states, a, b, |s| &mut s.opponents);
    }
}

/// Increment a symmetric pair counter on both players.
fn bump(
    states: &mut [PlayerState],
    a: PlayerId,
    b: PlayerId,
    counter: impl Fn(&mut PlayerState) -> &mut Vec<u32>,
) {
    let (ia, ib) = (player_index(a), player_index(b));
    if let Some(slot) = states.get_mut(ia).and_then(|s| counter(s).get_mut(ib)) {
        *slot += 1;
    }
    if let Some(slot) = states.get_mut(ib).and_then(|s| counter(s).get_mut(ia)) {
        *slot += 1;
    }
}
