//! Hill-climbing refinement: swap two players between two matches, keep strict improvements.

use crate::logic::fitness::score_schedule;
use crate::models::{Match, PlayerId, Schedule};

/// Hard cap on full passes; each accepted swap strictly raises the score anyway.
pub const MAX_REFINEMENT_PASSES: usize = 50;

/// What a refinement run did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RefinementReport {
    pub initial_score: f64,
    pub final_score: f64,
    pub swaps: usize,
    pub passes: usize,
}

/// A seat exchange between two matches, by index into `Schedule::matches`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SwapMove {
    pub match_a: usize,
    pub slot_a: usize,
    pub match_b: usize,
    pub slot_b: usize,
}

impl SwapMove {
    fn players(&self, schedule: &Schedule) -> (PlayerId, PlayerId) {
        (
            schedule.matches[self.match_a].players[self.slot_a].id,
            schedule.matches[self.match_b].players[self.slot_b].id,
        )
    }
}

/// Whether the swap keeps every match at 4 distinct players and every round a partition.
///
/// Same-round swaps only need distinctness. Cross-round swaps additionally need each
/// player to be sitting out the round they move into.
pub fn is_valid_swap(schedule: &Schedule, mv: &SwapMove) -> bool {
    if mv.match_a == mv.match_b || mv.slot_a > 3 || mv.slot_b > 3 {
        return false;
    }
    let (Some(ma), Some(mb)) = (schedule.matches.get(mv.match_a), schedule.matches.get(mv.match_b))
    else {
        return false;
    };
    let (pa, pb) = mv.players(schedule);
    let mut ids_a = ma.player_ids();
    let mut ids_b = mb.player_ids();
    ids_a[mv.slot_a] = pb;
    ids_b[mv.slot_b] = pa;
    if pa == pb || !Match::distinct_ids(&ids_a) || !Match::distinct_ids(&ids_b) {
        return false;
    }
    if ma.round == mb.round {
        return true;
    }
    schedule.is_sitting_out(pb, ma.round) && schedule.is_sitting_out(pa, mb.round)
}

/// Apply a valid swap. Applying the same move again undoes it.
pub fn apply_swap(schedule: &mut Schedule, mv: &SwapMove) {
    let (round_a, round_b) = (
        schedule.matches[mv.match_a].round,
        schedule.matches[mv.match_b].round,
    );
    let pa = schedule.matches[mv.match_a].players[mv.slot_a].clone();
    let pb = schedule.matches[mv.match_b].players[mv.slot_b].clone();

    if round_a != round_b {
        // pb leaves round_a's bench, pa takes their place; mirrored for round_b.
        if let Some(bench) = schedule.round_sitting_out.get_mut(&round_a) {
            if let Some(seat) = bench.iter_mut().find(|p| p.id == pb.id) {
                *seat = pa.clone();
            }
        }
        if let Some(bench) = schedule.round_sitting_out.get_mut(&round_b) {
            if let Some(seat) = bench.iter_mut().find(|p| p.id == pa.id) {
                *seat = pb.clone();
            }
        }
    }

    schedule.matches[mv.match_a].players[mv.slot_a] = pb;
    schedule.matches[mv.match_b].players[mv.slot_b] = pa;
}

/// True when either moved player now sits out two adjacent rounds.
fn creates_back_to_back_sit_out(schedule: &Schedule, mv: &SwapMove) -> bool {
    let round_a = schedule.matches[mv.match_a].round;
    let round_b = schedule.matches[mv.match_b].round;
    if round_a == round_b {
        return false;
    }
    // After the swap the player now in slot_b sits out round_a, and vice versa.
    let (now_in_a, now_in_b) = mv.players(schedule);
    let benched_adjacent = |id: PlayerId, round: u32| {
        (round > 1 && schedule.is_sitting_out(id, round - 1))
            || schedule.is_sitting_out(id, round + 1)
    };
    benched_adjacent(now_in_b, round_a) || benched_adjacent(now_in_a, round_b)
}

/// Greedy first-improvement local search over all match pairs and seat pairs.
///
/// Never lowers the score. Stops after a pass with no improving swap.
pub fn refine_schedule(schedule: &mut Schedule, avoid_consecutive_sitting_out: bool) -> RefinementReport {
    let initial_score = score_schedule(schedule);
    let mut current = initial_score;
    let mut swaps = 0;
    let mut passes = 0;
    let n = schedule.matches.len();

    while passes < MAX_REFINEMENT_PASSES {
        passes += 1;
        let mut improved = false;

        for match_a in 0..n {
            for match_b in match_a + 1..n {
                for slot_a in 0..4 {
                    for slot_b in 0..4 {
                        let mv = SwapMove {
                            match_a,
                            slot_a,
                            match_b,
                            slot_b,
                        };
                        if !is_valid_swap(schedule, &mv) {
                            continue;
                        }
                        apply_swap(schedule, &mv);
                        if avoid_consecutive_sitting_out && creates_back_to_back_sit_out(schedule, &mv) {
                            apply_swap(schedule, &mv);
                            continue;
                        }
                        let score = score_schedule(schedule);
                        if score > current {
                            current = score;
                            swaps += 1;
                            improved = true;
                        } else {
                            apply_swap(schedule, &mv);
                        }
                    }
                }
            }
        }

        if !improved {
            break;
        }
    }

    log::debug!(
        "Refinement: {} swap(s) over {} pass(es), score {:.1} -> {:.1}",
        swaps,
        passes,
        initial_score,
        current
    );

    RefinementReport {
        initial_score,
        final_score: current,
        swaps,
        passes,
    }
}
