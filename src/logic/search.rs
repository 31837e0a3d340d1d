//! Multi-start search and the public generation entry points.

use crate::logic::builder::build_schedule;
use crate::logic::fitness::score_schedule;
use crate::logic::refine::refine_schedule;
use crate::models::{Schedule, ScheduleConfig, ScheduleError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary of one generation call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Base seed actually used; pass it back as `random_seed` to reproduce.
    pub seed: u64,
    pub attempts: u32,
    /// Index of the winning attempt (0-based).
    pub best_attempt: u32,
    /// Fitness of the winning attempt before refinement.
    pub initial_score: f64,
    pub final_score: f64,
    /// Improving swaps kept by refinement.
    pub swaps: usize,
}

/// Mix a 64-bit value (SplitMix64 finalizer).
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for one attempt, derived only from the base seed and the attempt index.
pub fn attempt_seed(base_seed: u64, attempt: u32) -> u64 {
    splitmix64(base_seed ^ attempt as u64)
}

/// Generate a schedule: validate, multi-start, keep the best, refine.
pub fn generate_schedule(config: &ScheduleConfig) -> Result<Schedule, ScheduleError> {
    generate_schedule_with_report(config).map(|(schedule, _)| schedule)
}

/// Same as [`generate_schedule`], also returning what the search did.
///
/// Attempts run in parallel, but each one owns its RNG and state and the winner
/// is the highest score with ties going to the lowest attempt index, so the
/// result is identical to a sequential run with the same seed.
pub fn generate_schedule_with_report(
    config: &ScheduleConfig,
) -> Result<(Schedule, GenerationReport), ScheduleError> {
    config.validate()?;

    let seed = config.random_seed.unwrap_or_else(rand::random);
    let players = config.players();
    log::info!(
        "Generating schedule: {} players, {} courts, {} rounds, {} attempts",
        config.num_players,
        config.num_courts,
        config.num_rounds,
        config.attempts
    );
    log::debug!("Base seed {}", seed);

    let results: Vec<(u32, Schedule, f64)> = (0..config.attempts)
        .into_par_iter()
        .map(|attempt| {
            let mut rng = StdRng::seed_from_u64(attempt_seed(seed, attempt));
            let schedule = build_schedule(config, &players, &mut rng);
            let score = score_schedule(&schedule);
            (attempt, schedule, score)
        })
        .collect();

    let mut best: Option<(u32, Schedule, f64)> = None;
    for (attempt, schedule, score) in results {
        if schedule.matches.is_empty() {
            log::warn!("Attempt {} produced no matches", attempt);
            continue;
        }
        log::debug!("Attempt {} scored {:.1}", attempt, score);
        let better = best.as_ref().map_or(true, |(_, _, best_score)| score > *best_score);
        if better {
            best = Some((attempt, schedule, score));
        }
    }

    let (best_attempt, mut schedule, initial_score) = best.ok_or(ScheduleError::GenerationFailed)?;

    let (final_score, swaps) = if config.refine {
        let report = refine_schedule(&mut schedule, config.avoid_consecutive_sitting_out);
        (report.final_score, report.swaps)
    } else {
        (initial_score, 0)
    };

    log::info!(
        "Best attempt {} scored {:.1}, {:.1} after refinement ({} swaps)",
        best_attempt,
        initial_score,
        final_score,
        swaps
    );

    Ok((
        schedule,
        GenerationReport {
            seed,
            attempts: config.attempts,
            best_attempt,
            initial_score,
            final_score,
            swaps,
        },
    ))
}
