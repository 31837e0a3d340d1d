//! Scheduling engine: candidates, scoring, round assembly, multi-start search, refinement, export.

mod builder;
mod candidates;
mod export;
mod fitness;
mod refine;
mod round;
mod scoring;
mod search;

pub use builder::build_schedule;
pub use candidates::{
    candidates, four_player_groups, generate_candidates, sample_four_player_groups, team_splits, MatchCandidate,
    MAX_CANDIDATES_PER_PICK,
};
pub use export::{export_schedule_to_csv, write_schedule_csv, CSV_HEADER};
pub use fitness::{score_metrics, score_schedule, schedule_metrics, ScheduleMetrics};
pub use refine::{apply_swap, is_valid_swap, refine_schedule, RefinementReport, SwapMove};
pub use round::{assemble_round, commit_candidate, pick_best, RoundOutcome, RoundSettings};
pub use scoring::{
    balance_score, court_score, must_play_score, opposition_score, partnership_score,
    score_candidate, ScoringContext,
};
pub use search::{attempt_seed, generate_schedule, generate_schedule_with_report, splitmix64, GenerationReport};
