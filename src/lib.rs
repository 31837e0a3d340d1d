//! Doubles round scheduler: library with models and the scheduling engine.

pub mod logic;
pub mod models;

pub use logic::{
    export_schedule_to_csv, generate_schedule, generate_schedule_with_report, refine_schedule,
    score_schedule, write_schedule_csv, GenerationReport, RefinementReport,
};
pub use models::{
    Match, MatchId, MatchScore, Player, PlayerId, PlayerState, PlayerStats, Schedule,
    ScheduleConfig, ScheduleError, ScoringWeights, Team,
};
