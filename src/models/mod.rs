//! Data structures for doubles scheduling: players, matches, config and schedules.

mod config;
mod game;
mod player;
mod schedule;

pub use config::{ScheduleConfig, ScoringWeights, DEFAULT_ATTEMPTS};
pub use game::{Match, MatchId, MatchScore, Team};
pub use player::{player_index, Player, PlayerId, PlayerState, PlayerStats};
pub use schedule::{Schedule, ScheduleError};
