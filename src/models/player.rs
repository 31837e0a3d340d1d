//! Player, PlayerStats and the per-run PlayerState counters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable 1-based identifier for a player within one schedule.
pub type PlayerId = u32;

/// Arena slot for a player id (ids are 1-based, slots 0-based).
pub fn player_index(id: PlayerId) -> usize {
    (id as usize).saturating_sub(1)
}

/// A player in the schedule. Identity is the id; the name is display only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Placeholder name used when no name was supplied.
    pub fn default_name(id: PlayerId) -> String {
        format!("Player {id}")
    }
}

/// Statistics view of a player (for API / display).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub id: PlayerId,
    pub name: String,
    pub match_count: u32,
}

/// Mutable counters for one player during a single generation attempt.
///
/// Partner and opponent counts are dense vectors indexed by [`player_index`],
/// so the whole state for a run is one `Vec<PlayerState>` owned by the attempt.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PlayerState {
    pub match_count: u32,
    /// None until the player has been seated.
    pub last_played_round: Option<u32>,
    pub partnerships: Vec<u32>,
    pub opponents: Vec<u32>,
    pub courts_played: BTreeSet<u32>,
}

impl PlayerState {
    pub fn new(num_players: usize) -> Self {
        Self {
            match_count: 0,
            last_played_round: None,
            partnerships: vec![0; num_players],
            opponents: vec![0; num_players],
            courts_played: BTreeSet::new(),
        }
    }

    /// Fresh state for every player in a run.
    pub fn for_players(num_players: usize) -> Vec<PlayerState> {
        (0..num_players).map(|_| Self::new(num_players)).collect()
    }

    pub fn times_partnered(&self, other: PlayerId) -> u32 {
        self.partnerships
            .get(player_index(other))
            .copied()
            .unwrap_or(0)
    }

    pub fn times_opposed(&self, other: PlayerId) -> u32 {
        self.opponents.get(player_index(other)).copied().unwrap_or(0)
    }

    pub fn has_played_court(&self, court: u32) -> bool {
        self.courts_played.contains(&court)
    }

    /// Consecutive rounds without a match immediately before `round`.
    pub fn rounds_idle(&self, round: u32) -> u32 {
        match self.last_played_round {
            Some(last) => round.saturating_sub(last + 1),
            None => round.saturating_sub(1),
        }
    }

    /// True when the player was not seated in `round - 1`.
    pub fn sat_out_previous(&self, round: u32) -> bool {
        round > 1 && self.last_played_round != Some(round - 1)
    }
}
