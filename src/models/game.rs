//! Match (game), Team and MatchScore for 2v2 doubles.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Sequential match number, unique across a whole schedule (starts at 1).
pub type MatchId = u32;

/// Which team won the match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

/// Recorded score for a played match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub team_1: u32,
    pub team_2: u32,
}

impl MatchScore {
    pub fn new(team_1: u32, team_2: u32) -> Self {
        Self { team_1, team_2 }
    }

    /// None on a draw.
    pub fn winner(&self) -> Option<Team> {
        match self.team_1.cmp(&self.team_2) {
            std::cmp::Ordering::Greater => Some(Team::One),
            std::cmp::Ordering::Less => Some(Team::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A single 2v2 match on one court in one round.
///
/// `players[0..2]` is team 1 and `players[2..4]` is team 2; consumers rely on this order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based round number.
    pub round: u32,
    /// 1-based court number.
    pub court: u32,
    pub players: [Player; 4],
    /// None if not yet played.
    pub result: Option<MatchScore>,
}

impl Match {
    pub fn new(id: MatchId, round: u32, court: u32, players: [Player; 4]) -> Self {
        Self {
            id,
            round,
            court,
            players,
            result: None,
        }
    }

    pub fn team_1(&self) -> &[Player] {
        &self.players[..2]
    }

    pub fn team_2(&self) -> &[Player] {
        &self.players[2..]
    }

    pub fn player_ids(&self) -> [PlayerId; 4] {
        [
            self.players[0].id,
            self.players[1].id,
            self.players[2].id,
            self.players[3].id,
        ]
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// True when all four seats hold different players.
    pub fn has_distinct_players(&self) -> bool {
        Self::distinct_ids(&self.player_ids())
    }

    /// The four-distinct-seats rule, on bare ids.
    pub fn distinct_ids(ids: &[PlayerId; 4]) -> bool {
        (0..4).all(|i| (i + 1..4).all(|j| ids[i] != ids[j]))
    }
}
