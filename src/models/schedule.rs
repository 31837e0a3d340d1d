//! Schedule, ScheduleError and the post-hoc edits applied after generation.

use crate::models::game::{Match, MatchId, MatchScore};
use crate::models::player::{Player, PlayerId, PlayerStats};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Errors that can occur while validating, generating or editing a schedule.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduleError {
    /// Fewer than 4 players configured.
    NotEnoughPlayers { players: u32 },
    /// Number of rounds must be at least 1.
    InvalidRounds,
    /// Number of courts must be at least 1.
    InvalidCourts,
    /// Multi-start attempts must be at least 1.
    InvalidAttempts,
    /// More names than players.
    TooManyNames { names: usize, players: u32 },
    /// A scoring weight is negative or not finite.
    InvalidWeight(&'static str),
    /// Every attempt produced an empty schedule.
    GenerationFailed,
    /// No match with this id in the schedule.
    MatchNotFound(MatchId),
    /// Player slot outside 0..=3.
    InvalidSlot(usize),
    /// The edit would seat the same player twice in one match.
    DuplicatePlayerInMatch(MatchId),
    /// CSV writer failure.
    Export(String),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::NotEnoughPlayers { players } => {
                write!(f, "Need at least 4 players to schedule doubles (got {})", players)
            }
            ScheduleError::InvalidRounds => write!(f, "Number of rounds must be at least 1"),
            ScheduleError::InvalidCourts => write!(f, "Number of courts must be at least 1"),
            ScheduleError::InvalidAttempts => write!(f, "Number of attempts must be at least 1"),
            ScheduleError::TooManyNames { names, players } => {
                write!(f, "Got {} player names for {} players", names, players)
            }
            ScheduleError::InvalidWeight(name) => {
                write!(f, "Scoring weight '{}' must be a non-negative number", name)
            }
            ScheduleError::GenerationFailed => write!(f, "Could not generate a schedule"),
            ScheduleError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            ScheduleError::InvalidSlot(slot) => {
                write!(f, "Player slot {} is out of range (0-3)", slot)
            }
            ScheduleError::DuplicatePlayerInMatch(id) => {
                write!(f, "Match {} would contain the same player twice", id)
            }
            ScheduleError::Export(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for ScheduleError {}

/// A complete schedule: all matches, per-player totals and who sits out each round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Ordered by round, then court. Ids are 1..=len.
    pub matches: Vec<Match>,
    pub player_stats: Vec<PlayerStats>,
    /// Every round has an entry, empty when nobody sits out.
    pub round_sitting_out: BTreeMap<u32, Vec<Player>>,
}

impl Schedule {
    /// Assemble a schedule and derive player stats from the matches.
    pub fn new(
        players: &[Player],
        matches: Vec<Match>,
        round_sitting_out: BTreeMap<u32, Vec<Player>>,
    ) -> Self {
        let mut schedule = Self {
            matches,
            player_stats: players
                .iter()
                .map(|p| PlayerStats {
                    id: p.id,
                    name: p.name.clone(),
                    match_count: 0,
                })
                .collect(),
            round_sitting_out,
        };
        schedule.recompute_stats();
        schedule
    }

    /// All players in id order.
    pub fn players(&self) -> Vec<Player> {
        self.player_stats
            .iter()
            .map(|s| Player::new(s.id, s.name.clone()))
            .collect()
    }

    pub fn player(&self, id: PlayerId) -> Option<Player> {
        self.player_stats
            .iter()
            .find(|s| s.id == id)
            .map(|s| Player::new(s.id, s.name.clone()))
    }

    pub fn num_rounds(&self) -> u32 {
        let from_matches = self.matches.iter().map(|m| m.round).max().unwrap_or(0);
        let from_sitting = self.round_sitting_out.keys().copied().max().unwrap_or(0);
        from_matches.max(from_sitting)
    }

    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Sitting-out player ids for a round (empty if the round is unknown).
    pub fn sitting_out_ids(&self, round: u32) -> Vec<PlayerId> {
        self.round_sitting_out
            .get(&round)
            .map(|ps| ps.iter().map(|p| p.id).collect())
            .unwrap_or_default()
    }

    pub fn is_sitting_out(&self, id: PlayerId, round: u32) -> bool {
        self.round_sitting_out
            .get(&round)
            .is_some_and(|ps| ps.iter().any(|p| p.id == id))
    }

    fn match_index(&self, match_id: MatchId) -> Result<usize, ScheduleError> {
        self.matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(ScheduleError::MatchNotFound(match_id))
    }

    /// Set (or overwrite) the result of a match.
    pub fn record_result(&mut self, match_id: MatchId, score: MatchScore) -> Result<(), ScheduleError> {
        let idx = self.match_index(match_id)?;
        self.matches[idx].result = Some(score);
        Ok(())
    }

    pub fn clear_result(&mut self, match_id: MatchId) -> Result<(), ScheduleError> {
        let idx = self.match_index(match_id)?;
        self.matches[idx].result = None;
        Ok(())
    }

    /// Rename players by position (index 0 is player 1). Blank entries keep the current name.
    pub fn rename_players(&mut self, names: &[String]) -> Result<(), ScheduleError> {
        if names.len() > self.player_stats.len() {
            return Err(ScheduleError::TooManyNames {
                names: names.len(),
                players: self.player_stats.len() as u32,
            });
        }
        let mut renamed: BTreeMap<PlayerId, String> = BTreeMap::new();
        for (stats, name) in self.player_stats.iter_mut().zip(names) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            stats.name = name.to_string();
            renamed.insert(stats.id, stats.name.clone());
        }
        let apply = |p: &mut Player| {
            if let Some(name) = renamed.get(&p.id) {
                p.name = name.clone();
            }
        };
        for m in &mut self.matches {
            m.players.iter_mut().for_each(apply);
        }
        for sitting in self.round_sitting_out.values_mut() {
            sitting.iter_mut().for_each(apply);
        }
        Ok(())
    }

    /// Swap two player slots between (or within) matches. No fairness checks.
    ///
    /// The affected rounds' sitting-out lists and the player stats are rebuilt afterwards.
    pub fn swap_players(
        &mut self,
        match_a: MatchId,
        slot_a: usize,
        match_b: MatchId,
        slot_b: usize,
    ) -> Result<(), ScheduleError> {
        for slot in [slot_a, slot_b] {
            if slot > 3 {
                return Err(ScheduleError::InvalidSlot(slot));
            }
        }
        let ia = self.match_index(match_a)?;
        let ib = self.match_index(match_b)?;

        if ia == ib {
            self.matches[ia].players.swap(slot_a, slot_b);
            return Ok(());
        }

        self.exchange_seats(ia, slot_a, ib, slot_b);
        let clash = if !self.matches[ib].has_distinct_players() {
            Some(match_b)
        } else if !self.matches[ia].has_distinct_players() {
            Some(match_a)
        } else {
            None
        };
        if let Some(id) = clash {
            self.exchange_seats(ia, slot_a, ib, slot_b);
            return Err(ScheduleError::DuplicatePlayerInMatch(id));
        }

        let rounds = [self.matches[ia].round, self.matches[ib].round];
        for round in rounds {
            self.refresh_sitting_out(round);
        }
        self.recompute_stats();
        Ok(())
    }

    fn exchange_seats(&mut self, ia: usize, slot_a: usize, ib: usize, slot_b: usize) {
        let pa = self.matches[ia].players[slot_a].clone();
        let pb = std::mem::replace(&mut self.matches[ib].players[slot_b], pa);
        self.matches[ia].players[slot_a] = pb;
    }

    /// Rebuild a round's sitting-out list as everyone not seated in that round.
    pub fn refresh_sitting_out(&mut self, round: u32) {
        let seated: HashSet<PlayerId> = self
            .matches_in_round(round)
            .flat_map(|m| m.player_ids())
            .collect();
        let sitting: Vec<Player> = self
            .players()
            .into_iter()
            .filter(|p| !seated.contains(&p.id))
            .collect();
        self.round_sitting_out.insert(round, sitting);
    }

    /// Recount matches per player from the match list.
    pub fn recompute_stats(&mut self) {
        for stats in &mut self.player_stats {
            stats.match_count = 0;
        }
        for m in &self.matches {
            for id in m.player_ids() {
                if let Some(stats) = self.player_stats.iter_mut().find(|s| s.id == id) {
                    stats.match_count += 1;
                }
            }
        }
    }
}
