//! Single-schedule builder: run the round assembler for every round with shared player state.

use crate::logic::round::{assemble_round, RoundSettings};
use crate::models::{player_index, Match, MatchId, Player, PlayerId, PlayerState, Schedule, ScheduleConfig};
use rand::Rng;
use std::collections::BTreeMap;

/// Build one complete candidate schedule.
///
/// State accumulates across rounds so repeat-avoidance and fairness are schedule-wide.
/// Match ids run 1, 2, 3... in round then court order.
pub fn build_schedule<R: Rng + ?Sized>(
    config: &ScheduleConfig,
    players: &[Player],
    rng: &mut R,
) -> Schedule {
    let settings = RoundSettings::new(
        config.num_courts,
        config.avoid_consecutive_sitting_out,
        config.effective_weights(),
    );
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let mut states = PlayerState::for_players(players.len());

    let lookup = |id: PlayerId| -> Player {
        players
            .get(player_index(id))
            .filter(|p| p.id == id)
            .or_else(|| players.iter().find(|p| p.id == id))
            .cloned()
            .unwrap_or_else(|| Player::new(id, Player::default_name(id)))
    };

    let mut matches: Vec<Match> = Vec::new();
    let mut round_sitting_out: BTreeMap<u32, Vec<Player>> = BTreeMap::new();
    let mut next_id: MatchId = 1;

    for round in 1..=config.num_rounds {
        let outcome = assemble_round(round, &ids, &mut states, &settings, rng);
        for candidate in &outcome.matches {
            let seats = candidate.players().map(lookup);
            matches.push(Match::new(next_id, round, candidate.court, seats));
            next_id += 1;
        }
        round_sitting_out.insert(round, outcome.sitting_out.into_iter().map(lookup).collect());
    }

    Schedule::new(players, matches, round_sitting_out)
}
