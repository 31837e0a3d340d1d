//! Integration tests for candidate generation, candidate scoring and whole-schedule fitness.

use doubles_scheduler::logic::{
    assemble_round, balance_score, commit_candidate, court_score, four_player_groups,
    generate_candidates, must_play_score, opposition_score, partnership_score, pick_best,
    sample_four_player_groups, schedule_metrics, score_candidate, score_metrics, team_splits,
    MatchCandidate, RoundSettings, ScheduleMetrics, ScoringContext,
};
use doubles_scheduler::{Match, Player, PlayerId, PlayerState, Schedule, ScoringWeights};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashSet};

fn candidate(team_1: [u32; 2], team_2: [u32; 2], court: u32) -> MatchCandidate {
    MatchCandidate {
        team_1,
        team_2,
        court,
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn players(n: u32) -> Vec<Player> {
    (1..=n).map(|id| Player::new(id, format!("P{id}"))).collect()
}

fn seated(id: u32, round: u32, court: u32, ids: [u32; 4], roster: &[Player]) -> Match {
    Match::new(id, round, court, ids.map(|i| roster[(i - 1) as usize].clone()))
}

fn benched(ids: &[u32], roster: &[Player]) -> Vec<Player> {
    ids.iter().map(|&i| roster[(i - 1) as usize].clone()).collect()
}

#[test]
fn team_splits_are_the_three_distinct_pairings() {
    let splits = team_splits([1, 2, 3, 4]);
    let keys: HashSet<[u32; 2]> = splits.iter().map(|(t1, _)| *t1).collect();
    assert_eq!(keys.len(), 3);
    for (t1, t2) in splits {
        let all: HashSet<u32> = t1.iter().chain(t2.iter()).copied().collect();
        assert_eq!(all.len(), 4);
        assert!(t1.contains(&1));
    }
}

#[test]
fn candidates_cover_every_group_split_and_court() {
    let pool = generate_candidates(&[1, 2, 3, 4, 5], &[1, 2], &[], usize::MAX, &mut rng());
    // C(5,4) groups * 3 splits * 2 courts
    assert_eq!(pool.len(), 30);
    let unique: HashSet<([u32; 4], u32)> = pool.iter().map(|c| (c.players(), c.court)).collect();
    assert_eq!(unique.len(), 30);
}

#[test]
fn no_candidates_with_fewer_than_four_players_or_no_courts() {
    assert!(generate_candidates(&[1, 2, 3], &[1], &[], usize::MAX, &mut rng()).is_empty());
    assert!(generate_candidates(&[1, 2, 3, 4], &[], &[], usize::MAX, &mut rng()).is_empty());
}

#[test]
fn small_must_play_set_is_in_every_group() {
    let groups: Vec<[u32; 4]> = four_player_groups(&[1, 2, 3, 4, 5, 6], &[6, 2]).collect();
    // both fixed, choose 2 of the remaining 4
    assert_eq!(groups.len(), 6);
    assert!(groups.iter().all(|g| g.contains(&6) && g.contains(&2)));
}

#[test]
fn large_must_play_set_bounds_every_group() {
    let must = [1, 3, 5, 7, 8];
    let groups: Vec<[u32; 4]> = four_player_groups(&[1, 2, 3, 4, 5, 6, 7, 8], &must).collect();
    assert_eq!(groups.len(), 5);
    assert!(groups.iter().all(|g| g.iter().all(|id| must.contains(id))));
}

#[test]
fn must_play_ids_outside_the_pool_are_ignored() {
    let groups: Vec<[u32; 4]> = four_player_groups(&[1, 2, 3, 4, 5], &[9]).collect();
    assert_eq!(groups.len(), 5);
}

#[test]
fn pool_under_the_limit_is_fully_enumerated() {
    // C(6,4) groups * 3 splits * 1 court = 45
    let pool = generate_candidates(&[1, 2, 3, 4, 5, 6], &[1], &[], 45, &mut rng());
    assert_eq!(pool.len(), 45);
}

#[test]
fn candidate_limit_caps_the_pool() {
    let available: Vec<u32> = (1..=12).collect();
    let pool = generate_candidates(&available, &[1, 2, 3], &[], 100, &mut rng());
    // whole groups only: 11 groups * 3 splits * 3 courts
    assert_eq!(pool.len(), 99);
    assert!(pool.iter().all(|c| {
        let ids: HashSet<u32> = c.players().into_iter().collect();
        ids.len() == 4 && ids.iter().all(|id| available.contains(id))
    }));
}

#[test]
fn capped_pool_is_not_anchored_on_the_leading_players() {
    let available: Vec<u32> = (1..=40).collect();
    let pool = generate_candidates(&available, &[1, 2, 3, 4], &[], 5000, &mut rng());
    assert!(pool.len() <= 5000);
    assert!(pool.iter().any(|c| !c.players().contains(&1)));
    let seen: HashSet<u32> = pool.iter().flat_map(|c| c.players()).collect();
    assert_eq!(seen.len(), 40);
}

#[test]
fn sampled_groups_are_distinct_and_honour_must_play() {
    let available: Vec<u32> = (1..=20).collect();
    let groups = sample_four_player_groups(&available, &[5, 17], 50, &mut rng());
    assert_eq!(groups.len(), 50);
    let keys: HashSet<[u32; 4]> = groups
        .iter()
        .map(|g| {
            let mut key = *g;
            key.sort_unstable();
            key
        })
        .collect();
    assert_eq!(keys.len(), 50);
    assert!(groups.iter().all(|g| g.contains(&5) && g.contains(&17)));
}

#[test]
fn capped_round_still_seats_idle_players_first() {
    // 40 players, 4 courts: 1-16 played round 1, 17-40 sat out.
    let ids: Vec<PlayerId> = (1..=40).collect();
    let settings = RoundSettings::new(4, false, ScoringWeights::default());
    for seed in 0..10 {
        let mut states = PlayerState::for_players(40);
        for (court, first) in [1u32, 5, 9, 13].into_iter().enumerate() {
            let c = candidate([first, first + 1], [first + 2, first + 3], court as u32 + 1);
            commit_candidate(&c, 1, &mut states);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = assemble_round(2, &ids, &mut states, &settings, &mut rng);
        assert_eq!(outcome.matches.len(), 4);
        let seated: Vec<PlayerId> = outcome.matches.iter().flat_map(|m| m.players()).collect();
        assert!(seated.iter().all(|&id| id > 16), "seed {seed}: {seated:?}");
    }
}

#[test]
fn fresh_state_rewards_new_pairings() {
    let states = PlayerState::for_players(8);
    let ctx = ScoringContext::new(1, &states, ScoringWeights::default());
    let c = candidate([1, 2], [3, 4], 1);
    assert_eq!(partnership_score(&c, &ctx), 1000.0);
    assert_eq!(opposition_score(&c, &ctx), 400.0);
    assert_eq!(balance_score(&c, &ctx), 400.0);
    assert_eq!(must_play_score(&c, &ctx), 0.0);
    assert_eq!(court_score(&c, &ctx), 40.0);
    assert_eq!(score_candidate(&c, &ctx), 1840.0);
}

#[test]
fn repeats_are_penalized_after_commit() {
    let mut states = PlayerState::for_players(8);
    commit_candidate(&candidate([1, 2], [3, 4], 1), 1, &mut states);

    let ctx = ScoringContext::new(2, &states, ScoringWeights::default());
    let again = candidate([1, 2], [5, 6], 1);
    // repeat partners -500, fresh pair +500
    assert_eq!(partnership_score(&again, &ctx), 0.0);
    // 1 and 2 played court 1 already, 5 and 6 have not
    assert_eq!(court_score(&again, &ctx), 0.0);

    let rematch = candidate([1, 5], [3, 6], 2);
    // 1 v 3 met once (+20), the other three pairs are new
    assert_eq!(opposition_score(&rematch, &ctx), 320.0);
}

#[test]
fn opposition_penalty_grows_quadratically() {
    let mut states = PlayerState::for_players(4);
    for round in 1..=3 {
        commit_candidate(&candidate([1, 2], [3, 4], 1), round, &mut states);
    }
    let ctx = ScoringContext::new(4, &states, ScoringWeights::default());
    // every cross pair met 3 times: -50 * 9 each
    assert_eq!(opposition_score(&candidate([1, 2], [3, 4], 1), &ctx), -1800.0);
}

#[test]
fn players_who_sat_out_must_play() {
    let mut states = PlayerState::for_players(6);
    commit_candidate(&candidate([1, 2], [3, 4], 1), 1, &mut states);
    let ctx = ScoringContext::new(2, &states, ScoringWeights::default());

    // 5 and 6 sat out round 1: 1000 + 50 idle round each
    assert_eq!(must_play_score(&candidate([5, 6], [1, 2], 1), &ctx), 2100.0);
    assert_eq!(must_play_score(&candidate([1, 2], [3, 4], 1), &ctx), 0.0);

    // min count is 0 (players 5, 6), so 1-4 are one above it
    assert_eq!(balance_score(&candidate([1, 2], [3, 4], 1), &ctx), 200.0);
    assert_eq!(balance_score(&candidate([5, 6], [1, 2], 1), &ctx), 300.0);
}

#[test]
fn zero_weights_zero_score() {
    let states = PlayerState::for_players(4);
    let weights = ScoringWeights {
        balance: 0.0,
        must_play: 0.0,
        partnership: 0.0,
        opposition: 0.0,
        court: 0.0,
    };
    let ctx = ScoringContext::new(1, &states, weights);
    assert_eq!(score_candidate(&candidate([1, 2], [3, 4], 1), &ctx), 0.0);
}

#[test]
fn pick_best_keeps_first_of_equal_scores() {
    let states = PlayerState::for_players(4);
    let ctx = ScoringContext::new(1, &states, ScoringWeights::default());
    let pool = [
        candidate([1, 2], [3, 4], 1),
        candidate([1, 3], [2, 4], 1),
        candidate([1, 4], [2, 3], 1),
    ];
    assert_eq!(pick_best(&pool, &ctx), Some(pool[0]));
    assert_eq!(pick_best(&[], &ctx), None);
}

#[test]
fn repeated_partnership_dominates_fitness() {
    let roster = players(5);
    let sitting = |a: &[u32], b: &[u32]| {
        BTreeMap::from([(1, benched(a, &roster)), (2, benched(b, &roster))])
    };

    let repeat = Schedule::new(
        &roster,
        vec![
            seated(1, 1, 1, [1, 2, 3, 4], &roster),
            seated(2, 2, 1, [1, 2, 3, 5], &roster),
        ],
        sitting(&[5], &[4]),
    );
    let fresh = Schedule::new(
        &roster,
        vec![
            seated(1, 1, 1, [1, 2, 3, 4], &roster),
            seated(2, 2, 1, [1, 3, 2, 5], &roster),
        ],
        sitting(&[5], &[4]),
    );

    assert_eq!(schedule_metrics(&repeat).repeated_partnerships, 1);
    assert_eq!(schedule_metrics(&fresh).repeated_partnerships, 0);
    assert!(doubles_scheduler::score_schedule(&fresh) > doubles_scheduler::score_schedule(&repeat));
}

#[test]
fn metrics_measure_spread_runs_and_opponents() {
    let roster = players(5);
    let schedule = Schedule::new(
        &roster,
        vec![
            seated(1, 1, 1, [1, 2, 3, 4], &roster),
            seated(2, 2, 1, [1, 3, 2, 4], &roster),
            seated(3, 3, 1, [5, 1, 2, 3], &roster),
        ],
        BTreeMap::from([
            (1, benched(&[5], &roster)),
            (2, benched(&[5], &roster)),
            (3, benched(&[4], &roster)),
        ]),
    );
    let metrics = schedule_metrics(&schedule);
    assert_eq!(metrics.min_matches, 1);
    assert_eq!(metrics.max_matches, 3);
    assert_eq!(metrics.match_spread(), 2);
    assert_eq!(metrics.longest_sit_out_runs, vec![0, 0, 0, 1, 2]);
    // 4 and 5 never share a match
    assert!(metrics.never_opposed_pairs >= 1);
}

#[test]
fn fitness_terms_move_the_score_as_documented() {
    let base = ScheduleMetrics::default();
    // baseline plus the even-range and full-coverage bonuses
    assert_eq!(score_metrics(&base), 10_400.0);

    let isolated = ScheduleMetrics {
        longest_sit_out_runs: vec![1, 1, 1],
        ..ScheduleMetrics::default()
    };
    assert_eq!(score_metrics(&isolated), 10_400.0);

    let run_of_three = ScheduleMetrics {
        longest_sit_out_runs: vec![3],
        ..ScheduleMetrics::default()
    };
    assert_eq!(score_metrics(&run_of_three), 10_400.0 - 50.0 * 27.0);

    let uneven = ScheduleMetrics {
        min_matches: 1,
        max_matches: 3,
        opponent_range: 2,
        never_opposed_pairs: 1,
        heavy_opponent_pairs: 1,
        ..ScheduleMetrics::default()
    };
    assert_eq!(score_metrics(&uneven), 10_000.0 - 200.0 - 100.0 - 10.0 - 30.0);

    let repeats = ScheduleMetrics {
        repeated_partnerships: 2,
        ..ScheduleMetrics::default()
    };
    assert_eq!(score_metrics(&repeats), 10_400.0 - 2000.0);
}
