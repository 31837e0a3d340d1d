//! Integration tests for CSV export.

use doubles_scheduler::logic::CSV_HEADER;
use doubles_scheduler::{export_schedule_to_csv, generate_schedule, Match, Player, Schedule, ScheduleConfig};
use std::collections::BTreeMap;

fn read_rows(text: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes())
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn one_row_per_match_plus_header() {
    let cfg = ScheduleConfig::new(4, 10, 2).with_seed(3).with_attempts(5);
    let schedule = generate_schedule(&cfg).unwrap();
    let text = export_schedule_to_csv(&schedule).unwrap();
    let rows = read_rows(&text);
    assert_eq!(rows.len(), schedule.matches.len() + 1);
    assert_eq!(rows[0], CSV_HEADER);
    assert!(rows.iter().all(|r| r.len() == 8));
}

#[test]
fn rows_list_team_order_and_sitting_out_names() {
    let roster: Vec<Player> = ["Ann", "Bo", "Cy", "Di", "Ed, Jr."]
        .iter()
        .enumerate()
        .map(|(i, n)| Player::new(i as u32 + 1, *n))
        .collect();
    let m = Match::new(
        1,
        1,
        2,
        [
            roster[2].clone(),
            roster[0].clone(),
            roster[3].clone(),
            roster[1].clone(),
        ],
    );
    let schedule = Schedule::new(&roster, vec![m], BTreeMap::from([(1, vec![roster[4].clone()])]));

    let text = export_schedule_to_csv(&schedule).unwrap();
    let rows = read_rows(&text);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], ["1", "1", "2", "Cy", "Ann", "Di", "Bo", "Ed, Jr."]);
    assert!(text.starts_with("Match ID,Round,Court,"));
}

#[test]
fn multiple_sitters_are_comma_joined_in_one_field() {
    let roster: Vec<Player> = (1..=6).map(|id| Player::new(id, format!("P{id}"))).collect();
    let m = Match::new(1, 1, 1, [1, 2, 3, 4].map(|i| roster[i - 1].clone()));
    let schedule = Schedule::new(
        &roster,
        vec![m],
        BTreeMap::from([(1, vec![roster[4].clone(), roster[5].clone()])]),
    );
    let rows = read_rows(&export_schedule_to_csv(&schedule).unwrap());
    assert_eq!(rows[1][7], "P5, P6");
}

#[test]
fn empty_schedule_exports_only_the_header() {
    let schedule = Schedule::new(&[], Vec::new(), BTreeMap::new());
    let rows = read_rows(&export_schedule_to_csv(&schedule).unwrap());
    assert_eq!(rows.len(), 1);
}
