//! CSV export: one row per match with the round's sitting-out names.

use crate::models::{Schedule, ScheduleError};
use csv::WriterBuilder;
use std::io::Write;

pub const CSV_HEADER: [&str; 8] = [
    "Match ID",
    "Round",
    "Court",
    "Team 1 Player 1",
    "Team 1 Player 2",
    "Team 2 Player 1",
    "Team 2 Player 2",
    "Sitting Out",
];

impl From<csv::Error> for ScheduleError {
    fn from(err: csv::Error) -> Self {
        ScheduleError::Export(err.to_string())
    }
}

/// Write the header and one record per match to `writer`.
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<(), ScheduleError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for m in &schedule.matches {
        let sitting_out = schedule
            .round_sitting_out
            .get(&m.round)
            .map(|ps| ps.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        let id = m.id.to_string();
        let round = m.round.to_string();
        let court = m.court.to_string();
        wtr.write_record([
            id.as_str(),
            round.as_str(),
            court.as_str(),
            m.players[0].name.as_str(),
            m.players[1].name.as_str(),
            m.players[2].name.as_str(),
            m.players[3].name.as_str(),
            sitting_out.as_str(),
        ])?;
    }

    wtr.flush().map_err(|e| ScheduleError::Export(e.to_string()))?;
    Ok(())
}

/// Schedule as CSV text (header row plus one row per match).
pub fn export_schedule_to_csv(schedule: &Schedule) -> Result<String, ScheduleError> {
    let mut buf: Vec<u8> = Vec::new();
    write_schedule_csv(schedule, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ScheduleError::Export(e.to_string()))
}
