#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use seat_race_ranking::config::AppConfig;
use seat_race_ranking::domain::{AthleteId, BoatEntry, SeatAssignment, SeatRacePiece, SessionId, Side};

/// App config pointing at a throw-away database; keep the dir alive for the test
pub fn temp_config() -> (AppConfig, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seat_racing.db");
    let config = AppConfig::new().with_database_path(path.to_string_lossy());
    (config, dir)
}

pub fn boat(id: &str, athletes: &[AthleteId], elapsed: f64) -> BoatEntry {
    BoatEntry {
        boat_id: id.to_string(),
        seats: athletes
            .iter()
            .enumerate()
            .map(|(i, &athlete_id)| SeatAssignment {
                seat_number: i as u32 + 1,
                athlete_id,
                side: if i % 2 == 0 { Side::Port } else { Side::Starboard },
            })
            .collect(),
        elapsed_seconds: elapsed,
    }
}

pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 14, 6, 30, 0).unwrap() + Duration::minutes(minute)
}

pub fn piece(session_id: SessionId, minute: i64, boats: Vec<BoatEntry>) -> SeatRacePiece {
    SeatRacePiece {
        session_id,
        boats,
        timestamp: at(minute),
        distance_meters: Some(1000.0),
    }
}
