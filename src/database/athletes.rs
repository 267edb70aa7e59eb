use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{Athlete, Side};

pub fn upsert_athlete(conn: &Connection, team_id: i64, athlete: &Athlete) -> Result<Athlete> {
    let sql = "INSERT INTO athletes (team_id, id, name, side) VALUES (?1, ?2, ?3, ?4) ON CONFLICT (team_id, id) DO UPDATE SET name = excluded.name, side = excluded.side RETURNING id, name, side";

    let (id, name, side) = conn
        .query_row(
            sql,
            params![team_id, athlete.id, athlete.name, athlete.side.as_str()],
            parse_athlete_row,
        )
        .context("Failed to upsert athlete")?;

    into_athlete(id, name, side)
}

fn parse_athlete_row(row: &rusqlite::Row) -> rusqlite::Result<(i64, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_athlete(id: i64, name: String, side: String) -> Result<Athlete> {
    let side = Side::parse(&side).ok_or_else(|| anyhow!("Unknown side '{}' for athlete {}", side, id))?;
    Ok(Athlete { id, name, side })
}

pub fn list_by_team(conn: &Connection, team_id: i64) -> Result<Vec<Athlete>> {
    let sql = "SELECT id, name, side FROM athletes WHERE team_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![team_id], parse_athlete_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(id, name, side)| into_athlete(id, name, side))
        .collect()
}
