use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{SnapshotEntryRow, SnapshotRow};
use crate::domain::{RankedAthlete, RankingSnapshot};

/// Persists snapshot header and entries; returns the new snapshot id
pub fn insert_snapshot(
    conn: &Connection,
    team_id: i64,
    generated_at: DateTime<Utc>,
    history_version: i64,
    converged: bool,
    iterations: usize,
    athletes: &[RankedAthlete],
) -> Result<i64> {
    let sql = "INSERT INTO ranking_snapshots (team_id, generated_at, history_version, converged, iterations) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id";

    let snapshot_id: i64 = conn
        .query_row(
            sql,
            params![team_id, generated_at, history_version, converged, iterations as i64],
            |row| row.get(0),
        )
        .context("Failed to insert ranking snapshot")?;

    for athlete in athletes {
        insert_entry(conn, snapshot_id, athlete)?;
    }

    Ok(snapshot_id)
}

fn insert_entry(conn: &Connection, snapshot_id: i64, athlete: &RankedAthlete) -> Result<()> {
    let sql = "INSERT INTO snapshot_entries (snapshot_id, athlete_id, name, rating, confidence, confidence_tier, races_completed, comparisons, rank, trend) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

    conn.execute(
        sql,
        params![
            snapshot_id,
            athlete.athlete_id,
            athlete.name,
            athlete.rating,
            athlete.confidence,
            athlete.confidence_tier.as_str(),
            athlete.races_completed,
            athlete.comparisons,
            athlete.rank,
            athlete.trend.as_str(),
        ],
    )
    .with_context(|| format!("Failed to insert snapshot entry for athlete {}", athlete.athlete_id))
    .map(|_| ())
}

fn parse_snapshot_row(row: &rusqlite::Row) -> rusqlite::Result<SnapshotRow> {
    Ok(SnapshotRow {
        id: row.get(0)?,
        team_id: row.get(1)?,
        generated_at: row.get(2)?,
        history_version: row.get(3)?,
        converged: row.get(4)?,
        iterations: row.get(5)?,
    })
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<SnapshotEntryRow> {
    Ok(SnapshotEntryRow {
        athlete_id: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
        confidence: row.get(3)?,
        confidence_tier: row.get(4)?,
        races_completed: row.get(5)?,
        comparisons: row.get(6)?,
        rank: row.get(7)?,
        trend: row.get(8)?,
    })
}

pub fn get_latest_for_team(conn: &Connection, team_id: i64) -> Result<Option<RankingSnapshot>> {
    let sql = "SELECT id, team_id, generated_at, history_version, converged, iterations FROM ranking_snapshots WHERE team_id = ?1 ORDER BY id DESC LIMIT 1";

    let header = conn
        .query_row(sql, params![team_id], parse_snapshot_row)
        .optional()
        .context("Failed to get latest snapshot for team")?;

    match header {
        Some(header) => Ok(Some(load_snapshot(conn, header)?)),
        None => Ok(None),
    }
}

fn load_snapshot(conn: &Connection, header: SnapshotRow) -> Result<RankingSnapshot> {
    let sql = "SELECT athlete_id, name, rating, confidence, confidence_tier, races_completed, comparisons, rank, trend FROM snapshot_entries WHERE snapshot_id = ?1 ORDER BY rank";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![header.id], parse_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let athletes = rows
        .into_iter()
        .map(SnapshotEntryRow::into_ranked)
        .collect::<Result<Vec<_>>>()?;

    Ok(RankingSnapshot {
        snapshot_id: header.id,
        team_id: header.team_id,
        generated_at: header.generated_at,
        history_version: header.history_version,
        converged: header.converged,
        iterations: header.iterations as usize,
        athletes,
    })
}
