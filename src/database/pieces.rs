use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{swap_kind_str, BoatRow, PieceRow, SeatRow};
use crate::domain::{BoatEntry, PieceId, PieceKind, PieceResult, SeatAssignment, Side};

const PIECE_COLUMNS: &str = "id, team_id, session_id, recorded_at, distance_meters, kind, swap_kind, swap_boat_id, swap_outgoing, swap_incoming, swap_other_boat_id, winning_boat_id, margin_seconds";

/// Appends a piece with its boats and seats; returns the new piece id
pub fn insert_piece(conn: &Connection, piece: &PieceResult) -> Result<PieceId> {
    let swap = piece.swap();
    let kind = match piece.kind {
        PieceKind::Baseline => "baseline",
        PieceKind::Swap { .. } => "swap",
    };

    let sql = "INSERT INTO pieces (team_id, session_id, recorded_at, distance_meters, kind, swap_kind, swap_boat_id, swap_outgoing, swap_incoming, swap_other_boat_id, winning_boat_id, margin_seconds) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12) RETURNING id";

    let piece_id: PieceId = conn
        .query_row(
            sql,
            params![
                piece.team_id,
                piece.session_id,
                piece.timestamp,
                piece.distance_meters,
                kind,
                swap.map(|s| swap_kind_str(s.kind)),
                swap.map(|s| s.boat_id.as_str()),
                swap.map(|s| s.outgoing),
                swap.map(|s| s.incoming),
                swap.and_then(|s| s.other_boat_id.as_deref()),
                piece.winning_boat_id,
                piece.margin_seconds,
            ],
            |row| row.get(0),
        )
        .context("Failed to insert piece")?;

    for (position, boat) in piece.boats.iter().enumerate() {
        insert_boat(conn, piece_id, position, boat)?;
    }

    Ok(piece_id)
}

fn insert_boat(conn: &Connection, piece_id: PieceId, position: usize, boat: &BoatEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO piece_boats (piece_id, position, boat_id, elapsed_seconds) VALUES (?1, ?2, ?3, ?4)",
        params![piece_id, position as i64, boat.boat_id, boat.elapsed_seconds],
    )
    .with_context(|| format!("Failed to insert boat {}", boat.boat_id))?;

    for seat in &boat.seats {
        conn.execute(
            "INSERT INTO piece_seats (piece_id, boat_id, seat_number, athlete_id, side) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![piece_id, boat.boat_id, seat.seat_number, seat.athlete_id, seat.side.as_str()],
        )
        .with_context(|| format!("Failed to insert seat {} of boat {}", seat.seat_number, boat.boat_id))?;
    }

    Ok(())
}

fn parse_piece_row(row: &rusqlite::Row) -> rusqlite::Result<PieceRow> {
    Ok(PieceRow {
        id: row.get(0)?,
        team_id: row.get(1)?,
        session_id: row.get(2)?,
        recorded_at: row.get(3)?,
        distance_meters: row.get(4)?,
        kind: row.get(5)?,
        swap_kind: row.get(6)?,
        swap_boat_id: row.get(7)?,
        swap_outgoing: row.get(8)?,
        swap_incoming: row.get(9)?,
        swap_other_boat_id: row.get(10)?,
        winning_boat_id: row.get(11)?,
        margin_seconds: row.get(12)?,
    })
}

fn parse_boat_row(row: &rusqlite::Row) -> rusqlite::Result<BoatRow> {
    Ok(BoatRow {
        piece_id: row.get(0)?,
        boat_id: row.get(1)?,
        elapsed_seconds: row.get(2)?,
    })
}

fn parse_seat_row(row: &rusqlite::Row) -> rusqlite::Result<SeatRow> {
    Ok(SeatRow {
        piece_id: row.get(0)?,
        boat_id: row.get(1)?,
        seat_number: row.get(2)?,
        athlete_id: row.get(3)?,
        side: row.get(4)?,
    })
}

/// All pieces of a team in chronological order
pub fn list_by_team(conn: &Connection, team_id: i64) -> Result<Vec<PieceResult>> {
    let sql = format!(
        "SELECT {} FROM pieces WHERE team_id = ?1 ORDER BY recorded_at, id",
        PIECE_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![team_id], parse_piece_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut boats = load_boats(conn, "p.team_id", team_id)?;

    let mut pieces = rows
        .into_iter()
        .map(|row| {
            let piece_boats = boats.remove(&row.id).unwrap_or_default();
            row.into_result(piece_boats)
        })
        .collect::<Result<Vec<_>>>()?;

    // Text ordering of timestamps is not guaranteed across offsets
    pieces.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
    Ok(pieces)
}

/// The most recently appended piece of a session
pub fn find_last_in_session(
    conn: &Connection,
    team_id: i64,
    session_id: i64,
) -> Result<Option<PieceResult>> {
    let sql = format!(
        "SELECT {} FROM pieces WHERE team_id = ?1 AND session_id = ?2 ORDER BY id DESC LIMIT 1",
        PIECE_COLUMNS
    );

    let row = conn
        .query_row(&sql, params![team_id, session_id], parse_piece_row)
        .optional()
        .context("Failed to query last piece of session")?;

    match row {
        Some(row) => {
            let mut boats = load_boats(conn, "p.id", row.id)?;
            let piece_boats = boats.remove(&row.id).unwrap_or_default();
            Ok(Some(row.into_result(piece_boats)?))
        }
        None => Ok(None),
    }
}

/// Newest piece id of a team, 0 when nothing has been recorded
pub fn history_version(conn: &Connection, team_id: i64) -> Result<PieceId> {
    conn.query_row(
        "SELECT COALESCE(MAX(id), 0) FROM pieces WHERE team_id = ?1",
        params![team_id],
        |row| row.get(0),
    )
    .context("Failed to read history version")
}

fn load_boats(conn: &Connection, scope: &str, key: i64) -> Result<BTreeMap<PieceId, Vec<BoatEntry>>> {
    let boat_sql = format!(
        "SELECT b.piece_id, b.boat_id, b.elapsed_seconds FROM piece_boats b JOIN pieces p ON p.id = b.piece_id WHERE {} = ?1 ORDER BY b.piece_id, b.position",
        scope
    );
    let seat_sql = format!(
        "SELECT s.piece_id, s.boat_id, s.seat_number, s.athlete_id, s.side FROM piece_seats s JOIN pieces p ON p.id = s.piece_id WHERE {} = ?1 ORDER BY s.piece_id, s.boat_id, s.seat_number",
        scope
    );

    let mut stmt = conn.prepare(&seat_sql)?;
    let seat_rows = stmt
        .query_map(params![key], parse_seat_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut seats: HashMap<(PieceId, String), Vec<SeatAssignment>> = HashMap::new();
    for seat in seat_rows {
        let side = Side::parse(&seat.side)
            .ok_or_else(|| anyhow!("Unknown side '{}' on piece {}", seat.side, seat.piece_id))?;
        seats
            .entry((seat.piece_id, seat.boat_id))
            .or_default()
            .push(SeatAssignment {
                seat_number: seat.seat_number,
                athlete_id: seat.athlete_id,
                side,
            });
    }

    let mut stmt = conn.prepare(&boat_sql)?;
    let boat_rows = stmt
        .query_map(params![key], parse_boat_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut boats: BTreeMap<PieceId, Vec<BoatEntry>> = BTreeMap::new();
    for boat in boat_rows {
        let crew = seats
            .remove(&(boat.piece_id, boat.boat_id.clone()))
            .unwrap_or_default();
        boats.entry(boat.piece_id).or_default().push(BoatEntry {
            boat_id: boat.boat_id,
            seats: crew,
            elapsed_seconds: boat.elapsed_seconds,
        });
    }

    Ok(boats)
}
