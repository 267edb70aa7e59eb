use anyhow::{Context, Result};
use rusqlite::Connection;

const DROP_ORDER: [&str; 6] = [
    "snapshot_entries",
    "ranking_snapshots",
    "piece_seats",
    "piece_boats",
    "pieces",
    "athletes",
];

/// Creates any missing tables; safe to run on every start
pub fn initialize_database(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::info!("Database schema ready");
    Ok(())
}

/// Drops every table, discarding all recorded pieces and snapshots
pub fn reset_database(conn: &Connection) -> Result<()> {
    for table in DROP_ORDER {
        execute_sql(conn, &format!("DROP TABLE IF EXISTS {}", table))
            .with_context(|| format!("Failed to drop table {}", table))?;
    }

    initialize_database(conn)?;
    log::info!("Database schema reset successfully");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}
