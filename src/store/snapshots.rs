use anyhow::{Context, Result};
use rusqlite::TransactionBehavior;

use crate::database::{self, snapshots, DbPool};
use crate::domain::{RankingSnapshot, TeamId};

/// Durable home of published ranking snapshots
#[derive(Clone)]
pub struct SnapshotStore {
    pool: DbPool,
}

impl SnapshotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persists `draft` and returns it stamped with its snapshot id
    pub fn save(&self, draft: RankingSnapshot) -> Result<RankingSnapshot> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to open snapshot transaction")?;

        let snapshot_id = snapshots::insert_snapshot(
            &tx,
            draft.team_id,
            draft.generated_at,
            draft.history_version,
            draft.converged,
            draft.iterations,
            &draft.athletes,
        )?;
        tx.commit().context("Failed to commit snapshot")?;

        Ok(RankingSnapshot {
            snapshot_id,
            ..draft
        })
    }

    pub fn latest(&self, team_id: TeamId) -> Result<Option<RankingSnapshot>> {
        let conn = database::get_connection(&self.pool)?;
        snapshots::get_latest_for_team(&conn, team_id)
    }
}
