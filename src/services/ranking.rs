use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::config::RatingSettings;
use crate::domain::{PieceId, RankedAthlete, RankingSnapshot, TeamId, Trend};
use crate::errors::SeatRaceResult;
use crate::rating::calculate_ratings;
use crate::store::{RaceRecordStore, SnapshotStore};

/// Per-team recompute state
#[derive(Default)]
struct TeamSlot {
    recompute: tokio::sync::Mutex<()>,
    latest: RwLock<Option<Arc<RankingSnapshot>>>,
    /// Snapshots published through this slot
    publications: AtomicU64,
}

/// Serializes recomputes per team and serves the latest published snapshot
pub struct RankingService {
    records: RaceRecordStore,
    snapshots: SnapshotStore,
    settings: RatingSettings,
    teams: Mutex<HashMap<TeamId, Arc<TeamSlot>>>,
    runs: AtomicU64,
}

impl RankingService {
    pub fn new(records: RaceRecordStore, snapshots: SnapshotStore, settings: RatingSettings) -> Self {
        Self {
            records,
            snapshots,
            settings,
            teams: Mutex::new(HashMap::new()),
            runs: AtomicU64::new(0),
        }
    }

    fn slot(&self, team_id: TeamId) -> Arc<TeamSlot> {
        self.teams.lock().entry(team_id).or_default().clone()
    }

    /// Recomputes the team's ranking from its full history and publishes it.
    ///
    /// A call that has to wait behind an in-flight run returns that run's
    /// snapshot when it was published after this call started and covers every
    /// piece stored by then; otherwise it runs the engine itself.
    pub async fn recalculate_rankings(&self, team_id: TeamId) -> SeatRaceResult<Arc<RankingSnapshot>> {
        let slot = self.slot(team_id);
        let seen = slot.publications.load(Ordering::Acquire);
        let requested = self.history_version(team_id).await?;

        let _guard = slot.recompute.lock().await;

        if slot.publications.load(Ordering::Acquire) > seen {
            let latest = slot.latest.read().clone();
            if let Some(latest) = latest.filter(|s| s.history_version >= requested) {
                debug!(
                    "Team {} joined in-flight recompute, reusing snapshot {}",
                    team_id, latest.snapshot_id
                );
                return Ok(latest);
            }
        }

        let previous = self.fetch_rankings(team_id).await?;

        let records = self.records.clone();
        let settings = self.settings.clone();
        let evaluation = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
            let roster = records.list_athletes(team_id)?;
            let history = records.get_race_history(team_id)?;
            Ok(calculate_ratings(&roster, &history, &settings))
        })
        .await
        .context("Rating worker failed")??;

        if !evaluation.converged {
            warn!(
                "Ratings for team {} did not converge within {} iterations; publishing best estimate",
                team_id, evaluation.iterations
            );
        }

        let draft = RankingSnapshot {
            snapshot_id: 0,
            team_id,
            generated_at: Utc::now(),
            history_version: evaluation.history_version,
            converged: evaluation.converged,
            iterations: evaluation.iterations,
            athletes: with_trends(evaluation.athletes, previous.as_deref()),
        };

        let store = self.snapshots.clone();
        let snapshot = tokio::task::spawn_blocking(move || store.save(draft))
            .await
            .context("Snapshot worker failed")??;
        let snapshot = Arc::new(snapshot);

        *slot.latest.write() = Some(snapshot.clone());
        slot.publications.fetch_add(1, Ordering::Release);
        self.runs.fetch_add(1, Ordering::Relaxed);

        info!(
            "Published snapshot {} for team {} ({} athletes, history version {})",
            snapshot.snapshot_id,
            team_id,
            snapshot.athletes.len(),
            snapshot.history_version
        );
        Ok(snapshot)
    }

    /// Latest published snapshot, falling back to the newest persisted one
    pub async fn fetch_rankings(&self, team_id: TeamId) -> SeatRaceResult<Option<Arc<RankingSnapshot>>> {
        let slot = self.slot(team_id);
        let cached = slot.latest.read().clone();
        if cached.is_some() {
            return Ok(cached);
        }

        let store = self.snapshots.clone();
        let stored = tokio::task::spawn_blocking(move || store.latest(team_id))
            .await
            .context("Snapshot worker failed")??;
        let Some(stored) = stored else {
            return Ok(None);
        };

        let mut latest = slot.latest.write();
        // a recompute may have published while the database was read
        if latest
            .as_ref()
            .is_none_or(|current| current.snapshot_id < stored.snapshot_id)
        {
            *latest = Some(Arc::new(stored));
        }
        Ok(latest.clone())
    }

    /// Engine runs executed since start-up
    pub fn completed_runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    async fn history_version(&self, team_id: TeamId) -> SeatRaceResult<PieceId> {
        let records = self.records.clone();
        let version = tokio::task::spawn_blocking(move || records.history_version(team_id))
            .await
            .context("History worker failed")??;
        Ok(version)
    }
}

fn with_trends(athletes: Vec<RankedAthlete>, previous: Option<&RankingSnapshot>) -> Vec<RankedAthlete> {
    athletes
        .into_iter()
        .map(|mut athlete| {
            let previous_rank = previous
                .and_then(|p| p.athlete(athlete.athlete_id))
                .map(|p| p.rank);
            athlete.trend = Trend::between(previous_rank, athlete.rank);
            athlete
        })
        .collect()
}
