use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::AppConfig;
use crate::services::RankingService;
use crate::store::{self, RaceRecordStore, SnapshotStore};

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let state = Arc::new(build_state(self.config.clone())?);

        let app = create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(
            "Server listening on {} (database {})",
            addr, self.config.storage.database_path
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Opens the database and wires the stores and ranking service together
pub fn build_state(config: AppConfig) -> Result<AppState> {
    let pool = store::open_pool(&config.storage)?;
    let records = RaceRecordStore::new(pool.clone(), &config.storage);
    let rankings = RankingService::new(
        records.clone(),
        SnapshotStore::new(pool),
        config.rating.clone(),
    );

    Ok(AppState {
        records,
        rankings,
        config,
    })
}
