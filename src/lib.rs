pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod rating;
pub mod schedule;
pub mod services;
pub mod store;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::domain::{AthleteId, TeamId};
use crate::schedule::{generate_schedule, BoatConfig, ScheduleRequest};
use crate::services::server::{build_state, ServerService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::new();
    store::open_pool(&config.storage)?;
    println!("Database ready at {}", config.storage.database_path);
    Ok(())
}

pub fn handle_reset() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.storage.database_path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)?;
    println!("Database reset at {}", config.storage.database_path);
    Ok(())
}

pub fn handle_recalculate(team_id: TeamId) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let state = build_state(AppConfig::new())?;
        let snapshot = state.rankings.recalculate_rankings(team_id).await?;
        print_json(snapshot.as_ref())
    })
}

pub fn handle_rankings(team_id: TeamId) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let state = build_state(AppConfig::new())?;
        let snapshot = state
            .rankings
            .fetch_rankings(team_id)
            .await?
            .with_context(|| format!("Team {} has not been ranked yet", team_id))?;
        print_json(snapshot.as_ref())
    })
}

pub fn handle_schedule(
    athletes: &[AthleteId],
    boats: usize,
    seats: usize,
    pieces: usize,
    swaps: &[(AthleteId, AthleteId)],
) -> Result<()> {
    let config = AppConfig::new();
    let request = ScheduleRequest {
        athlete_ids: athletes.to_vec(),
        boat_config: BoatConfig {
            boats,
            seats_per_boat: seats,
        },
        piece_count: pieces,
        manual_rotation: swaps.to_vec(),
    };
    let schedule = generate_schedule(&request, &config.schedule)?;
    print_json(&schedule)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
