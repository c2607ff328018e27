//! Process entry point: loads startup configuration, builds the in-memory
//! store and the turn pipeline, and runs the scheduler until shutdown.
//!
//! The transport that feeds `turn:change` / `player:reconnect` events in and
//! `state:patch` / `ai:turn-complete` events out is an explicit non-goal;
//! this binary wires the pieces together the way a real server process
//! would and exposes the scheduler for whatever transport is bolted on.

use std::env;
use std::sync::Arc;

use bot::audit::InMemoryAuditSink;
use common::store::InMemoryStore;
use server::{BotTurnScheduler, LoggingEventSink, StartupConfig, TurnPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let grid_points_path = env::var("GRID_POINTS_JSON").unwrap_or_else(|_| "gridPoints.json".into());
    let load_cities_path = env::var("LOAD_CITIES_JSON").unwrap_or_else(|_| "load_cities.json".into());
    let demand_deck_path = env::var("DEMAND_DECK_JSON").unwrap_or_else(|_| "demand_deck.json".into());

    let grid_points_json = std::fs::read_to_string(&grid_points_path)?;
    let load_cities_json = std::fs::read_to_string(&load_cities_path)?;
    let demand_deck_json = std::fs::read_to_string(&demand_deck_path)?;

    let config = StartupConfig::load(&grid_points_json, &load_cities_json, &demand_deck_json)?;
    tracing::info!(
        demand_cards = config.demand_deck.len(),
        load_types = config.load_registry.len(),
        "startup configuration loaded"
    );

    let store = Arc::new(InMemoryStore::new());
    let audit_sink = Arc::new(InMemoryAuditSink::new(1000));
    let event_sink = Arc::new(LoggingEventSink::new());

    let pipeline = Arc::new(TurnPipeline::new(store.clone(), config.map.clone(), audit_sink, event_sink));
    let scheduler = Arc::new(BotTurnScheduler::new(store.clone(), pipeline));

    tracing::info!("bot turn scheduler ready; awaiting turn:change events");
    tokio::signal::ctrl_c().await?;
    scheduler.shutdown().await;
    tracing::info!("shutdown complete");

    Ok(())
}
