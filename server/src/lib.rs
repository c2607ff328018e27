//! Bot turn scheduler, audit sink wiring, event bus, and process entry
//! point — the long-lived process that drives automated players' turns.

pub mod config;
pub mod events;
pub mod pipeline;
pub mod scheduler;

pub use config::StartupConfig;
pub use events::{EventSink, GameEvent, LoggingEventSink};
pub use pipeline::TurnPipeline;
pub use scheduler::BotTurnScheduler;
