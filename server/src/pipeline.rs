//! Orchestrates one bot turn: capture → plan → validate → execute → audit.
//!
//! Grounded on the teacher's `UmpireServer` (`server/src/main.rs`): a
//! long-lived struct built once at startup, holding `Arc`-shared services,
//! with one method that drives a full turn end to end.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use bot::audit::{AuditSink, StrategyAudit};
use bot::executor::Executor;
use bot::planner::Planner;
use bot::snapshot::SnapshotAssembler;
use bot::validator::validate_plan;
use common::ids::{GameId, PlayerId};
use common::map::MapTopology;
use common::player::BotConfig;
use common::store::{GameStore, LoadStore, PlayerOps, TrackStore};

use crate::events::{EventSink, GameEvent};

pub struct TurnPipeline<S> {
    store: Arc<S>,
    map: Arc<MapTopology>,
    audit_sink: Arc<dyn AuditSink>,
    event_sink: Arc<dyn EventSink>,
}

impl<S> TurnPipeline<S>
where
    S: GameStore + TrackStore + LoadStore + PlayerOps,
{
    pub fn new(
        store: Arc<S>,
        map: Arc<MapTopology>,
        audit_sink: Arc<dyn AuditSink>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            map,
            audit_sink,
            event_sink,
        }
    }

    /// Runs one full bot turn. Returns the audit record that was written, so
    /// callers (the Scheduler) can log or test against it.
    pub async fn run_turn(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        config: BotConfig,
        turn_number: u32,
    ) -> bot::error::BotResult<StrategyAudit> {
        let started = Instant::now();
        self.event_sink.emit(GameEvent::AiThinking { player_id });

        let assembler = SnapshotAssembler::new(self.store.clone(), self.map.clone());
        let snapshot = assembler.capture(game_id, player_id).await?;
        let snapshot_hash = snapshot.fingerprint.clone();

        let mut planner = Planner::new(StdRng::from_entropy());
        let (plan, feasible, rejected) = planner.plan(&snapshot, config);

        let (validated_plan, truncation_reason) = validate_plan(&snapshot, plan);
        if let Some(reason) = &truncation_reason {
            tracing::warn!(%reason, %game_id, %player_id, "plan truncated during validation");
        }

        let executor = Executor::new(self.store.clone());
        let execution_result = executor.execute(game_id, player_id, &validated_plan).await;

        // turnBuildCost is scoped to a single turn (spec §3/§6); reset it
        // here so the next bot turn starts from a clean budget instead of
        // accumulating across turns.
        if let Err(err) = self.store.reset_turn_build_costs(game_id).await {
            tracing::warn!(%err, %game_id, "failed to reset turn build costs");
        }

        self.event_sink.emit(GameEvent::TrackUpdated { game_id, player_id });
        self.event_sink.emit(GameEvent::StatePatch {
            game_id,
            changed_players: vec![player_id],
        });
        self.event_sink.emit(GameEvent::AiTurnComplete {
            player_id,
            summary: validated_plan.rationale.clone(),
            strategy: format!("{config:?}"),
            debug: truncation_reason.clone().unwrap_or_default(),
        });

        let audit = StrategyAudit {
            turn_number,
            archetype: config.archetype,
            skill: config.skill,
            snapshot_hash,
            feasible_options: feasible,
            rejected_options: rejected,
            selected_plan: validated_plan,
            execution_result,
            bot_status: if truncation_reason.is_some() { "truncated" } else { "ok" }.to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
        };

        if let Err(err) = self.audit_sink.record(audit.clone()).await {
            tracing::warn!(%err, %game_id, %player_id, "failed to record strategy audit");
        }

        Ok(audit)
    }
}
