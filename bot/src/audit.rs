//! Strategy audit record and its write-path seam (spec §3, `bot_audits`).

use std::sync::Mutex;

use thiserror::Error;

use common::player::{Archetype, Skill};

use crate::executor::ExecutionResult;
use crate::planner::{RejectedOption, ScoredOption, TurnPlan};

/// One row of `bot_audits`: everything a developer would need to reconstruct
/// why a bot did what it did on a given turn, without replaying the game.
#[derive(Clone, Debug)]
pub struct StrategyAudit {
    pub turn_number: u32,
    pub archetype: Archetype,
    pub skill: Skill,
    pub snapshot_hash: String,
    pub feasible_options: Vec<ScoredOption>,
    pub rejected_options: Vec<RejectedOption>,
    pub selected_plan: TurnPlan,
    pub execution_result: ExecutionResult,
    pub bot_status: String,
    pub duration_ms: u64,
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, audit: StrategyAudit) -> Result<(), AuditError>;
}

/// In-memory ring buffer, bounded so a long-running process doesn't grow
/// without limit; a real implementation persists rows to Postgres instead.
pub struct InMemoryAuditSink {
    capacity: usize,
    records: Mutex<Vec<StrategyAudit>>,
}

impl InMemoryAuditSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn recent(&self) -> Vec<StrategyAudit> {
        self.records.lock().expect("audit sink poisoned").clone()
    }
}

#[async_trait::async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, audit: StrategyAudit) -> Result<(), AuditError> {
        let mut records = self.records.lock().expect("audit sink poisoned");
        records.push(audit);
        if records.len() > self.capacity {
            let overflow = records.len() - self.capacity;
            records.drain(0..overflow);
        }
        Ok(())
    }
}
