//! Snapshot assembly, feasibility checking, pathfinding, planning, plan
//! validation and execution for an automated player's turn.

pub mod audit;
pub mod error;
pub mod executor;
pub mod feasibility;
pub mod pathfinder;
pub mod planner;
pub mod snapshot;
pub mod validator;
pub mod weights;

pub use audit::{AuditSink, InMemoryAuditSink, StrategyAudit};
pub use error::{BotError, BotResult};
pub use executor::{ExecutionResult, Executor};
pub use feasibility::Feasibility;
pub use planner::{FeasibleOption, Planner, RejectedOption, ScoredOption, TurnPlan};
pub use snapshot::{SnapshotAssembler, WorldSnapshot};
