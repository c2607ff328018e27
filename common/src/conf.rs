//! Normative numeric constants (spec §6).
//!
//! Mirrors the teacher's `conf` module: a flat set of `pub const`s rather
//! than a runtime-configurable system, since these are rules of the game,
//! not deployment parameters.

use std::time::Duration;

/// Per-turn track-build budget, in ECU millions.
pub const PER_TURN_BUILD_BUDGET: u32 = 20;

/// Cost of a full train upgrade, in ECU millions.
pub const UPGRADE_COST: u32 = 20;

/// Cost of a train crossgrade, in ECU millions.
pub const CROSSGRADE_COST: u32 = 5;

/// A crossgrade is forbidden once more than this much has been spent on
/// track this turn.
pub const CROSSGRADE_BUILD_SPEND_LIMIT: u32 = 15;

/// An active game's hand always holds exactly this many demand cards.
pub const HAND_SIZE: usize = 3;

/// Cash threshold at which a player wins the game.
pub const VICTORY_THRESHOLD: u32 = 250;

/// UX pause before a bot's turn is executed.
pub const BOT_TURN_DELAY_MS: u64 = 1500;

/// Each demand card lists exactly this many demands.
pub const DEMANDS_PER_CARD: usize = 3;

/// Terrain movement/build costs, in ECU millions per segment (§4.1, §6).
pub const TERRAIN_COST_CLEAR: u32 = 1;
pub const TERRAIN_COST_MOUNTAIN: u32 = 2;
pub const TERRAIN_COST_ALPINE: u32 = 5;
pub const TERRAIN_COST_SMALL_MEDIUM_CITY: u32 = 3;
pub const TERRAIN_COST_MAJOR_CITY: u32 = 5;

/// Upper bound on wall-clock time for planning plus execution of one bot
/// turn (§5). On expiry during planning the planner falls back to Pass; on
/// expiry during execution the partial plan is accepted as-is.
pub const TURN_DEADLINE: Duration = Duration::from_secs(10);

/// Length of a snapshot fingerprint, in hex characters.
pub const FINGERPRINT_LEN: usize = 16;
