//! `WorldSnapshot` and the assembler that captures one for planning.
//!
//! Represented as a plain owned value type with no `&mut` methods — per the
//! "deep-frozen objects → shared immutable value type" design note, the
//! absence of mutating methods on a `Sync` value IS the freeze, there is no
//! separate runtime marker to check.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use common::demand::DemandCard;
use common::error::GameError;
use common::game::GameStatus;
use common::geometry::Location;
use common::ids::{GameId, PlayerId};
use common::load::{DroppedLoads, LoadRegistry, LoadType};
use common::map::{MajorCityGroup, MapTopology};
use common::store::{GameStore, LoadStore, TrackStore};
use common::track::TrackSegment;
use common::train::TrainType;

use crate::error::BotResult;

static SNAPSHOT_TICK: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    pub game_id: GameId,
    pub bot_player_id: PlayerId,
    pub status: GameStatus,
    pub money: u32,
    pub debt: u32,
    pub position: Option<Location>,
    pub train_type: TrainType,
    pub remaining_movement: u32,
    pub carried_loads: Vec<LoadType>,
    pub hand: Vec<DemandCard>,
    pub bot_segments: Vec<TrackSegment>,
    pub all_segments: Vec<(PlayerId, TrackSegment)>,
    pub load_availability: LoadRegistry,
    pub dropped_loads: DroppedLoads,
    pub major_city_groups: Vec<MajorCityGroup>,
    pub map: Arc<MapTopology>,
    /// Both directions of every owned segment; positions not in any segment
    /// have no entry (spec §4.2 step 5).
    pub bot_adjacency: HashMap<Location, Vec<Location>>,
    pub major_city_connected: HashMap<String, bool>,
    pub fingerprint: String,
}

impl WorldSnapshot {
    pub fn connects_to_city(&self, city: &str) -> bool {
        self.major_city_connected.get(city).copied().unwrap_or(false)
    }

    pub fn demand_card(&self, card_id: u32) -> Option<&DemandCard> {
        self.hand.iter().find(|c| c.id == card_id)
    }
}

pub struct SnapshotAssembler<S> {
    store: Arc<S>,
    map: Arc<MapTopology>,
}

impl<S> SnapshotAssembler<S>
where
    S: GameStore + TrackStore + LoadStore,
{
    pub fn new(store: Arc<S>, map: Arc<MapTopology>) -> Self {
        Self { store, map }
    }

    pub async fn capture(&self, game_id: GameId, bot_player_id: PlayerId) -> BotResult<WorldSnapshot> {
        let game = self.store.game(game_id).await?;
        let players = self.store.players(game_id).await?;
        let bot = players
            .iter()
            .find(|p| p.id == bot_player_id)
            .cloned()
            .ok_or(GameError::BotNotFound(game_id, bot_player_id))?;

        let tracks = self.store.tracks(game_id).await?;
        let bot_track = tracks
            .iter()
            .find(|t| t.player_id == Some(bot_player_id))
            .cloned()
            .ok_or(GameError::BotNotFound(game_id, bot_player_id))?;

        let mut all_segments = Vec::new();
        for track in &tracks {
            if let Some(pid) = track.player_id {
                for seg in &track.segments {
                    all_segments.push((pid, *seg));
                }
            }
        }

        let mut load_availability = self.store.load_registry(game_id).await?;
        let dropped_loads = self.store.dropped_loads(game_id).await?;

        // available = max(0, available - carried-by-anyone), spec §4.2 step 3.
        let mut carried_counts: HashMap<LoadType, u32> = HashMap::new();
        for p in &players {
            for load in &p.train.carried_loads {
                *carried_counts.entry(*load).or_insert(0) += 1;
            }
        }
        for (load_type, state) in load_availability.iter_mut() {
            let carried = carried_counts.get(load_type).copied().unwrap_or(0);
            state.available = state.available.saturating_sub(carried);
        }

        let mut bot_adjacency: HashMap<Location, Vec<Location>> = HashMap::new();
        for seg in &bot_track.segments {
            bot_adjacency.entry(seg.a).or_default().push(seg.b);
            bot_adjacency.entry(seg.b).or_default().push(seg.a);
        }

        let mut major_city_connected = HashMap::new();
        for group in self.map.major_city_groups() {
            let connected = group.nodes().any(|n| bot_adjacency.contains_key(&n));
            major_city_connected.insert(group.name.clone(), connected);
        }

        let tick = SNAPSHOT_TICK.fetch_add(1, Ordering::Relaxed);
        let fingerprint = fingerprint_of(
            game_id,
            bot_player_id,
            bot.money,
            bot.debt,
            &bot.train,
            &bot_track.segments,
            tick,
        );

        Ok(WorldSnapshot {
            game_id,
            bot_player_id,
            status: game.status,
            money: bot.money,
            debt: bot.debt,
            position: bot.train.position,
            train_type: bot.train_type,
            remaining_movement: bot.train.remaining_movement,
            carried_loads: bot.train.carried_loads.clone(),
            hand: bot.hand.clone(),
            bot_segments: bot_track.segments.clone(),
            all_segments,
            load_availability,
            dropped_loads,
            major_city_groups: self.map.major_city_groups().to_vec(),
            map: self.map.clone(),
            bot_adjacency,
            major_city_connected,
            fingerprint,
        })
    }
}

fn fingerprint_of(
    game_id: GameId,
    bot_player_id: PlayerId,
    money: u32,
    debt: u32,
    train: &common::train::TrainState,
    segments: &[TrackSegment],
    tick: u64,
) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    game_id.0.hash(&mut hasher);
    bot_player_id.0.hash(&mut hasher);
    money.hash(&mut hasher);
    debt.hash(&mut hasher);
    train.position.hash(&mut hasher);
    train.remaining_movement.hash(&mut hasher);
    for load in &train.carried_loads {
        load.hash(&mut hasher);
    }
    for seg in segments {
        seg.hash(&mut hasher);
    }
    let content_hash = hasher.finish();
    // Concatenate content hash with the tick so two captures of genuinely
    // different state never collide even when content happens to match.
    format!("{:08x}{:08x}", content_hash as u32, tick as u32)
}
