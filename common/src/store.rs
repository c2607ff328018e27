//! Persistence seams the bot pipeline reads and writes through.
//!
//! Grounded on the teacher's `IGame` trait (`common::game::traits`): a
//! single `#[async_trait]` interface in front of whatever storage backs it.
//! Here the concerns split into four narrower traits along the boundaries
//! named in spec §6 (player row, track rows, load/demand state, and the
//! player-facing operations the Executor drives), each with an in-memory
//! implementation — the persistent store's schema beyond these columns is
//! an explicit non-goal, so no real database driver is wired in.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::demand::DemandCard;
use crate::error::{GameError, GameResult};
use crate::game::Game;
use crate::geometry::Location;
use crate::ids::{GameId, PlayerId};
use crate::load::{DroppedLoads, LoadRegistry, LoadState, LoadType};
use crate::player::Player;
use crate::track::{PlayerTrackState, TrackSegment};
use crate::train::{PurchaseKind, TrainType};

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn game(&self, game_id: GameId) -> GameResult<Game>;

    async fn players(&self, game_id: GameId) -> GameResult<Vec<Player>>;

    async fn player(&self, game_id: GameId, player_id: PlayerId) -> GameResult<Player>;

    async fn set_current_seat_index(&self, game_id: GameId, index: usize) -> GameResult<()>;

    async fn update_player(&self, game_id: GameId, player: Player) -> GameResult<()>;
}

#[async_trait]
pub trait TrackStore: Send + Sync {
    async fn tracks(&self, game_id: GameId) -> GameResult<Vec<PlayerTrackState>>;

    async fn player_track(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> GameResult<PlayerTrackState>;

    async fn append_segments(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        segments: Vec<TrackSegment>,
    ) -> GameResult<()>;

    async fn reset_turn_build_costs(&self, game_id: GameId) -> GameResult<()>;
}

#[async_trait]
pub trait LoadStore: Send + Sync {
    async fn load_registry(&self, game_id: GameId) -> GameResult<LoadRegistry>;

    async fn dropped_loads(&self, game_id: GameId) -> GameResult<DroppedLoads>;

    async fn set_available(&self, game_id: GameId, load_type: LoadType, available: u32) -> GameResult<()>;

    async fn decrement_dropped(
        &self,
        game_id: GameId,
        city: String,
        load_type: LoadType,
        count: u32,
    ) -> GameResult<()>;

    async fn demand_deck_remaining(&self, game_id: GameId) -> GameResult<usize>;

    async fn draw_demand_card(&self, game_id: GameId) -> GameResult<DemandCard>;

    async fn demand_card_by_id(&self, game_id: GameId, card_id: u32) -> GameResult<Option<DemandCard>>;
}

/// Outcome of a successful delivery, used by the Executor and AuditSink.
#[derive(Clone, Debug)]
pub struct DeliveryOutcome {
    pub payment: u32,
    pub discarded_card_id: u32,
    pub drawn_card: DemandCard,
}

/// The player-facing operations the Executor drives, mirroring the single
/// human-turn pipeline's mutation surface (spec §6, "human-player turn
/// pipeline" is an external collaborator; this trait is the bot's view of
/// that same surface).
#[async_trait]
pub trait PlayerOps: Send + Sync {
    async fn move_one_milepost(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        to: Location,
    ) -> GameResult<()>;

    async fn pickup_load(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        city: String,
        load_type: LoadType,
    ) -> GameResult<()>;

    async fn deliver_for_player(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        card_id: u32,
        demand_index: usize,
    ) -> GameResult<DeliveryOutcome>;

    async fn purchase_train(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        kind: PurchaseKind,
        target: TrainType,
    ) -> GameResult<()>;
}

#[derive(Default)]
struct GameData {
    game: Option<Game>,
    players: HashMap<PlayerId, Player>,
    seat_order: Vec<PlayerId>,
    tracks: HashMap<PlayerId, PlayerTrackState>,
    loads: LoadRegistry,
    dropped: DroppedLoads,
    demand_deck: Vec<DemandCard>,
    next_card_serial: u32,
}

/// A simple, fully in-memory implementation of all four store traits,
/// grounded on the teacher's `MapData`/`Game` in-process storage pattern
/// rather than any real database client.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    games: Arc<Mutex<HashMap<GameId, GameData>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_game(
        &self,
        game: Game,
        players: Vec<Player>,
        demand_deck: Vec<DemandCard>,
        loads: LoadRegistry,
    ) {
        let mut data = GameData::default();
        let seat_order = players.iter().map(|p| p.id).collect();
        for p in players {
            data.tracks.insert(p.id, PlayerTrackState::new(p.id));
            data.players.insert(p.id, p);
        }
        data.seat_order = seat_order;
        data.loads = loads;
        let next_serial = demand_deck.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        data.demand_deck = demand_deck;
        data.next_card_serial = next_serial;
        data.game = Some(game);

        let game_id = data.game.as_ref().unwrap().id;
        self.games.lock().await.insert(game_id, data);
    }

    async fn with_game<T>(
        &self,
        game_id: GameId,
        f: impl FnOnce(&GameData) -> GameResult<T>,
    ) -> GameResult<T> {
        let games = self.games.lock().await;
        let data = games.get(&game_id).ok_or(GameError::NoSuchGame(game_id))?;
        f(data)
    }

    async fn with_game_mut<T>(
        &self,
        game_id: GameId,
        f: impl FnOnce(&mut GameData) -> GameResult<T>,
    ) -> GameResult<T> {
        let mut games = self.games.lock().await;
        let data = games.get_mut(&game_id).ok_or(GameError::NoSuchGame(game_id))?;
        f(data)
    }
}

#[async_trait]
impl GameStore for InMemoryStore {
    async fn game(&self, game_id: GameId) -> GameResult<Game> {
        self.with_game(game_id, |d| Ok(d.game.clone().unwrap())).await
    }

    async fn players(&self, game_id: GameId) -> GameResult<Vec<Player>> {
        self.with_game(game_id, |d| {
            Ok(d.seat_order.iter().map(|id| d.players[id].clone()).collect())
        })
        .await
    }

    async fn player(&self, game_id: GameId, player_id: PlayerId) -> GameResult<Player> {
        self.with_game(game_id, |d| {
            d.players
                .get(&player_id)
                .cloned()
                .ok_or(GameError::BotNotFound(game_id, player_id))
        })
        .await
    }

    async fn set_current_seat_index(&self, game_id: GameId, index: usize) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            d.game.as_mut().unwrap().current_seat_index = index;
            Ok(())
        })
        .await
    }

    async fn update_player(&self, game_id: GameId, player: Player) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            d.players.insert(player.id, player);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TrackStore for InMemoryStore {
    async fn tracks(&self, game_id: GameId) -> GameResult<Vec<PlayerTrackState>> {
        self.with_game(game_id, |d| Ok(d.tracks.values().cloned().collect()))
            .await
    }

    async fn player_track(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> GameResult<PlayerTrackState> {
        self.with_game(game_id, |d| {
            d.tracks
                .get(&player_id)
                .cloned()
                .ok_or(GameError::BotNotFound(game_id, player_id))
        })
        .await
    }

    async fn append_segments(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        segments: Vec<TrackSegment>,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            let state = d
                .tracks
                .get_mut(&player_id)
                .ok_or(GameError::BotNotFound(game_id, player_id))?;
            state.append_segments(segments);
            Ok(())
        })
        .await
    }

    async fn reset_turn_build_costs(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            for state in d.tracks.values_mut() {
                state.reset_turn_build_cost();
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl LoadStore for InMemoryStore {
    async fn load_registry(&self, game_id: GameId) -> GameResult<LoadRegistry> {
        self.with_game(game_id, |d| Ok(d.loads.clone())).await
    }

    async fn dropped_loads(&self, game_id: GameId) -> GameResult<DroppedLoads> {
        self.with_game(game_id, |d| Ok(d.dropped.clone())).await
    }

    async fn set_available(&self, game_id: GameId, load_type: LoadType, available: u32) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            let state = d
                .loads
                .entry(load_type)
                .or_insert_with(|| LoadState {
                    total: available,
                    available,
                    producing_cities: Vec::new(),
                });
            state.available = available;
            Ok(())
        })
        .await
    }

    async fn decrement_dropped(
        &self,
        game_id: GameId,
        city: String,
        load_type: LoadType,
        count: u32,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            let key = (city, load_type);
            if let Some(amount) = d.dropped.get_mut(&key) {
                *amount = amount.saturating_sub(count);
                if *amount == 0 {
                    d.dropped.remove(&key);
                }
            }
            Ok(())
        })
        .await
    }

    async fn demand_deck_remaining(&self, game_id: GameId) -> GameResult<usize> {
        self.with_game(game_id, |d| Ok(d.demand_deck.len())).await
    }

    async fn draw_demand_card(&self, game_id: GameId) -> GameResult<DemandCard> {
        self.with_game_mut(game_id, |d| {
            if d.demand_deck.is_empty() {
                // Reshuffle is an external collaborator's concern; here we
                // simply keep issuing fresh serials so a long-running test
                // never stalls on an empty deck.
                d.next_card_serial += 1;
                return Ok(DemandCard {
                    id: d.next_card_serial,
                    demands: Vec::new(),
                });
            }
            Ok(d.demand_deck.remove(0))
        })
        .await
    }

    async fn demand_card_by_id(&self, game_id: GameId, card_id: u32) -> GameResult<Option<DemandCard>> {
        self.with_game(game_id, |d| {
            Ok(d.demand_deck.iter().find(|c| c.id == card_id).cloned())
        })
        .await
    }
}

#[async_trait]
impl PlayerOps for InMemoryStore {
    async fn move_one_milepost(&self, game_id: GameId, player_id: PlayerId, to: Location) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            let player = d
                .players
                .get_mut(&player_id)
                .ok_or(GameError::BotNotFound(game_id, player_id))?;
            player.train.remaining_movement = player.train.remaining_movement.saturating_sub(1);
            player.train.position = Some(to);
            player.train.movement_history.push(to);
            Ok(())
        })
        .await
    }

    async fn pickup_load(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        city: String,
        load_type: LoadType,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            let player = d
                .players
                .get_mut(&player_id)
                .ok_or(GameError::BotNotFound(game_id, player_id))?;
            if player.train.carried_loads.len() >= player.train_type.capacity() {
                return Err(GameError::Store("train is at capacity".into()));
            }
            player.train.carried_loads.push(load_type);

            let key = (city, load_type);
            if let Some(amount) = d.dropped.get_mut(&key) {
                *amount = amount.saturating_sub(1);
                if *amount == 0 {
                    d.dropped.remove(&key);
                }
            } else if let Some(state) = d.loads.get_mut(&load_type) {
                state.available = state.available.saturating_sub(1);
            }
            Ok(())
        })
        .await
    }

    async fn deliver_for_player(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        card_id: u32,
        demand_index: usize,
    ) -> GameResult<DeliveryOutcome> {
        let drawn = self.draw_demand_card(game_id).await?;
        self.with_game_mut(game_id, |d| {
            let player = d
                .players
                .get_mut(&player_id)
                .ok_or(GameError::BotNotFound(game_id, player_id))?;
            let card_pos = player
                .hand
                .iter()
                .position(|c| c.id == card_id)
                .ok_or_else(|| GameError::Store(format!("card {card_id} not in hand")))?;
            let demand = player.hand[card_pos]
                .demands
                .get(demand_index)
                .cloned()
                .ok_or_else(|| GameError::Store("demand index out of range".into()))?;

            if let Some(pos) = player.train.carried_loads.iter().position(|l| *l == demand.load_type) {
                player.train.carried_loads.remove(pos);
            }
            player.apply_payment(demand.payment);
            player.hand.remove(card_pos);
            player.hand.push(drawn.clone());

            Ok(DeliveryOutcome {
                payment: demand.payment,
                discarded_card_id: card_id,
                drawn_card: drawn.clone(),
            })
        })
        .await
    }

    async fn purchase_train(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        kind: PurchaseKind,
        target: TrainType,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |d| {
            let player = d
                .players
                .get_mut(&player_id)
                .ok_or(GameError::BotNotFound(game_id, player_id))?;
            let (edge_kind, cost) = player
                .train_type
                .change_to(target)
                .ok_or_else(|| GameError::Store(format!("no upgrade edge to {target:?}")))?;
            if edge_kind != kind {
                return Err(GameError::Store("purchase kind does not match upgrade graph edge".into()));
            }
            if player.money < cost {
                return Err(GameError::Store("insufficient money".into()));
            }
            if target.capacity() < player.train.carried_loads.len() {
                return Err(GameError::Store("target train type cannot carry current loads".into()));
            }
            player.money -= cost;
            player.train_type = target;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Archetype, BotConfig, Skill};

    fn sample_player() -> Player {
        Player::new_bot(
            PlayerId::new(),
            "#112233".into(),
            BotConfig {
                skill: Skill::Medium,
                archetype: Archetype::Opportunist,
            },
        )
    }

    #[tokio::test]
    async fn seed_and_fetch_round_trips() {
        let store = InMemoryStore::new();
        let game_id = GameId::new();
        let player = sample_player();
        let player_id = player.id;
        store
            .seed_game(Game::new(game_id, 1), vec![player], Vec::new(), LoadRegistry::new())
            .await;

        let fetched = GameStore::player(&store, game_id, player_id).await.unwrap();
        assert_eq!(fetched.id, player_id);
    }

    #[tokio::test]
    async fn append_segments_persists_across_calls() {
        let store = InMemoryStore::new();
        let game_id = GameId::new();
        let player = sample_player();
        let player_id = player.id;
        store
            .seed_game(Game::new(game_id, 1), vec![player], Vec::new(), LoadRegistry::new())
            .await;

        TrackStore::append_segments(
            &store,
            game_id,
            player_id,
            vec![TrackSegment {
                a: Location::new(0, 0),
                b: Location::new(1, 0),
                cost: 1,
            }],
        )
        .await
        .unwrap();

        let track = TrackStore::player_track(&store, game_id, player_id).await.unwrap();
        assert_eq!(track.segments.len(), 1);
        assert_eq!(track.total_cost, 1);
    }
}
