//! `BotTurnScheduler` (spec §4.8): per-game pending/queued state machine
//! driving the turn pipeline off `turn:change` / `player:reconnect` events.
//!
//! The 1.5s UX delay is a cancellable `tokio::time::sleep` tracked as a
//! `JoinHandle` per spec §9's delayed-dispatch design note, so a shutdown
//! can abort outstanding timers instead of leaking them. `onTurnChange`
//! itself never blocks on the delay or the turn pipeline — it reserves the
//! game's `pending` slot and returns, matching the event-driven dispatch
//! spec §4.8 describes; the spawned task clears `pending` and advances the
//! seat on its own completion. The reservation is made in the same lock
//! acquisition as the emptiness check, so two concurrent `turn:change`
//! calls for the same game can't both slip through (invariant 5 / S4).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use common::conf;
use common::ids::{GameId, PlayerId};
use common::player::BotConfig;
use common::store::GameStore;

use crate::pipeline::TurnPipeline;

pub struct BotTurnScheduler<S> {
    store: Arc<S>,
    pipeline: Arc<TurnPipeline<S>>,
    pending: Arc<Mutex<HashMap<GameId, JoinHandle<()>>>>,
    queued: Arc<Mutex<HashSet<GameId>>>,
}

impl<S> BotTurnScheduler<S>
where
    S: GameStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, pipeline: Arc<TurnPipeline<S>>) -> Self {
        Self {
            store,
            pipeline,
            pending: Arc::new(Mutex::new(HashMap::new())),
            queued: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// `onTurnChange(gameId, seatIndex, playerId?)`.
    ///
    /// The emptiness check and the slot reservation happen under the same
    /// lock acquisition so two genuinely concurrent calls for the same game
    /// can't both observe an empty `pending` and both go on to dispatch
    /// (invariant 5 / scenario S4). Every path that decides not to dispatch
    /// after reserving releases the reservation before returning.
    pub async fn on_turn_change(&self, game_id: GameId, seat_index: usize, player_id: Option<PlayerId>) {
        {
            let mut pending = self.pending.lock().await;
            if pending.contains_key(&game_id) {
                return;
            }
            pending.insert(game_id, tokio::spawn(async {}));
        }

        let Some(player_id) = player_id else {
            tracing::warn!(%game_id, seat_index, "turn:change with no seated player; dropping");
            self.pending.lock().await.remove(&game_id);
            return;
        };

        let player = match self.store.player(game_id, player_id).await {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(%err, %game_id, %player_id, "could not read seat for turn:change");
                self.pending.lock().await.remove(&game_id);
                return;
            }
        };

        if !player.is_bot {
            self.pending.lock().await.remove(&game_id);
            return;
        }

        if !self.any_human_connected(game_id).await {
            self.pending.lock().await.remove(&game_id);
            self.queued.lock().await.insert(game_id);
            return;
        }

        self.dispatch(game_id, player_id, player.bot_config).await;
    }

    /// `onHumanReconnect(gameId)`.
    pub async fn on_human_reconnect(&self, game_id: GameId) {
        let was_queued = self.queued.lock().await.remove(&game_id);
        if !was_queued {
            return;
        }
        if let Ok(game) = self.store.game(game_id).await {
            let seat_index = game.current_seat_index;
            let players = self.store.players(game_id).await.unwrap_or_default();
            let player_id = players.get(seat_index).map(|p| p.id);
            self.on_turn_change(game_id, seat_index, player_id).await;
        }
    }

    async fn any_human_connected(&self, game_id: GameId) -> bool {
        self.store
            .players(game_id)
            .await
            .map(|players| players.iter().any(|p| !p.is_bot && p.is_online))
            .unwrap_or(false)
    }

    /// Spawns the delayed dispatch and replaces `game_id`'s reserved
    /// `pending` placeholder (inserted by the caller's atomic check-and-
    /// reserve) with the real handle. Does not await the spawned task
    /// itself — only the bookkeeping that records it — so the caller sees
    /// `pending` updated and returns promptly.
    async fn dispatch(&self, game_id: GameId, player_id: PlayerId, bot_config: Option<BotConfig>) {
        let Some(bot_config) = bot_config else {
            tracing::warn!(%game_id, %player_id, "bot seat has no bot_config; dropping turn");
            self.pending.lock().await.remove(&game_id);
            return;
        };

        let store = self.store.clone();
        let pipeline = self.pipeline.clone();
        let pending = self.pending.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(conf::BOT_TURN_DELAY_MS)).await;

            let turn_number = store
                .player(game_id, player_id)
                .await
                .map(|p| p.current_turn_number)
                .unwrap_or(0);

            let result = tokio::time::timeout(
                conf::TURN_DEADLINE,
                pipeline.run_turn(game_id, player_id, bot_config, turn_number),
            )
            .await;

            pending.lock().await.remove(&game_id);

            // Failure policy (spec §4.8): an error clears pending without
            // advancing the seat; a human can act manually next.
            match result {
                Ok(Ok(_audit)) => advance_seat(store.as_ref(), game_id, player_id).await,
                Ok(Err(err)) => {
                    tracing::warn!(%err, %game_id, %player_id, "bot turn pipeline failed");
                }
                Err(_elapsed) => {
                    tracing::warn!(%game_id, %player_id, "bot turn exceeded the per-turn deadline");
                }
            }
        });

        self.pending.lock().await.insert(game_id, handle);
    }

    /// Aborts any outstanding dispatch timers — called on shutdown so the
    /// process doesn't leak sleeping tasks.
    pub async fn shutdown(&self) {
        let mut pending = self.pending.lock().await;
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }
}

/// `advanceSeat(gameId, seatIndex)`: increments the bot's per-seat turn
/// counter, wraps the seat index, and writes it back — writing
/// `currentSeatIndex` is itself what triggers the next `turn:change`, so
/// chained bot turns are emergent rather than a recursive call here.
async fn advance_seat<S: GameStore>(store: &S, game_id: GameId, player_id: PlayerId) {
    if let Ok(mut player) = store.player(game_id, player_id).await {
        player.current_turn_number += 1;
        let _ = store.update_player(game_id, player).await;
    }
    if let Ok(mut game) = store.game(game_id).await {
        game.advance_seat();
        let _ = store.set_current_seat_index(game_id, game.current_seat_index).await;
    }
}
