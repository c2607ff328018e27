//! Translates a validated plan into atomic state changes (spec §4.7).

use std::sync::Arc;

use tracing::{info, warn};

use common::ids::{GameId, PlayerId};
use common::store::{DeliveryOutcome, LoadStore, PlayerOps, TrackStore};
use common::train::PurchaseKind;

use crate::error::BotResult;
use crate::planner::{FeasibleOption, TurnPlan};

#[derive(Clone, Debug, Default)]
pub struct ExecutionResult {
    pub success: bool,
    pub actions_executed: usize,
    pub error: Option<String>,
    pub deliveries: Vec<DeliveryOutcome>,
}

pub struct Executor<S> {
    store: Arc<S>,
}

impl<S> Executor<S>
where
    S: PlayerOps + TrackStore + LoadStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Dispatches each option in order, stopping (but keeping already
    /// committed actions) at the first error.
    pub async fn execute(&self, game_id: GameId, player_id: PlayerId, plan: &TurnPlan) -> ExecutionResult {
        let mut result = ExecutionResult {
            success: true,
            actions_executed: 0,
            error: None,
            deliveries: Vec::new(),
        };

        for option in &plan.options {
            match self.execute_one(game_id, player_id, option).await {
                Ok(outcome) => {
                    result.actions_executed += 1;
                    if let Some(delivery) = outcome {
                        result.deliveries.push(delivery);
                    }
                }
                Err(err) => {
                    warn!(error = %err, "executor stopped plan early");
                    result.success = false;
                    result.error = Some(err.to_string());
                    break;
                }
            }
        }

        result
    }

    async fn execute_one(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        option: &FeasibleOption,
    ) -> BotResult<Option<DeliveryOutcome>> {
        match option {
            FeasibleOption::Pass => {
                info!("pass");
                Ok(None)
            }
            FeasibleOption::DeliverLoad { move_path, card_id, demand_index, .. } => {
                for step in move_path.iter().skip(1) {
                    self.store.move_one_milepost(game_id, player_id, *step).await?;
                }
                let outcome = self
                    .store
                    .deliver_for_player(game_id, player_id, *card_id, *demand_index)
                    .await?;
                Ok(Some(outcome))
            }
            FeasibleOption::PickupAndDeliver {
                load_type,
                pickup_city,
                pickup_path,
                delivery_path,
                card_id,
                demand_index,
            } => {
                for step in pickup_path.iter().skip(1) {
                    self.store.move_one_milepost(game_id, player_id, *step).await?;
                }
                self.store
                    .pickup_load(game_id, player_id, pickup_city.clone(), *load_type)
                    .await?;

                if delivery_path.is_empty() {
                    return Ok(None);
                }
                for step in delivery_path.iter().skip(1) {
                    self.store.move_one_milepost(game_id, player_id, *step).await?;
                }
                let outcome = self
                    .store
                    .deliver_for_player(game_id, player_id, *card_id, *demand_index)
                    .await?;
                Ok(Some(outcome))
            }
            FeasibleOption::BuildTrack { segments } | FeasibleOption::BuildTowardMajorCity { segments, .. } => {
                self.store
                    .append_segments(game_id, player_id, segments.clone())
                    .await?;
                Ok(None)
            }
            FeasibleOption::UpgradeTrain { target } => {
                // Capacity and budget re-checks are the purchase operation's
                // responsibility (spec §4.7); the kind it needs is derived
                // from the store's own current train type, not re-derived
                // here, since the Executor has no shadow state of its own.
                self.store
                    .purchase_train(game_id, player_id, PurchaseKind::Upgrade, *target)
                    .await?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::game::Game;
    use common::geometry::Location;
    use common::load::{LoadRegistry, LoadType};
    use common::player::{Archetype, BotConfig, Player, Skill};
    use common::store::{GameStore, InMemoryStore};
    use common::track::TrackSegment;

    #[derive(Clone)]
    struct TestOps {
        inner: InMemoryStore,
    }

    #[async_trait::async_trait]
    impl PlayerOps for TestOps {
        async fn move_one_milepost(
            &self,
            game_id: GameId,
            player_id: PlayerId,
            to: Location,
        ) -> common::GameResult<()> {
            let mut player = GameStore::player(&self.inner, game_id, player_id).await?;
            player.train.position = Some(to);
            GameStore::update_player(&self.inner, game_id, player).await
        }

        async fn pickup_load(
            &self,
            game_id: GameId,
            player_id: PlayerId,
            _city: String,
            load_type: LoadType,
        ) -> common::GameResult<()> {
            let mut player = GameStore::player(&self.inner, game_id, player_id).await?;
            player.train.carried_loads.push(load_type);
            GameStore::update_player(&self.inner, game_id, player).await
        }

        async fn deliver_for_player(
            &self,
            game_id: GameId,
            player_id: PlayerId,
            card_id: u32,
            demand_index: usize,
        ) -> common::GameResult<DeliveryOutcome> {
            let mut player = GameStore::player(&self.inner, game_id, player_id).await?;
            let card_pos = player.hand.iter().position(|c| c.id == card_id).unwrap();
            let demand = player.hand[card_pos].demands[demand_index].clone();
            player.train.carried_loads.retain(|l| *l != demand.load_type);
            player.apply_payment(demand.payment);
            player.hand.remove(card_pos);
            let drawn = self.inner.draw_demand_card(game_id).await?;
            player.hand.push(drawn.clone());
            GameStore::update_player(&self.inner, game_id, player).await?;
            Ok(DeliveryOutcome {
                payment: demand.payment,
                discarded_card_id: card_id,
                drawn_card: drawn,
            })
        }

        async fn purchase_train(
            &self,
            _game_id: GameId,
            _player_id: PlayerId,
            _kind: PurchaseKind,
            _target: common::train::TrainType,
        ) -> common::GameResult<()> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl TrackStore for TestOps {
        async fn tracks(&self, game_id: GameId) -> common::GameResult<Vec<common::track::PlayerTrackState>> {
            self.inner.tracks(game_id).await
        }
        async fn player_track(
            &self,
            game_id: GameId,
            player_id: PlayerId,
        ) -> common::GameResult<common::track::PlayerTrackState> {
            self.inner.player_track(game_id, player_id).await
        }
        async fn append_segments(
            &self,
            game_id: GameId,
            player_id: PlayerId,
            segments: Vec<TrackSegment>,
        ) -> common::GameResult<()> {
            self.inner.append_segments(game_id, player_id, segments).await
        }
        async fn reset_turn_build_costs(&self, game_id: GameId) -> common::GameResult<()> {
            self.inner.reset_turn_build_costs(game_id).await
        }
    }

    #[async_trait::async_trait]
    impl LoadStore for TestOps {
        async fn load_registry(&self, game_id: GameId) -> common::GameResult<LoadRegistry> {
            self.inner.load_registry(game_id).await
        }
        async fn dropped_loads(&self, game_id: GameId) -> common::GameResult<common::load::DroppedLoads> {
            self.inner.dropped_loads(game_id).await
        }
        async fn set_available(&self, game_id: GameId, load_type: LoadType, available: u32) -> common::GameResult<()> {
            self.inner.set_available(game_id, load_type, available).await
        }
        async fn decrement_dropped(
            &self,
            game_id: GameId,
            city: String,
            load_type: LoadType,
            count: u32,
        ) -> common::GameResult<()> {
            self.inner.decrement_dropped(game_id, city, load_type, count).await
        }
        async fn demand_deck_remaining(&self, game_id: GameId) -> common::GameResult<usize> {
            self.inner.demand_deck_remaining(game_id).await
        }
        async fn draw_demand_card(&self, game_id: GameId) -> common::GameResult<common::demand::DemandCard> {
            self.inner.draw_demand_card(game_id).await
        }
        async fn demand_card_by_id(&self, game_id: GameId, card_id: u32) -> common::GameResult<Option<common::demand::DemandCard>> {
            self.inner.demand_card_by_id(game_id, card_id).await
        }
    }

    #[tokio::test]
    async fn s1_delivery_updates_money_and_hand() {
        let inner = InMemoryStore::new();
        let game_id = GameId::new();
        let mut player = Player::new_bot(
            PlayerId::new(),
            "#445566".into(),
            BotConfig { skill: Skill::Hard, archetype: Archetype::Opportunist },
        );
        player.money = 50;
        player.train.position = Some(Location::new(0, 0));
        player.train.carried_loads = vec![LoadType::Coal];
        player.hand = vec![common::demand::DemandCard {
            id: 42,
            demands: vec![common::demand::Demand {
                destination_city: "B".into(),
                load_type: LoadType::Coal,
                payment: 15,
            }],
        }];
        let player_id = player.id;

        inner
            .seed_game(
                Game::new(game_id, 1),
                vec![player],
                vec![common::demand::DemandCard { id: 1, demands: Vec::new() }],
                LoadRegistry::new(),
            )
            .await;

        let ops = Arc::new(TestOps { inner });
        let executor = Executor::new(ops.clone());

        let plan = TurnPlan {
            options: vec![FeasibleOption::DeliverLoad {
                card_id: 42,
                demand_index: 0,
                move_path: vec![Location::new(0, 0)],
            }],
            expected_cash_change: 15,
            rationale: "test".into(),
        };

        let result = executor.execute(game_id, player_id, &plan).await;
        assert!(result.success);
        assert_eq!(result.actions_executed, 1);

        let updated = GameStore::player(&ops.inner, game_id, player_id).await.unwrap();
        assert_eq!(updated.money, 65);
        assert!(updated.train.carried_loads.is_empty());
        assert_eq!(updated.hand.len(), 1);
        assert!(!updated.hand.iter().any(|c| c.id == 42));
    }
}
