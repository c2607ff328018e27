//! Per-seat state: the human/bot player row (spec §3).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::demand::DemandCard;
use crate::ids::PlayerId;
use crate::train::{TrainState, TrainType};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Skill {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Archetype {
    BackboneBuilder,
    FreightOptimizer,
    TrunkSprinter,
    ContinentalConnector,
    Opportunist,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BotConfig {
    pub skill: Skill,
    pub archetype: Archetype,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub user_id: Option<Uuid>,
    pub is_bot: bool,
    pub bot_config: Option<BotConfig>,
    /// `#RRGGBB`, unique within a game.
    pub color: String,
    pub money: u32,
    pub debt: u32,
    pub train_type: TrainType,
    pub train: TrainState,
    pub current_turn_number: u32,
    pub is_online: bool,
    pub hand: Vec<DemandCard>,
}

impl Player {
    pub fn new_bot(id: PlayerId, color: String, bot_config: BotConfig) -> Self {
        Self {
            id,
            user_id: None,
            is_bot: true,
            bot_config: Some(bot_config),
            color,
            money: 0,
            debt: 0,
            train_type: TrainType::Freight,
            train: TrainState::new_unplaced(),
            current_turn_number: 0,
            is_online: true,
            hand: Vec::new(),
        }
    }

    /// Applies a delivery payment, repaying debt first and crediting any
    /// remainder to cash (spec §9 open question, resolved: Mercy-Rule debt
    /// takes priority over new cash on every payment, not just forced ones).
    pub fn apply_payment(&mut self, amount: u32) {
        let to_debt = amount.min(self.debt);
        self.debt -= to_debt;
        self.money += amount - to_debt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_repays_debt_before_crediting_cash() {
        let mut p = Player::new_bot(PlayerId::new(), "#FF0000".into(), BotConfig {
            skill: Skill::Easy,
            archetype: Archetype::Opportunist,
        });
        p.debt = 10;
        p.apply_payment(15);
        assert_eq!(p.debt, 0);
        assert_eq!(p.money, 5);
    }

    #[test]
    fn payment_smaller_than_debt_leaves_no_cash() {
        let mut p = Player::new_bot(PlayerId::new(), "#00FF00".into(), BotConfig {
            skill: Skill::Hard,
            archetype: Archetype::BackboneBuilder,
        });
        p.debt = 30;
        p.apply_payment(15);
        assert_eq!(p.debt, 15);
        assert_eq!(p.money, 0);
    }
}
