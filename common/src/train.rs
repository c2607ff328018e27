//! Train types, the upgrade graph, and per-player train state.

use serde::{Deserialize, Serialize};

use crate::conf;
use crate::geometry::Location;
use crate::load::LoadType;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TrainType {
    Freight,
    FastFreight,
    HeavyFreight,
    Superfreight,
}

/// What kind of train-type change a given source/target pair represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PurchaseKind {
    Upgrade,
    Crossgrade,
}

impl TrainType {
    pub fn capacity(self) -> usize {
        match self {
            TrainType::Freight | TrainType::FastFreight => 2,
            TrainType::HeavyFreight | TrainType::Superfreight => 3,
        }
    }

    pub fn speed(self) -> u32 {
        match self {
            TrainType::Freight | TrainType::HeavyFreight => 9,
            TrainType::FastFreight | TrainType::Superfreight => 12,
        }
    }

    /// The cost and kind of changing from `self` to `target`, if the
    /// upgrade graph (spec §3) has an edge for that pair.
    pub fn change_to(self, target: TrainType) -> Option<(PurchaseKind, u32)> {
        use TrainType::*;
        match (self, target) {
            (Freight, FastFreight) | (Freight, HeavyFreight) => {
                Some((PurchaseKind::Upgrade, conf::UPGRADE_COST))
            }
            (FastFreight, Superfreight) | (HeavyFreight, Superfreight) => {
                Some((PurchaseKind::Upgrade, conf::UPGRADE_COST))
            }
            (FastFreight, HeavyFreight) | (HeavyFreight, FastFreight) => {
                Some((PurchaseKind::Crossgrade, conf::CROSSGRADE_COST))
            }
            _ => None,
        }
    }
}

/// Token recording that the train is mid-ferry-crossing. Opaque to the bot
/// pipeline: spec §3 notes its presence but defines no planner-visible
/// semantics beyond "pending".
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FerryToken {
    pub at: Location,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrainState {
    pub position: Option<Location>,
    pub remaining_movement: u32,
    pub movement_history: Vec<Location>,
    pub carried_loads: Vec<LoadType>,
    pub pending_ferry: Option<FerryToken>,
}

impl TrainState {
    pub fn new_unplaced() -> Self {
        Self {
            position: None,
            remaining_movement: 0,
            movement_history: Vec::new(),
            carried_loads: Vec::new(),
            pending_ferry: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_graph_is_acyclic_and_capacities_match_spec() {
        assert_eq!(TrainType::Freight.capacity(), 2);
        assert_eq!(TrainType::FastFreight.capacity(), 2);
        assert_eq!(TrainType::HeavyFreight.capacity(), 3);
        assert_eq!(TrainType::Superfreight.capacity(), 3);

        assert_eq!(
            TrainType::Freight.change_to(TrainType::FastFreight),
            Some((PurchaseKind::Upgrade, 20))
        );
        assert_eq!(
            TrainType::FastFreight.change_to(TrainType::HeavyFreight),
            Some((PurchaseKind::Crossgrade, 5))
        );
        assert_eq!(TrainType::Superfreight.change_to(TrainType::Freight), None);
        // no edge leads back to Freight from anywhere
        for t in [
            TrainType::Freight,
            TrainType::FastFreight,
            TrainType::HeavyFreight,
            TrainType::Superfreight,
        ] {
            assert_eq!(t.change_to(TrainType::Freight), None);
        }
    }
}
