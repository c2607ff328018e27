//! Pure feasibility checks (spec §4.3). Each validator returns a
//! [`Feasibility`] rather than throwing, so the Planner can enumerate
//! rejected options for the audit trail.

use common::conf;
use common::geometry::Location;
use common::load::LoadType;
use common::track::TrackSegment;
use common::train::TrainType;

use crate::snapshot::WorldSnapshot;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Feasibility {
    Feasible,
    Infeasible(String),
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Feasibility::Feasible => None,
            Feasibility::Infeasible(reason) => Some(reason),
        }
    }
}

fn infeasible(reason: &str) -> Feasibility {
    Feasibility::Infeasible(reason.to_string())
}

pub fn validate_delivery(snap: &WorldSnapshot, card_id: u32, demand_index: usize) -> Feasibility {
    let Some(card) = snap.demand_card(card_id) else {
        return infeasible("card not in hand");
    };
    let Some(demand) = card.demand(demand_index) else {
        return infeasible("demand index out of range");
    };
    if !snap.carried_loads.contains(&demand.load_type) {
        return infeasible("required load not carried");
    }
    if snap.position.is_none() {
        return infeasible("no current position");
    }
    if !snap.connects_to_city(&demand.destination_city)
        && !snap
            .map
            .locations_named(&demand.destination_city)
            .iter()
            .any(|loc| snap.bot_adjacency.contains_key(loc))
    {
        return infeasible("destination city not a node in the bot's track graph");
    }
    Feasibility::Feasible
}

pub fn validate_pickup(snap: &WorldSnapshot, load_type: LoadType, city: &str) -> Feasibility {
    if snap.position.is_none() {
        return infeasible("no position");
    }
    if snap.carried_loads.len() >= snap.train_type.capacity() {
        return infeasible("carried loads at capacity");
    }
    let globally_available = snap
        .load_availability
        .get(&load_type)
        .map(|s| s.available > 0)
        .unwrap_or(false);
    let dropped_available = snap
        .dropped_loads
        .get(&(city.to_string(), load_type))
        .map(|n| *n > 0)
        .unwrap_or(false);
    if !globally_available && !dropped_available {
        return infeasible("load neither globally available nor dropped at city");
    }
    let reachable = snap
        .map
        .locations_named(city)
        .iter()
        .any(|loc| snap.bot_adjacency.contains_key(loc));
    if !reachable {
        return infeasible("city not reachable on the bot's track graph");
    }
    Feasibility::Feasible
}

pub fn validate_build(snap: &WorldSnapshot, segments: &[TrackSegment], existing_turn_build_cost: u32) -> Feasibility {
    if segments.is_empty() {
        return infeasible("empty segment list");
    }
    if segments.iter().any(|s| s.cost == 0) {
        return infeasible("non-positive segment cost");
    }
    let total: u32 = segments.iter().map(|s| s.cost).sum();
    if existing_turn_build_cost + total > conf::PER_TURN_BUILD_BUDGET {
        return infeasible("exceeds per-turn build budget");
    }
    if total > snap.money {
        return infeasible("cost exceeds money");
    }
    Feasibility::Feasible
}

pub fn validate_upgrade(snap: &WorldSnapshot, target: TrainType, turn_build_cost: u32) -> Feasibility {
    if snap.train_type == target {
        return infeasible("already that train type");
    }
    let Some((kind, cost)) = snap.train_type.change_to(target) else {
        return infeasible("no edge in the upgrade graph");
    };
    if snap.money < cost {
        return infeasible("insufficient money");
    }
    match kind {
        common::train::PurchaseKind::Upgrade => {
            if turn_build_cost > 0 {
                return infeasible("turn budget: track already built this turn");
            }
        }
        common::train::PurchaseKind::Crossgrade => {
            if turn_build_cost > conf::CROSSGRADE_BUILD_SPEND_LIMIT {
                return infeasible("turn budget: crossgrade spend limit exceeded");
            }
        }
    }
    if target.capacity() < snap.carried_loads.len() {
        return infeasible("target capacity below current carried-load count");
    }
    Feasibility::Feasible
}

/// Used by the Pathfinder's legality check, not exposed as a top-level
/// validator in spec §4.3 but shared by build search and validate_build.
pub fn is_buildable_edge(snap: &WorldSnapshot, a: Location, b: Location) -> bool {
    let Some(terrain_b) = snap.map.terrain(b) else {
        return false;
    };
    if terrain_b.is_water() {
        return false;
    }
    if let (Some(city_a), Some(city_b)) = (snap.map.major_city_lookup(a), snap.map.major_city_lookup(b)) {
        if city_a == city_b {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::demand::{Demand, DemandCard};
    use common::game::GameStatus;
    use common::ids::{GameId, PlayerId};
    use common::load::{LoadRegistry, LoadState};
    use common::map::MapTopology;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn empty_map() -> Arc<MapTopology> {
        Arc::new(MapTopology::load_from_json("[]").unwrap())
    }

    fn base_snapshot() -> WorldSnapshot {
        WorldSnapshot {
            game_id: GameId::new(),
            bot_player_id: PlayerId::new(),
            status: GameStatus::Active,
            money: 50,
            debt: 0,
            position: Some(Location::new(0, 0)),
            train_type: TrainType::Freight,
            remaining_movement: 9,
            carried_loads: vec![LoadType::Coal],
            hand: vec![DemandCard {
                id: 42,
                demands: vec![Demand {
                    destination_city: "B".into(),
                    load_type: LoadType::Coal,
                    payment: 15,
                }],
            }],
            bot_segments: Vec::new(),
            all_segments: Vec::new(),
            load_availability: LoadRegistry::new(),
            dropped_loads: HashMap::new(),
            major_city_groups: Vec::new(),
            map: empty_map(),
            bot_adjacency: HashMap::new(),
            major_city_connected: {
                let mut m = HashMap::new();
                m.insert("B".to_string(), true);
                m
            },
            fingerprint: "0000000000000000".into(),
        }
    }

    #[test]
    fn delivery_feasible_when_carried_and_connected() {
        let snap = base_snapshot();
        assert!(validate_delivery(&snap, 42, 0).is_feasible());
    }

    #[test]
    fn delivery_rejects_unknown_card() {
        let snap = base_snapshot();
        let result = validate_delivery(&snap, 999, 0);
        assert_eq!(result.reason(), Some("card not in hand"));
    }

    #[test]
    fn delivery_rejects_uncarried_load() {
        let mut snap = base_snapshot();
        snap.carried_loads.clear();
        let result = validate_delivery(&snap, 42, 0);
        assert_eq!(result.reason(), Some("required load not carried"));
    }

    #[test]
    fn delivery_rejects_disconnected_destination() {
        let mut snap = base_snapshot();
        snap.major_city_connected.clear();
        let result = validate_delivery(&snap, 42, 0);
        assert_eq!(result.reason(), Some("destination city not a node in the bot's track graph"));
    }

    #[test]
    fn build_rejects_over_budget() {
        let snap = base_snapshot();
        let segments = vec![
            TrackSegment { a: Location::new(0, 0), b: Location::new(1, 0), cost: 15 },
            TrackSegment { a: Location::new(1, 0), b: Location::new(2, 0), cost: 10 },
        ];
        let result = validate_build(&snap, &segments, 0);
        assert_eq!(result.reason(), Some("exceeds per-turn build budget"));
    }

    #[test]
    fn upgrade_blocked_by_turn_build_cost() {
        let mut snap = base_snapshot();
        snap.train_type = TrainType::FastFreight;
        snap.money = 50;
        let result = validate_upgrade(&snap, TrainType::HeavyFreight, 16);
        assert_eq!(result.reason(), Some("turn budget: crossgrade spend limit exceeded"));
    }

    #[test]
    fn upgrade_ok_within_limits() {
        let mut snap = base_snapshot();
        snap.train_type = TrainType::Freight;
        snap.money = 50;
        assert!(validate_upgrade(&snap, TrainType::FastFreight, 0).is_feasible());
    }
}
