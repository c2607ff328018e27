//! Candidate enumeration, scoring, noise, and plan selection (spec §4.5).

use rand::Rng;

use common::geometry::Location;
use common::load::LoadType;
use common::player::{Archetype, BotConfig, Skill};
use common::track::TrackSegment;
use common::train::TrainType;

use crate::feasibility::{self, Feasibility};
use crate::pathfinder::{compute_build_segments, shortest_move_path};
use crate::snapshot::WorldSnapshot;
use crate::weights::{archetype_multipliers, p_missed_option, p_random_choice, skill_horizon, skill_weights};

/// A tagged action, mirroring the FeasibleOption union in spec §3.
#[derive(Clone, Debug, PartialEq)]
pub enum FeasibleOption {
    Pass,
    DeliverLoad {
        card_id: u32,
        demand_index: usize,
        move_path: Vec<Location>,
    },
    PickupAndDeliver {
        load_type: LoadType,
        pickup_city: String,
        pickup_path: Vec<Location>,
        card_id: u32,
        demand_index: usize,
        delivery_path: Vec<Location>,
    },
    BuildTrack {
        segments: Vec<TrackSegment>,
    },
    BuildTowardMajorCity {
        city: String,
        segments: Vec<TrackSegment>,
    },
    UpgradeTrain {
        target: TrainType,
    },
}

#[derive(Clone, Debug)]
pub struct ScoredOption {
    pub option: FeasibleOption,
    pub score: f64,
    pub feasibility: Feasibility,
}

#[derive(Clone, Debug)]
pub struct RejectedOption {
    pub option: FeasibleOption,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct TurnPlan {
    pub options: Vec<FeasibleOption>,
    pub expected_cash_change: i64,
    pub rationale: String,
}

pub struct Planner<R> {
    rng: R,
}

impl<R: Rng> Planner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Enumerates candidates, validates, scores, applies behavioral noise,
    /// and builds the final plan.
    pub fn plan(&mut self, snap: &WorldSnapshot, config: BotConfig) -> (TurnPlan, Vec<ScoredOption>, Vec<RejectedOption>) {
        let candidates = enumerate_candidates(snap, config.skill);

        let mut feasible = Vec::new();
        let mut rejected = Vec::new();
        for option in candidates {
            match feasibility_of(snap, &option) {
                Feasibility::Feasible => {
                    let score = score_option(snap, &option, config);
                    feasible.push(ScoredOption {
                        option,
                        score,
                        feasibility: Feasibility::Feasible,
                    });
                }
                Feasibility::Infeasible(reason) => {
                    rejected.push(RejectedOption { option, reason });
                }
            }
        }

        feasible.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let selected = self.select_with_noise(&feasible, config.skill);

        let plan = match selected {
            None => TurnPlan {
                options: vec![FeasibleOption::Pass],
                expected_cash_change: 0,
                rationale: "no feasible option; passing".to_string(),
            },
            Some(primary) => {
                let mut options = vec![primary.option.clone()];
                let mut expected_cash_change = expected_cash_of(&primary.option);
                let mut rationale = format!("selected top option (score {:.2})", primary.score);

                if let Some(secondary) = self.pick_secondary(snap, &feasible, &primary.option) {
                    expected_cash_change += expected_cash_of(&secondary.option);
                    rationale.push_str(&format!("; appended secondary option (score {:.2})", secondary.score));
                    options.push(secondary.option.clone());
                }

                TurnPlan {
                    options,
                    expected_cash_change,
                    rationale,
                }
            }
        };

        (plan, feasible, rejected)
    }

    fn select_with_noise<'a>(&mut self, feasible: &'a [ScoredOption], skill: Skill) -> Option<&'a ScoredOption> {
        if feasible.is_empty() {
            return None;
        }
        if self.rng.gen::<f64>() < p_random_choice(skill) {
            let idx = self.rng.gen_range(0..feasible.len());
            return feasible.get(idx);
        }
        if feasible.len() > 1 && self.rng.gen::<f64>() < p_missed_option(skill) {
            return feasible.get(1);
        }
        feasible.first()
    }

    fn pick_secondary<'a>(
        &self,
        snap: &WorldSnapshot,
        feasible: &'a [ScoredOption],
        primary: &FeasibleOption,
    ) -> Option<&'a ScoredOption> {
        if snap.remaining_movement == 0 || snap.money == 0 {
            return None;
        }
        feasible
            .iter()
            .find(|o| &o.option != primary && is_compatible_secondary(primary, &o.option))
    }
}

fn is_compatible_secondary(primary: &FeasibleOption, candidate: &FeasibleOption) -> bool {
    match (primary, candidate) {
        (FeasibleOption::DeliverLoad { .. }, FeasibleOption::BuildTrack { .. }) => true,
        (FeasibleOption::DeliverLoad { .. }, FeasibleOption::BuildTowardMajorCity { .. }) => true,
        (FeasibleOption::BuildTrack { .. }, FeasibleOption::DeliverLoad { .. }) => true,
        _ => false,
    }
}

fn feasibility_of(snap: &WorldSnapshot, option: &FeasibleOption) -> Feasibility {
    match option {
        FeasibleOption::Pass => Feasibility::Feasible,
        FeasibleOption::DeliverLoad { card_id, demand_index, .. } => {
            feasibility::validate_delivery(snap, *card_id, *demand_index)
        }
        FeasibleOption::PickupAndDeliver { load_type, pickup_city, .. } => {
            feasibility::validate_pickup(snap, *load_type, pickup_city)
        }
        FeasibleOption::BuildTrack { segments } | FeasibleOption::BuildTowardMajorCity { segments, .. } => {
            feasibility::validate_build(snap, segments, turn_build_cost(snap))
        }
        FeasibleOption::UpgradeTrain { target } => {
            feasibility::validate_upgrade(snap, *target, turn_build_cost(snap))
        }
    }
}

fn turn_build_cost(_snap: &WorldSnapshot) -> u32 {
    // The snapshot does not carry turnBuildCost directly (spec §3 scopes it
    // to PlayerTrackState); callers that need it thread it through
    // separately. Planning-time candidates are generated before any build
    // has happened this turn, so zero is the correct value here.
    0
}

fn enumerate_candidates(snap: &WorldSnapshot, skill: Skill) -> Vec<FeasibleOption> {
    let mut out = Vec::new();

    for card in &snap.hand {
        for (idx, demand) in card.demands.iter().enumerate() {
            if snap.carried_loads.contains(&demand.load_type) {
                let move_path = snap
                    .map
                    .locations_named(&demand.destination_city)
                    .iter()
                    .filter_map(|loc| shortest_move_path(snap, *loc, snap.remaining_movement))
                    .min_by_key(|p| p.len())
                    .unwrap_or_default();
                out.push(FeasibleOption::DeliverLoad {
                    card_id: card.id,
                    demand_index: idx,
                    move_path,
                });
            } else {
                let producing_cities: Vec<&String> = snap
                    .load_availability
                    .get(&demand.load_type)
                    .map(|s| s.producing_cities.iter().collect())
                    .unwrap_or_default();
                for city in producing_cities {
                    let pickup_path = snap
                        .map
                        .locations_named(city)
                        .iter()
                        .filter_map(|loc| shortest_move_path(snap, *loc, snap.remaining_movement))
                        .min_by_key(|p| p.len())
                        .unwrap_or_default();
                    out.push(FeasibleOption::PickupAndDeliver {
                        load_type: demand.load_type,
                        pickup_city: city.clone(),
                        pickup_path,
                        card_id: card.id,
                        demand_index: idx,
                        delivery_path: Vec::new(),
                    });
                }
            }
        }
    }

    let horizon = skill_horizon(skill);
    for group in &snap.major_city_groups {
        if snap.connects_to_city(&group.name) {
            continue;
        }
        let segments = compute_build_segments(snap, snap.position, 20, horizon.max(1) * 3);
        if !segments.is_empty() {
            out.push(FeasibleOption::BuildTowardMajorCity {
                city: group.name.clone(),
                segments,
            });
        }
    }

    if snap.money >= 5 {
        for target in [TrainType::FastFreight, TrainType::HeavyFreight, TrainType::Superfreight] {
            if snap.train_type.change_to(target).is_some() {
                out.push(FeasibleOption::UpgradeTrain { target });
            }
        }
    }

    out.push(FeasibleOption::Pass);
    out
}

fn score_option(snap: &WorldSnapshot, option: &FeasibleOption, config: BotConfig) -> f64 {
    let base = skill_weights(config.skill);
    let mult = archetype_multipliers(config.archetype);

    let dims = dimension_values(snap, option);

    base.immediate_income * mult.immediate_income * dims.immediate_income
        + base.income_per_milepost * mult.income_per_milepost * dims.income_per_milepost
        + base.multi_delivery * mult.multi_delivery * dims.multi_delivery
        + base.net_expansion * mult.net_expansion * dims.net_expansion
        + base.victory_progress * mult.victory_progress * dims.victory_progress
        + base.blocking * mult.blocking * dims.blocking
        + base.risk * mult.risk * dims.risk
        + base.scarcity * mult.scarcity * dims.scarcity
        + base.upgrade_roi * mult.upgrade_roi * dims.upgrade_roi
        + base.backbone_alignment * mult.backbone_alignment * dims.backbone_alignment
        + base.load_combination * mult.load_combination * dims.load_combination
        + base.major_city_proximity * mult.major_city_proximity * dims.major_city_proximity
}

/// Per-option values for each scoring dimension. Values are on comparable
/// scales (roughly 0..=1 for normalized dimensions, raw ECU for income
/// dimensions) so that the weight tables alone determine relative priority.
fn dimension_values(snap: &WorldSnapshot, option: &FeasibleOption) -> DimensionValuesRaw {
    let mut v = DimensionValuesRaw::default();
    match option {
        FeasibleOption::Pass => {}
        FeasibleOption::DeliverLoad { card_id, demand_index, move_path } => {
            if let Some(card) = snap.demand_card(*card_id) {
                if let Some(demand) = card.demand(*demand_index) {
                    v.immediate_income = demand.payment as f64;
                    let mileposts = move_path.len().max(1) as f64;
                    v.income_per_milepost = demand.payment as f64 / mileposts;
                    v.victory_progress = (snap.money + demand.payment) as f64 / common::conf::VICTORY_THRESHOLD as f64;
                }
            }
            v.multi_delivery = count_loads_matching_other_demands(snap, *card_id) as f64;
        }
        FeasibleOption::PickupAndDeliver { pickup_path, card_id, demand_index, .. } => {
            if let Some(card) = snap.demand_card(*card_id) {
                if let Some(demand) = card.demand(*demand_index) {
                    v.immediate_income = demand.payment as f64 * 0.9;
                    let mileposts = pickup_path.len().max(1) as f64;
                    v.income_per_milepost = demand.payment as f64 / mileposts;
                }
            }
            v.risk = 0.3;
            v.load_combination = 0.5;
        }
        FeasibleOption::BuildTrack { segments } | FeasibleOption::BuildTowardMajorCity { segments, .. } => {
            let cost: u32 = segments.iter().map(|s| s.cost).sum();
            v.net_expansion = segments.len() as f64;
            v.risk = cost as f64 / common::conf::PER_TURN_BUILD_BUDGET as f64;
            v.backbone_alignment = segments.len() as f64 * 0.2;
            if matches!(option, FeasibleOption::BuildTowardMajorCity { .. }) {
                v.major_city_proximity = 1.0 / (segments.len().max(1) as f64);
            }
        }
        FeasibleOption::UpgradeTrain { target } => {
            v.upgrade_roi = target.capacity() as f64;
        }
    }
    v
}

fn count_loads_matching_other_demands(snap: &WorldSnapshot, excluding_card: u32) -> usize {
    snap.hand
        .iter()
        .filter(|c| c.id != excluding_card)
        .flat_map(|c| c.demands.iter())
        .filter(|d| snap.carried_loads.contains(&d.load_type))
        .count()
}

#[derive(Default)]
struct DimensionValuesRaw {
    immediate_income: f64,
    income_per_milepost: f64,
    multi_delivery: f64,
    net_expansion: f64,
    victory_progress: f64,
    blocking: f64,
    risk: f64,
    scarcity: f64,
    upgrade_roi: f64,
    backbone_alignment: f64,
    load_combination: f64,
    major_city_proximity: f64,
}

fn expected_cash_of(option: &FeasibleOption) -> i64 {
    match option {
        FeasibleOption::Pass => 0,
        FeasibleOption::DeliverLoad { .. } | FeasibleOption::PickupAndDeliver { .. } => 0,
        FeasibleOption::BuildTrack { segments } | FeasibleOption::BuildTowardMajorCity { segments, .. } => {
            -(segments.iter().map(|s| s.cost).sum::<u32>() as i64)
        }
        FeasibleOption::UpgradeTrain { .. } => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::demand::{Demand, DemandCard};
    use common::game::GameStatus;
    use common::ids::{GameId, PlayerId};
    use common::load::LoadRegistry;
    use common::map::MapTopology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn map_with_connected_city() -> Arc<MapTopology> {
        let raw = r#"[
            {"Id":1,"GridX":0,"GridY":0,"Type":"Clear"},
            {"Id":2,"GridX":1,"GridY":0,"Type":"SmallCity","Name":"B"}
        ]"#;
        Arc::new(MapTopology::load_from_json(raw).unwrap())
    }

    fn s1_snapshot() -> WorldSnapshot {
        let map = map_with_connected_city();
        let mut connected = std::collections::HashMap::new();
        connected.insert("B".to_string(), true);
        let mut adjacency = std::collections::HashMap::new();
        adjacency.insert(Location::new(0, 0), vec![Location::new(0, 1)]);
        adjacency.insert(Location::new(0, 1), vec![Location::new(0, 0)]);

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
            bot_segments: vec![TrackSegment { a: Location::new(0, 0), b: Location::new(0, 1), cost: 3 }],
            all_segments: Vec::new(),
            load_availability: LoadRegistry::new(),
            dropped_loads: Default::default(),
            major_city_groups: Vec::new(),
            map,
            bot_adjacency: adjacency,
            major_city_connected: connected,
            fingerprint: "0".repeat(16),
        }
    }

    #[test]
    fn s1_delivery_is_top_scored_feasible_option() {
        let snap = s1_snapshot();
        let mut planner = Planner::new(StdRng::seed_from_u64(1));
        let config = BotConfig { skill: Skill::Hard, archetype: Archetype::Opportunist };
        let (plan, feasible, _rejected) = planner.plan(&snap, config);

        assert!(!feasible.is_empty());
        assert!(matches!(plan.options[0], FeasibleOption::DeliverLoad { card_id: 42, .. }));
    }

    #[test]
    fn no_feasible_options_yields_pass() {
        let mut snap = s1_snapshot();
        snap.hand.clear();
        snap.major_city_groups.clear();
        snap.money = 0;
        let mut planner = Planner::new(StdRng::seed_from_u64(2));
        let config = BotConfig { skill: Skill::Hard, archetype: Archetype::Opportunist };
        let (plan, _feasible, _rejected) = planner.plan(&snap, config);
        assert_eq!(plan.options, vec![FeasibleOption::Pass]);
    }
}
