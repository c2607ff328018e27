//! Re-validates a plan's options in sequence against a mentally-advanced
//! snapshot (spec §4.6), truncating on the first failure.

use common::load::LoadType;
use common::train::TrainType;

use crate::feasibility::{self, Feasibility};
use crate::planner::{FeasibleOption, TurnPlan};
use crate::snapshot::WorldSnapshot;

/// Local, mutable shadow of the fields a plan can change mid-turn. Applied
/// cumulatively as each option in the plan is accepted, so later options in
/// the same plan are validated against the effect of earlier ones.
#[derive(Clone)]
struct ShadowState {
    money: u32,
    carried_loads: Vec<LoadType>,
    turn_build_cost: u32,
    train_type: TrainType,
}

impl ShadowState {
    fn from_snapshot(snap: &WorldSnapshot) -> Self {
        Self {
            money: snap.money,
            carried_loads: snap.carried_loads.clone(),
            turn_build_cost: 0,
            train_type: snap.train_type,
        }
    }

    fn apply(&mut self, option: &FeasibleOption) {
        match option {
            FeasibleOption::Pass => {}
            FeasibleOption::DeliverLoad { .. } => {
                self.carried_loads.pop();
            }
            FeasibleOption::PickupAndDeliver { load_type, .. } => {
                self.carried_loads.push(*load_type);
                self.carried_loads.retain(|l| l != load_type);
            }
            FeasibleOption::BuildTrack { segments } | FeasibleOption::BuildTowardMajorCity { segments, .. } => {
                let cost: u32 = segments.iter().map(|s| s.cost).sum();
                self.money = self.money.saturating_sub(cost);
                self.turn_build_cost += cost;
            }
            FeasibleOption::UpgradeTrain { target } => {
                if let Some((_, cost)) = self.train_type.change_to(*target) {
                    self.money = self.money.saturating_sub(cost);
                }
                self.train_type = *target;
            }
        }
    }
}

fn feasibility_against_shadow(snap: &WorldSnapshot, shadow: &ShadowState, option: &FeasibleOption) -> Feasibility {
    match option {
        FeasibleOption::Pass => Feasibility::Feasible,
        FeasibleOption::DeliverLoad { card_id, demand_index, .. } => {
            let mut shadow_snap = snap.clone();
            shadow_snap.carried_loads = shadow.carried_loads.clone();
            feasibility::validate_delivery(&shadow_snap, *card_id, *demand_index)
        }
        FeasibleOption::PickupAndDeliver { load_type, pickup_city, .. } => {
            let mut shadow_snap = snap.clone();
            shadow_snap.carried_loads = shadow.carried_loads.clone();
            feasibility::validate_pickup(&shadow_snap, *load_type, pickup_city)
        }
        FeasibleOption::BuildTrack { segments } | FeasibleOption::BuildTowardMajorCity { segments, .. } => {
            let mut shadow_snap = snap.clone();
            shadow_snap.money = shadow.money;
            feasibility::validate_build(&shadow_snap, segments, shadow.turn_build_cost)
        }
        FeasibleOption::UpgradeTrain { target } => {
            let mut shadow_snap = snap.clone();
            shadow_snap.money = shadow.money;
            shadow_snap.train_type = shadow.train_type;
            shadow_snap.carried_loads = shadow.carried_loads.clone();
            feasibility::validate_upgrade(&shadow_snap, *target, shadow.turn_build_cost)
        }
    }
}

/// Re-runs feasibility against each option in plan order; the first failure
/// truncates the plan. If nothing survives, the plan becomes a single Pass.
pub fn validate_plan(snap: &WorldSnapshot, plan: TurnPlan) -> (TurnPlan, Option<String>) {
    let mut shadow = ShadowState::from_snapshot(snap);
    let mut surviving = Vec::new();
    let mut truncation_reason = None;

    for option in plan.options {
        match feasibility_against_shadow(snap, &shadow, &option) {
            Feasibility::Feasible => {
                shadow.apply(&option);
                surviving.push(option);
            }
            Feasibility::Infeasible(reason) => {
                truncation_reason = Some(reason);
                break;
            }
        }
    }

    if surviving.is_empty() {
        surviving.push(FeasibleOption::Pass);
    }

    let validated = TurnPlan {
        options: surviving,
        expected_cash_change: plan.expected_cash_change,
        rationale: plan.rationale,
    };
    (validated, truncation_reason)
}
