//! Skill weight table and archetype multipliers (spec §6, normative).

use common::player::{Archetype, Skill};

/// One weight per scoring dimension, indexed by field name for readability
/// at call sites (`weights.immediate`, not `weights.0`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DimensionWeights {
    pub immediate_income: f64,
    pub income_per_milepost: f64,
    pub multi_delivery: f64,
    pub net_expansion: f64,
    pub victory_progress: f64,
    pub blocking: f64,
    pub risk: f64,
    pub scarcity: f64,
    pub upgrade_roi: f64,
    pub backbone_alignment: f64,
    pub load_combination: f64,
    pub major_city_proximity: f64,
}

/// Base weights per skill level — the table in spec §6. `upgradeRoi`,
/// `backboneAlignment`, `loadCombinationScore` and `majorCityProximity` are
/// archetype-specific dimensions with no base-skill weight of their own
/// (base 1.0, scaled entirely by the archetype multiplier).
pub fn skill_weights(skill: Skill) -> DimensionWeights {
    match skill {
        Skill::Easy => DimensionWeights {
            immediate_income: 0.8,
            income_per_milepost: 0.2,
            multi_delivery: 0.0,
            net_expansion: 0.0,
            victory_progress: 0.0,
            blocking: 0.0,
            risk: 0.0,
            scarcity: 0.0,
            upgrade_roi: 1.0,
            backbone_alignment: 1.0,
            load_combination: 1.0,
            major_city_proximity: 1.0,
        },
        Skill::Medium => DimensionWeights {
            immediate_income: 0.5,
            income_per_milepost: 0.7,
            multi_delivery: 0.3,
            net_expansion: 0.5,
            victory_progress: 0.3,
            blocking: 0.0,
            risk: 0.3,
            scarcity: 0.0,
            upgrade_roi: 1.0,
            backbone_alignment: 1.0,
            load_combination: 1.0,
            major_city_proximity: 1.0,
        },
        Skill::Hard => DimensionWeights {
            immediate_income: 0.5,
            income_per_milepost: 0.7,
            multi_delivery: 0.7,
            net_expansion: 0.7,
            victory_progress: 0.7,
            blocking: 0.5,
            risk: 0.5,
            scarcity: 0.5,
            upgrade_roi: 1.0,
            backbone_alignment: 1.0,
            load_combination: 1.0,
            major_city_proximity: 1.0,
        },
    }
}

/// Planning horizon in mileposts considered by the Pathfinder's build
/// search for a given skill (`horizon` column, spec §6).
pub fn skill_horizon(skill: Skill) -> usize {
    match skill {
        Skill::Easy => 1,
        Skill::Medium => 3,
        Skill::Hard => 5,
    }
}

/// Probability of returning a uniformly random feasible option instead of
/// the scored top pick (`pRand` column).
pub fn p_random_choice(skill: Skill) -> f64 {
    match skill {
        Skill::Easy => 0.20,
        Skill::Medium => 0.05,
        Skill::Hard => 0.0,
    }
}

/// Probability of dropping the top-scoring option and taking the next one
/// instead (`pMiss` column).
pub fn p_missed_option(skill: Skill) -> f64 {
    match skill {
        Skill::Easy => 0.30,
        Skill::Medium => 0.10,
        Skill::Hard => 0.0,
    }
}

/// Per-archetype multipliers over the base skill weights, along the same
/// dimensions plus the four archetype-specific ones. The exact matrices are
/// binding per spec §6 but not enumerated there; this resolves the open
/// question with values grounded in the archetype's narrative description:
/// a backbone builder values expansion and major-city proximity; a freight
/// optimizer values income-per-milepost and load combination; a trunk
/// sprinter values immediate income and multi-delivery; a continental
/// connector values net-expansion and upgrade ROI; an opportunist is flat
/// across the board (see DESIGN.md).
pub fn archetype_multipliers(archetype: Archetype) -> DimensionWeights {
    match archetype {
        Archetype::BackboneBuilder => DimensionWeights {
            immediate_income: 0.8,
            income_per_milepost: 1.0,
            multi_delivery: 0.8,
            net_expansion: 1.5,
            victory_progress: 1.0,
            blocking: 1.0,
            risk: 0.8,
            scarcity: 0.8,
            upgrade_roi: 0.8,
            backbone_alignment: 1.6,
            load_combination: 0.8,
            major_city_proximity: 1.4,
        },
        Archetype::FreightOptimizer => DimensionWeights {
            immediate_income: 1.0,
            income_per_milepost: 1.5,
            multi_delivery: 1.2,
            net_expansion: 0.8,
            victory_progress: 1.0,
            blocking: 0.7,
            risk: 0.9,
            scarcity: 1.1,
            upgrade_roi: 1.3,
            backbone_alignment: 0.8,
            load_combination: 1.5,
            major_city_proximity: 0.9,
        },
        Archetype::TrunkSprinter => DimensionWeights {
            immediate_income: 1.5,
            income_per_milepost: 1.1,
            multi_delivery: 1.4,
            net_expansion: 0.7,
            victory_progress: 0.9,
            blocking: 0.6,
            risk: 1.1,
            scarcity: 0.9,
            upgrade_roi: 1.0,
            backbone_alignment: 0.7,
            load_combination: 1.2,
            major_city_proximity: 0.8,
        },
        Archetype::ContinentalConnector => DimensionWeights {
            immediate_income: 0.7,
            income_per_milepost: 0.9,
            multi_delivery: 0.8,
            net_expansion: 1.6,
            victory_progress: 1.2,
            blocking: 1.1,
            risk: 0.7,
            scarcity: 0.8,
            upgrade_roi: 1.4,
            backbone_alignment: 1.2,
            load_combination: 0.9,
            major_city_proximity: 1.5,
        },
        Archetype::Opportunist => DimensionWeights {
            immediate_income: 1.0,
            income_per_milepost: 1.0,
            multi_delivery: 1.0,
            net_expansion: 1.0,
            victory_progress: 1.0,
            blocking: 1.0,
            risk: 1.0,
            scarcity: 1.0,
            upgrade_roi: 1.0,
            backbone_alignment: 1.0,
            load_combination: 1.0,
            major_city_proximity: 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_has_zero_noise_and_easy_has_the_most() {
        assert_eq!(p_random_choice(Skill::Hard), 0.0);
        assert_eq!(p_missed_option(Skill::Hard), 0.0);
        assert!(p_random_choice(Skill::Easy) > p_random_choice(Skill::Medium));
        assert!(p_missed_option(Skill::Easy) > p_missed_option(Skill::Medium));
    }

    #[test]
    fn skill_table_matches_spec() {
        let hard = skill_weights(Skill::Hard);
        assert_eq!(hard.blocking, 0.5);
        assert_eq!(hard.scarcity, 0.5);
        let easy = skill_weights(Skill::Easy);
        assert_eq!(easy.multi_delivery, 0.0);
        assert_eq!(easy.immediate_income, 0.8);
    }

    #[test]
    fn opportunist_multiplier_is_flat() {
        let m = archetype_multipliers(Archetype::Opportunist);
        assert_eq!(m.immediate_income, 1.0);
        assert_eq!(m.major_city_proximity, 1.0);
    }
}
