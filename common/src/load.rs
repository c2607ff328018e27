//! Load types and the global load registry.
//!
//! Resolves the open question noted in spec §9: the authoritative
//! `LoadType` contract is the enum form with the wider member set; any
//! string-union variant seen elsewhere is legacy and not carried forward.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum LoadType {
    Coal,
    Steel,
    Oil,
    Grain,
    Livestock,
    Wine,
    Automobiles,
    Chemicals,
    Lumber,
    Fish,
    Cork,
    Tourists,
    Beer,
    Textiles,
    Machinery,
    Wool,
    Paper,
    Fruit,
}

impl LoadType {
    pub fn all() -> &'static [LoadType] {
        use LoadType::*;
        &[
            Coal,
            Steel,
            Oil,
            Grain,
            Livestock,
            Wine,
            Automobiles,
            Chemicals,
            Lumber,
            Fish,
            Cork,
            Tourists,
            Beer,
            Textiles,
            Machinery,
            Wool,
            Paper,
            Fruit,
        ]
    }
}

impl TryFrom<&str> for LoadType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        use LoadType::*;
        Ok(match value {
            "Coal" => Coal,
            "Steel" => Steel,
            "Oil" => Oil,
            "Grain" => Grain,
            "Livestock" => Livestock,
            "Wine" => Wine,
            "Automobiles" | "Cars" => Automobiles,
            "Chemicals" => Chemicals,
            "Lumber" | "Wood" => Lumber,
            "Fish" => Fish,
            "Cork" => Cork,
            "Tourists" => Tourists,
            "Beer" => Beer,
            "Textiles" => Textiles,
            "Machinery" => Machinery,
            "Wool" => Wool,
            "Paper" => Paper,
            "Fruit" => Fruit,
            other => return Err(format!("unrecognized load type {other:?}")),
        })
    }
}

/// Global state of one load type: how many tokens exist, how many are
/// currently available to be picked up, and which cities produce it.
///
/// Invariant: `0 <= available <= total`; across a game, tokens on all trains
/// plus `available` equals `total` (spec §8 property 3).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoadState {
    pub total: u32,
    pub available: u32,
    pub producing_cities: Vec<String>,
}

pub type LoadRegistry = HashMap<LoadType, LoadState>;

/// A city's bucket of loads previously picked up and then dropped (e.g. by
/// a disbanded plan), available for pickup without being drawn from the
/// global pool.
pub type DroppedLoads = HashMap<(String, LoadType), u32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_accepts_canonical_and_legacy_names() {
        assert_eq!(LoadType::try_from("Coal").unwrap(), LoadType::Coal);
        assert_eq!(LoadType::try_from("Cars").unwrap(), LoadType::Automobiles);
        assert_eq!(LoadType::try_from("Wood").unwrap(), LoadType::Lumber);
        assert!(LoadType::try_from("Bananas").is_err());
    }

    #[test]
    fn all_returns_every_variant_exactly_once() {
        let all = LoadType::all();
        assert_eq!(all.len(), 18);
        let mut sorted = all.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), all.len());
    }

    #[test]
    fn available_never_exceeds_total_as_tokens_move_onto_trains() {
        let mut state = LoadState {
            total: 8,
            available: 8,
            producing_cities: vec!["TestCity".into()],
        };

        let carried_by_players = 3;
        state.available = state.available.saturating_sub(carried_by_players);

        assert_eq!(state.available, 5);
        assert!(state.available <= state.total);
        assert_eq!(state.available + carried_by_players, state.total);
    }
}
