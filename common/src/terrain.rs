//! Terrain and its build/movement costs.
//!
//! Grounded on the teacher's `common::game::map::terrain::Terrain`, which is
//! a plain `Copy` enum with a `Display` impl; generalized here to the wider
//! terrain set and per-spec costs (§4.1, §6) rather than the teacher's
//! two-variant {Water, Land}.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conf;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Terrain {
    Clear,
    Mountain,
    Alpine,
    SmallMediumCity,
    MajorCity,
    Water,
}

impl Terrain {
    /// The cost to build onto, or move across, this terrain. `None` means
    /// impassable (water).
    pub fn cost(self) -> Option<u32> {
        match self {
            Terrain::Clear => Some(conf::TERRAIN_COST_CLEAR),
            Terrain::Mountain => Some(conf::TERRAIN_COST_MOUNTAIN),
            Terrain::Alpine => Some(conf::TERRAIN_COST_ALPINE),
            Terrain::SmallMediumCity => Some(conf::TERRAIN_COST_SMALL_MEDIUM_CITY),
            Terrain::MajorCity => Some(conf::TERRAIN_COST_MAJOR_CITY),
            Terrain::Water => None,
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, Terrain::Water)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Terrain::Clear => "Clear",
            Terrain::Mountain => "Mountain",
            Terrain::Alpine => "Alpine",
            Terrain::SmallMediumCity => "SmallMediumCity",
            Terrain::MajorCity => "MajorCity",
            Terrain::Water => "Water",
        };
        write!(f, "{}", s)
    }
}

impl TryFrom<&str> for Terrain {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Clear" => Ok(Terrain::Clear),
            "Mountain" => Ok(Terrain::Mountain),
            "Alpine" => Ok(Terrain::Alpine),
            "SmallCity" | "MediumCity" | "SmallMediumCity" => Ok(Terrain::SmallMediumCity),
            "MajorCity" => Ok(Terrain::MajorCity),
            "Water" | "Ocean" => Ok(Terrain::Water),
            other => Err(format!("unrecognized terrain type {other:?}")),
        }
    }
}
