//! Demand cards.

use serde::{Deserialize, Serialize};

use crate::load::LoadType;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Demand {
    pub destination_city: String,
    pub load_type: LoadType,
    pub payment: u32,
}

/// A hand card. Always lists exactly three demands (spec §3, §6).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DemandCard {
    pub id: u32,
    pub demands: Vec<Demand>,
}

impl DemandCard {
    pub fn demand(&self, index: usize) -> Option<&Demand> {
        self.demands.get(index)
    }
}
