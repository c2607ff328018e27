//! Parses the demand deck JSON: `[{id, demands:[{city, resource, payment}×3]}, ...]`.

use serde::Deserialize;

use crate::demand::{Demand, DemandCard};
use crate::error::{GameError, GameResult};
use crate::load::LoadType;

#[derive(Debug, Deserialize)]
struct DemandRecord {
    city: String,
    resource: String,
    payment: u32,
}

#[derive(Debug, Deserialize)]
struct DemandCardRecord {
    id: u32,
    demands: Vec<DemandRecord>,
}

pub fn demand_deck_from_json(raw: &str) -> GameResult<Vec<DemandCard>> {
    let records: Vec<DemandCardRecord> = serde_json::from_str(raw)
        .map_err(|e| GameError::Config(format!("demand deck parse error: {e}")))?;

    records
        .into_iter()
        .map(|rec| {
            let demands = rec
                .demands
                .into_iter()
                .map(|d| {
                    let load_type = LoadType::try_from(d.resource.as_str())
                        .map_err(|e| GameError::Config(format!("demand deck: {e}")))?;
                    Ok(Demand {
                        destination_city: d.city,
                        load_type,
                        payment: d.payment,
                    })
                })
                .collect::<GameResult<Vec<Demand>>>()?;
            Ok(DemandCard {
                id: rec.id,
                demands,
            })
        })
        .collect()
}
