//! Startup configuration loading: reads the read-only JSON files named in
//! spec §6 once and hands back `Arc`'d, immutable structures.

use std::sync::Arc;

use common::config::demand::demand_deck_from_json;
use common::config::loads::load_registry_from_json;
use common::demand::DemandCard;
use common::error::GameResult;
use common::load::LoadRegistry;
use common::map::MapTopology;

pub struct StartupConfig {
    pub map: Arc<MapTopology>,
    pub load_registry: LoadRegistry,
    pub demand_deck: Vec<DemandCard>,
}

impl StartupConfig {
    pub fn load(grid_points_json: &str, load_cities_json: &str, demand_deck_json: &str) -> GameResult<Self> {
        let map = Arc::new(MapTopology::load_from_json(grid_points_json)?);
        let load_registry = load_registry_from_json(load_cities_json)?;
        let demand_deck = demand_deck_from_json(demand_deck_json)?;
        Ok(Self {
            map,
            load_registry,
            demand_deck,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_three_configuration_files() {
        let grid = r#"[{"Id":1,"GridX":0,"GridY":0,"Type":"Clear"}]"#;
        let loads = r#"{"LoadConfiguration":[{"Coal":["TestCity"],"count":8}]}"#;
        let demand = r#"[{"id":1,"demands":[{"city":"TestCity","resource":"Coal","payment":15}]}]"#;

        let config = StartupConfig::load(grid, loads, demand).unwrap();
        assert!(config.map.contains(common::geometry::Location::new(0, 0)));
        assert_eq!(config.demand_deck.len(), 1);
    }
}
