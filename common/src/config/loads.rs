//! Parses `load_cities.json`: `{LoadConfiguration:[{<LoadType>:[cities], count}, ...]}`.
//!
//! Each entry names exactly one load type as a dynamic JSON key alongside
//! its producing cities and a token count, so the load type is captured via
//! `#[serde(flatten)]` into a small map rather than a fixed field name.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{GameError, GameResult};
use crate::load::{LoadRegistry, LoadState, LoadType};

#[derive(Debug, Deserialize)]
struct RawLoadEntry {
    count: u32,
    #[serde(flatten)]
    cities_by_load: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct LoadConfigFile {
    #[serde(rename = "LoadConfiguration")]
    load_configuration: Vec<RawLoadEntry>,
}

pub fn load_registry_from_json(raw: &str) -> GameResult<LoadRegistry> {
    let file: LoadConfigFile = serde_json::from_str(raw)
        .map_err(|e| GameError::Config(format!("load_cities.json parse error: {e}")))?;

    let mut registry = LoadRegistry::new();
    for entry in file.load_configuration {
        let (key, cities) = entry
            .cities_by_load
            .into_iter()
            .next()
            .ok_or_else(|| GameError::Config("load_cities.json entry names no load type".into()))?;
        let load_type = LoadType::try_from(key.as_str())
            .map_err(|e| GameError::Config(format!("load_cities.json: {e}")))?;
        registry.insert(
            load_type,
            LoadState {
                total: entry.count,
                available: entry.count,
                producing_cities: cities,
            },
        );
    }
    Ok(registry)
}
