//! The immutable hex-grid map: mileposts, terrain, and major-city groupings.
//!
//! Grounded on the teacher's `common::game::map::MapData`, which loads a
//! grid once and indexes it for O(1) lookups; generalized here to load from
//! the `gridPoints.json` configuration file named in spec §6 rather than a
//! procedurally generated map, since grid content is explicitly a
//! non-goal's external collaborator.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{GameError, GameResult};
use crate::geometry::Location;
use crate::terrain::Terrain;

#[derive(Debug, Deserialize)]
struct GridPointRecord {
    #[serde(rename = "Id")]
    #[allow(dead_code)]
    id: u32,
    #[serde(rename = "GridX")]
    grid_x: i32,
    #[serde(rename = "GridY")]
    grid_y: i32,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Ocean")]
    #[allow(dead_code)]
    ocean: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct MapPoint {
    pub loc: Location,
    pub terrain: Terrain,
    pub name: Option<String>,
}

/// A named center plus zero or more outpost mileposts, treated as a single
/// connection target (spec §3, Glossary).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MajorCityGroup {
    pub name: String,
    pub center: Location,
    pub outposts: Vec<Location>,
}

impl MajorCityGroup {
    pub fn nodes(&self) -> impl Iterator<Item = Location> + '_ {
        std::iter::once(self.center).chain(self.outposts.iter().copied())
    }
}

pub struct MapTopology {
    points: HashMap<Location, MapPoint>,
    major_city_groups: Vec<MajorCityGroup>,
    major_city_by_loc: HashMap<Location, String>,
    name_to_locations: HashMap<String, Vec<Location>>,
}

impl MapTopology {
    pub fn load_from_json(raw: &str) -> GameResult<Self> {
        let records: Vec<GridPointRecord> = serde_json::from_str(raw)
            .map_err(|e| GameError::Config(format!("gridPoints.json parse error: {e}")))?;
        Self::from_records(records)
    }

    fn from_records(records: Vec<GridPointRecord>) -> GameResult<Self> {
        let mut points = HashMap::with_capacity(records.len());
        let mut name_to_locations: HashMap<String, Vec<Location>> = HashMap::new();

        for rec in &records {
            let loc = Location::new(rec.grid_y, rec.grid_x);
            let terrain = Terrain::try_from(rec.kind.as_str())
                .map_err(|e| GameError::Config(format!("gridPoints.json: {e}")))?;
            if let Some(name) = &rec.name {
                name_to_locations.entry(name.clone()).or_default().push(loc);
            }
            points.insert(
                loc,
                MapPoint {
                    loc,
                    terrain,
                    name: rec.name.clone(),
                },
            );
        }

        // Major-city groups: every point named and typed MajorCity shares a
        // group keyed by name. The lowest-Id point in a group is its center;
        // the rest are outposts. The input format does not distinguish
        // center from outpost explicitly, so this is the resolved
        // interpretation (see DESIGN.md).
        let mut by_name: HashMap<String, Vec<&GridPointRecord>> = HashMap::new();
        for rec in &records {
            if rec.kind == "MajorCity" {
                if let Some(name) = &rec.name {
                    by_name.entry(name.clone()).or_default().push(rec);
                }
            }
        }

        let mut major_city_groups = Vec::new();
        let mut major_city_by_loc = HashMap::new();
        for (name, mut recs) in by_name {
            recs.sort_by_key(|r| r.id);
            let center = Location::new(recs[0].grid_y, recs[0].grid_x);
            let outposts: Vec<Location> = recs[1..]
                .iter()
                .map(|r| Location::new(r.grid_y, r.grid_x))
                .collect();
            for loc in std::iter::once(center).chain(outposts.iter().copied()) {
                major_city_by_loc.insert(loc, name.clone());
            }
            major_city_groups.push(MajorCityGroup {
                name,
                center,
                outposts,
            });
        }

        Ok(Self {
            points,
            major_city_groups,
            major_city_by_loc,
            name_to_locations,
        })
    }

    pub fn terrain(&self, loc: Location) -> Option<Terrain> {
        self.points.get(&loc).map(|p| p.terrain)
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.points.contains_key(&loc)
    }

    /// Up to six neighbors that actually exist on the map.
    pub fn neighbors(&self, loc: Location) -> Vec<Location> {
        loc.neighbors()
            .into_iter()
            .filter(|n| self.points.contains_key(n))
            .collect()
    }

    pub fn terrain_cost(terrain: Terrain) -> Option<u32> {
        terrain.cost()
    }

    pub fn major_city_groups(&self) -> &[MajorCityGroup] {
        &self.major_city_groups
    }

    pub fn major_city_lookup(&self, loc: Location) -> Option<&str> {
        self.major_city_by_loc.get(&loc).map(|s| s.as_str())
    }

    /// All mileposts whose `Name` matches `city`: a single-element vec for
    /// small/medium cities, center+outposts for a major city group.
    pub fn locations_named(&self, city: &str) -> &[Location] {
        self.name_to_locations
            .get(city)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Pixel coordinates for client rendering (spec §4.1). Flat-top hex
    /// offset layout: odd rows are shifted half a tile to the right.
    pub fn grid_to_pixel(&self, loc: Location) -> (f64, f64) {
        const TILE_W: f64 = 1.0;
        const TILE_H: f64 = 0.75;
        let x = loc.col as f64 * TILE_W + if loc.row.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
        let y = loc.row as f64 * TILE_H;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"[
            {"Id":1,"GridX":32,"GridY":29,"Type":"SmallCity","Name":"Paris"},
            {"Id":2,"GridX":33,"GridY":29,"Type":"Clear"},
            {"Id":3,"GridX":4,"GridY":5,"Type":"MajorCity","Name":"TestCity"},
            {"Id":4,"GridX":5,"GridY":5,"Type":"MajorCity","Name":"TestCity"},
            {"Id":5,"GridX":6,"GridY":6,"Type":"Water"}
        ]"#
    }

    #[test]
    fn loads_points_and_groups_major_cities_by_name() {
        let map = MapTopology::load_from_json(sample_json()).unwrap();
        assert_eq!(map.terrain(Location::new(29, 32)), Some(Terrain::SmallMediumCity));
        assert_eq!(map.terrain(Location::new(6, 6)), Some(Terrain::Water));

        let groups = map.major_city_groups();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.name, "TestCity");
        assert_eq!(group.center, Location::new(5, 4));
        assert_eq!(group.outposts, vec![Location::new(5, 5)]);
    }

    #[test]
    fn major_city_lookup_covers_center_and_outposts() {
        let map = MapTopology::load_from_json(sample_json()).unwrap();
        assert_eq!(map.major_city_lookup(Location::new(5, 4)), Some("TestCity"));
        assert_eq!(map.major_city_lookup(Location::new(5, 5)), Some("TestCity"));
        assert_eq!(map.major_city_lookup(Location::new(29, 32)), None);
    }
}
