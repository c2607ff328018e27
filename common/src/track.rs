//! Track segments and a player's built-track state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::geometry::Location;
use crate::ids::PlayerId;
use crate::map::MapTopology;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TrackSegment {
    pub a: Location,
    pub b: Location,
    pub cost: u32,
}

impl TrackSegment {
    /// Builds a segment between two mileposts, validating hex-adjacency,
    /// that the destination isn't water, and that the pair doesn't sit
    /// entirely inside the same major-city group (spec §4.3 build rules).
    pub fn new(map: &MapTopology, a: Location, b: Location) -> GameResult<Self> {
        if !a.is_adjacent(b) {
            return Err(GameError::SegmentNotAdjacent { a, b });
        }
        let terrain_b = map
            .terrain(b)
            .ok_or(GameError::NoSuchLocation(b))?;
        if terrain_b.is_water() {
            return Err(GameError::SegmentIntoWater(b));
        }
        if let (Some(city_a), Some(city_b)) = (map.major_city_lookup(a), map.major_city_lookup(b)) {
            if city_a == city_b {
                return Err(GameError::SegmentWithinMajorCity {
                    a,
                    b,
                    city: city_a.to_string(),
                });
            }
        }
        let cost = terrain_b.cost().ok_or(GameError::SegmentIntoWater(b))?;
        Ok(Self { a, b, cost })
    }

    /// Whether this segment connects to `loc` on either end.
    pub fn touches(&self, loc: Location) -> bool {
        self.a == loc || self.b == loc
    }

    pub fn other_end(&self, loc: Location) -> Option<Location> {
        if self.a == loc {
            Some(self.b)
        } else if self.b == loc {
            Some(self.a)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PlayerTrackState {
    pub player_id: Option<PlayerId>,
    pub segments: Vec<TrackSegment>,
    pub total_cost: u32,
    /// Spend so far this turn, reset at the start of each turn (spec §6,
    /// `PER_TURN_BUILD_BUDGET`).
    pub turn_build_cost: u32,
}

impl PlayerTrackState {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id: Some(player_id),
            segments: Vec::new(),
            total_cost: 0,
            turn_build_cost: 0,
        }
    }

    /// All locations reachable from `from` using only segments in this
    /// state, i.e. the bot's owned track-network adjacency graph.
    pub fn adjacency(&self, from: Location) -> Vec<Location> {
        self.segments
            .iter()
            .filter_map(|seg| seg.other_end(from))
            .collect()
    }

    pub fn connects(&self, from: Location, to: Location) -> bool {
        self.adjacency(from).contains(&to)
    }

    /// All locations that appear in at least one owned segment.
    pub fn nodes(&self) -> HashSet<Location> {
        let mut set = HashSet::new();
        for seg in &self.segments {
            set.insert(seg.a);
            set.insert(seg.b);
        }
        set
    }

    pub fn append_segments(&mut self, new_segments: Vec<TrackSegment>) {
        for seg in new_segments {
            self.turn_build_cost += seg.cost;
            self.total_cost += seg.cost;
            self.segments.push(seg);
        }
    }

    pub fn reset_turn_build_cost(&mut self) {
        self.turn_build_cost = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> MapTopology {
        let raw = r#"[
            {"Id":1,"GridX":0,"GridY":0,"Type":"Clear"},
            {"Id":2,"GridX":1,"GridY":0,"Type":"Clear"},
            {"Id":3,"GridX":0,"GridY":1,"Type":"Water"},
            {"Id":4,"GridX":3,"GridY":3,"Type":"MajorCity","Name":"Metropolis"},
            {"Id":5,"GridX":4,"GridY":3,"Type":"MajorCity","Name":"Metropolis"}
        ]"#;
        MapTopology::load_from_json(raw).unwrap()
    }

    #[test]
    fn rejects_non_adjacent_segment() {
        let map = map();
        let err = TrackSegment::new(&map, Location::new(0, 0), Location::new(3, 3)).unwrap_err();
        assert!(matches!(err, GameError::SegmentNotAdjacent { .. }));
    }

    #[test]
    fn rejects_segment_into_water() {
        let map = map();
        let a = Location::new(0, 0);
        let b = Location::new(0, 1);
        assert!(a.is_adjacent(b));
        let err = TrackSegment::new(&map, a, b).unwrap_err();
        assert!(matches!(err, GameError::SegmentIntoWater(_)));
    }

    #[test]
    fn rejects_segment_within_same_major_city() {
        let map = map();
        let a = Location::new(3, 3);
        let b = Location::new(3, 4);
        assert!(a.is_adjacent(b));
        let err = TrackSegment::new(&map, a, b).unwrap_err();
        assert!(matches!(err, GameError::SegmentWithinMajorCity { .. }));
    }

    #[test]
    fn append_segments_accumulates_cost() {
        let mut state = PlayerTrackState::new(PlayerId::new());
        state.append_segments(vec![TrackSegment {
            a: Location::new(0, 0),
            b: Location::new(1, 0),
            cost: 1,
        }]);
        assert_eq!(state.total_cost, 1);
        assert_eq!(state.turn_build_cost, 1);
        state.reset_turn_build_cost();
        assert_eq!(state.turn_build_cost, 0);
        assert_eq!(state.total_cost, 1);
    }
}
