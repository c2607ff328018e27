//! Multi-source Dijkstra build search and BFS move search over the hex
//! grid (spec §4.4).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use common::geometry::Location;
use common::track::TrackSegment;

use crate::feasibility::is_buildable_edge;
use crate::snapshot::WorldSnapshot;

#[derive(Clone, Copy, Eq, PartialEq)]
struct HeapEntry {
    cost: u32,
    loc: Location,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: reverse the natural cost ordering.
        other.cost.cmp(&self.cost)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest contiguous build extension reachable from the bot's existing
/// track (or `virtual_start` if the bot owns no track yet), capped at
/// `budget` millions and `max_segments` edges.
///
/// Picks the reached node maximising new-segments-count, tie-broken by
/// lowest cost, then emits the prefix segments from the virtual start(s) to
/// that node that fit within budget.
pub fn compute_build_segments(
    snap: &WorldSnapshot,
    virtual_start: Option<Location>,
    budget: u32,
    max_segments: usize,
) -> Vec<TrackSegment> {
    let sources: Vec<Location> = if snap.bot_adjacency.is_empty() {
        virtual_start.into_iter().collect()
    } else {
        snap.bot_adjacency.keys().copied().collect()
    };
    if sources.is_empty() {
        return Vec::new();
    }

    let owned_edges: HashSet<(Location, Location)> = snap
        .bot_segments
        .iter()
        .flat_map(|s| [(s.a, s.b), (s.b, s.a)])
        .collect();

    let mut dist: HashMap<Location, u32> = HashMap::new();
    let mut prev: HashMap<Location, Location> = HashMap::new();
    let mut heap = BinaryHeap::new();

    for src in &sources {
        dist.insert(*src, 0);
        heap.push(HeapEntry { cost: 0, loc: *src });
    }

    let mut best_reached: Vec<Location> = Vec::new();

    while let Some(HeapEntry { cost, loc }) = heap.pop() {
        if cost > *dist.get(&loc).unwrap_or(&u32::MAX) {
            continue;
        }
        if !sources.contains(&loc) {
            best_reached.push(loc);
        }

        for neighbor in snap.map.neighbors(loc) {
            if !is_buildable_edge(snap, loc, neighbor) {
                continue;
            }
            let step_cost = if owned_edges.contains(&(loc, neighbor)) {
                0
            } else {
                match snap.map.terrain(neighbor) {
                    Some(t) => t.cost().unwrap_or(u32::MAX),
                    None => continue,
                }
            };
            if step_cost == u32::MAX {
                continue;
            }
            let next_cost = cost.saturating_add(step_cost);
            if next_cost > budget {
                continue;
            }
            if next_cost < *dist.get(&neighbor).unwrap_or(&u32::MAX) {
                dist.insert(neighbor, next_cost);
                prev.insert(neighbor, loc);
                heap.push(HeapEntry { cost: next_cost, loc: neighbor });
            }
        }
    }

    // Pick the reached node maximising the length of the path back to a
    // source, tie-broken by lowest cost.
    let mut best: Option<(usize, u32, Location)> = None;
    for loc in &best_reached {
        let cost = dist[loc];
        let mut path_len = 0;
        let mut cur = *loc;
        while let Some(&p) = prev.get(&cur) {
            path_len += 1;
            cur = p;
            if sources.contains(&cur) {
                break;
            }
        }
        let candidate = (path_len, cost, *loc);
        best = Some(match best {
            None => candidate,
            Some(b) => {
                if candidate.0 > b.0 || (candidate.0 == b.0 && candidate.1 < b.1) {
                    candidate
                } else {
                    b
                }
            }
        });
    }

    let Some((_, _, target)) = best else {
        return Vec::new();
    };

    // Walk back from target to its source, collecting segments.
    let mut chain = Vec::new();
    let mut cur = target;
    while let Some(&p) = prev.get(&cur) {
        let cost = snap.map.terrain(cur).and_then(|t| t.cost()).unwrap_or(0);
        if !owned_edges.contains(&(p, cur)) {
            chain.push(TrackSegment { a: p, b: cur, cost });
        }
        cur = p;
        if sources.contains(&cur) {
            break;
        }
    }
    chain.reverse();
    chain.truncate(max_segments);
    chain
}

/// Shortest path (in mileposts) from the current position to `target` over
/// the bot's owned adjacency graph, bounded by `remaining_movement`. Returns
/// `None` if no such path exists.
pub fn shortest_move_path(
    snap: &WorldSnapshot,
    target: Location,
    remaining_movement: u32,
) -> Option<Vec<Location>> {
    let start = snap.position?;
    if start == target {
        return Some(vec![start]);
    }

    let mut visited = HashSet::new();
    visited.insert(start);
    let mut queue = VecDeque::new();
    queue.push_back(vec![start]);

    while let Some(path) = queue.pop_front() {
        let last = *path.last().unwrap();
        if path.len() as u32 - 1 >= remaining_movement {
            continue;
        }
        for neighbor in snap.bot_adjacency.get(&last).cloned().unwrap_or_default() {
            if visited.contains(&neighbor) {
                continue;
            }
            let mut next = path.clone();
            next.push(neighbor);
            if neighbor == target {
                return Some(next);
            }
            visited.insert(neighbor);
            queue.push_back(next);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::demand::DemandCard;
    use common::game::GameStatus;
    use common::ids::{GameId, PlayerId};
    use common::load::LoadRegistry;
    use common::map::MapTopology;
    use common::train::TrainType;
    use std::sync::Arc;

    fn paris_map() -> Arc<MapTopology> {
        // A small chain of clear terrain starting at Paris (29,32), matching
        // scenario S5's literal coordinates.
        let raw = r#"[
            {"Id":1,"GridX":32,"GridY":29,"Type":"Clear","Name":"Paris"},
            {"Id":2,"GridX":33,"GridY":29,"Type":"Clear"},
            {"Id":3,"GridX":32,"GridY":28,"Type":"Clear"},
            {"Id":4,"GridX":31,"GridY":29,"Type":"Clear"},
            {"Id":5,"GridX":33,"GridY":28,"Type":"Clear"}
        ]"#;
        Arc::new(MapTopology::load_from_json(raw).unwrap())
    }

    fn base_snapshot(map: Arc<MapTopology>) -> WorldSnapshot {
        WorldSnapshot {
            game_id: GameId::new(),
            bot_player_id: PlayerId::new(),
            status: GameStatus::Active,
            money: 20,
            debt: 0,
            position: Some(Location::new(29, 32)),
            train_type: TrainType::Freight,
            remaining_movement: 9,
            carried_loads: Vec::new(),
            hand: Vec::<DemandCard>::new(),
            bot_segments: Vec::new(),
            all_segments: Vec::new(),
            load_availability: LoadRegistry::new(),
            dropped_loads: Default::default(),
            major_city_groups: Vec::new(),
            map,
            bot_adjacency: Default::default(),
            major_city_connected: Default::default(),
            fingerprint: "0".repeat(16),
        }
    }

    #[test]
    fn s5_build_within_budget_forms_contiguous_chain_from_paris() {
        let map = paris_map();
        let snap = base_snapshot(map);
        let start = Location::new(29, 32);
        let segments = compute_build_segments(&snap, Some(start), 20, 10);

        let total_cost: u32 = segments.iter().map(|s| s.cost).sum();
        assert!(total_cost <= 20);
        assert!(!segments.is_empty());

        let mut touched = HashSet::new();
        touched.insert(start);
        for seg in &segments {
            assert!(touched.contains(&seg.a) || touched.contains(&seg.b));
            touched.insert(seg.a);
            touched.insert(seg.b);
        }
    }

    #[test]
    fn move_search_respects_remaining_movement() {
        let map = paris_map();
        let mut snap = base_snapshot(map);
        snap.bot_adjacency.insert(Location::new(29, 32), vec![Location::new(29, 33)]);
        snap.bot_adjacency.insert(Location::new(29, 33), vec![Location::new(29, 32)]);

        let path = shortest_move_path(&snap, Location::new(29, 33), 1).unwrap();
        assert_eq!(path, vec![Location::new(29, 32), Location::new(29, 33)]);

        assert!(shortest_move_path(&snap, Location::new(29, 33), 0).is_none());
    }
}
