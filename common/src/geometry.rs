//! Hex-grid coordinates.
//!
//! Offset-coordinate neighbor rules per spec §4.1: the six neighbor offsets
//! differ between even and odd rows.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    const EVEN_ROW_OFFSETS: [(i32, i32); 6] =
        [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)];

    const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

    /// Up to six hex neighbors, independent of whether they exist on the map.
    pub fn neighbors(self) -> [Location; 6] {
        let offsets = if self.row.rem_euclid(2) == 0 {
            Self::EVEN_ROW_OFFSETS
        } else {
            Self::ODD_ROW_OFFSETS
        };
        offsets.map(|(dr, dc)| Location::new(self.row + dr, self.col + dc))
    }

    pub fn is_adjacent(self, other: Location) -> bool {
        self.neighbors().contains(&other)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_relation_is_symmetric() {
        for row in -3..3 {
            for col in -3..3 {
                let loc = Location::new(row, col);
                for n in loc.neighbors() {
                    assert!(
                        n.neighbors().contains(&loc),
                        "{:?} has neighbor {:?} but not vice versa",
                        loc,
                        n
                    );
                }
            }
        }
    }

    #[test]
    fn even_row_offsets_match_spec() {
        let loc = Location::new(4, 4);
        let expected: Vec<Location> = [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)]
            .iter()
            .map(|(dr, dc)| Location::new(4 + dr, 4 + dc))
            .collect();
        assert_eq!(loc.neighbors().to_vec(), expected);
    }

    #[test]
    fn odd_row_offsets_match_spec() {
        let loc = Location::new(5, 4);
        let expected: Vec<Location> = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)]
            .iter()
            .map(|(dr, dc)| Location::new(5 + dr, 4 + dc))
            .collect();
        assert_eq!(loc.neighbors().to_vec(), expected);
    }
}
