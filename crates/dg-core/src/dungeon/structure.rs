//! Floor structure templates
//!
//! A structure fixes the macro grid size, which macro cells take part in the
//! layout and, for the templated shapes, which cells are rooms and how they
//! are wired together.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::Direction;

/// Named floor topology
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Structure {
    /// 6×4 macro grid, rooms chosen at random
    #[default]
    Standard,
    /// 4×2 macro grid, rooms chosen at random
    Small,
    /// 5×4 macro grid, rooms chosen at random
    Medium,
    /// Five rooms in a row, chained west to east
    Line,
    /// Eight rooms around an empty centre
    Ring,
    /// A centre room with four arms
    Cross,
    /// A tall merged body room flanked by three rooms on each side
    Beetle,
    /// Edge rooms feeding a lattice of hallway junctions
    Crossroads,
}

/// Role of one macro cell in a templated structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// Not part of the layout
    Invalid,
    /// Participates; room or hallway decided at random
    Open,
    /// Fixed room
    Room,
    /// Fixed hallway junction
    Anchor,
}

/// Macro grid description produced by a structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub cols: usize,
    pub rows: usize,
    /// Row-major roles, `gy * cols + gx`
    pub roles: Vec<CellRole>,
    /// Pre-wired connections as (gx, gy, direction)
    pub links: Vec<(usize, usize, Direction)>,
    /// Groups of cells whose rooms are merged unconditionally
    pub forced_merges: Vec<Vec<(usize, usize)>>,
}

impl Topology {
    fn uniform(cols: usize, rows: usize, role: CellRole) -> Self {
        Self {
            cols,
            rows,
            roles: vec![role; cols * rows],
            links: Vec::new(),
            forced_merges: Vec::new(),
        }
    }

    fn set(&mut self, gx: usize, gy: usize, role: CellRole) {
        self.roles[gy * self.cols + gx] = role;
    }

    pub fn role(&self, gx: usize, gy: usize) -> CellRole {
        self.roles[gy * self.cols + gx]
    }
}

impl Structure {
    /// Macro grid size as (cols, rows)
    pub const fn dimensions(self) -> (usize, usize) {
        match self {
            Structure::Standard => (6, 4),
            Structure::Small => (4, 2),
            Structure::Medium => (5, 4),
            Structure::Line => (5, 1),
            Structure::Ring | Structure::Cross | Structure::Beetle => (3, 3),
            Structure::Crossroads => (5, 4),
        }
    }

    /// Rooms are picked by room density and wired by the random walk
    pub const fn is_generic(self) -> bool {
        matches!(self, Structure::Standard | Structure::Small | Structure::Medium)
    }

    /// Build the macro grid description
    pub fn topology(self) -> Topology {
        let (cols, rows) = self.dimensions();
        match self {
            Structure::Standard | Structure::Small | Structure::Medium => {
                Topology::uniform(cols, rows, CellRole::Open)
            }
            Structure::Line => {
                let mut topo = Topology::uniform(cols, rows, CellRole::Room);
                for gx in 0..cols - 1 {
                    topo.links.push((gx, 0, Direction::East));
                }
                topo
            }
            Structure::Ring => {
                let mut topo = Topology::uniform(cols, rows, CellRole::Room);
                topo.set(1, 1, CellRole::Invalid);
                topo.links.extend([
                    (0, 0, Direction::East),
                    (1, 0, Direction::East),
                    (2, 0, Direction::South),
                    (2, 1, Direction::South),
                    (2, 2, Direction::West),
                    (1, 2, Direction::West),
                    (0, 2, Direction::North),
                    (0, 1, Direction::North),
                ]);
                topo
            }
            Structure::Cross => {
                let mut topo = Topology::uniform(cols, rows, CellRole::Room);
                for (gx, gy) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
                    topo.set(gx, gy, CellRole::Invalid);
                }
                for dir in Direction::CARDINALS {
                    topo.links.push((1, 1, dir));
                }
                topo
            }
            Structure::Beetle => {
                let mut topo = Topology::uniform(cols, rows, CellRole::Room);
                topo.links.extend([(1, 0, Direction::South), (1, 1, Direction::South)]);
                for gy in 0..rows {
                    topo.links.push((1, gy, Direction::West));
                    topo.links.push((1, gy, Direction::East));
                }
                topo.forced_merges.push(vec![(1, 0), (1, 1), (1, 2)]);
                topo
            }
            Structure::Crossroads => {
                let mut topo = Topology::uniform(cols, rows, CellRole::Anchor);
                for gy in 0..rows {
                    for gx in 0..cols {
                        let edge_x = gx == 0 || gx == cols - 1;
                        let edge_y = gy == 0 || gy == rows - 1;
                        let role = match (edge_x, edge_y) {
                            (true, true) => CellRole::Invalid,
                            (true, false) | (false, true) => CellRole::Room,
                            (false, false) => CellRole::Anchor,
                        };
                        topo.set(gx, gy, role);
                    }
                }
                for gx in 1..cols - 1 {
                    topo.links.push((gx, 0, Direction::South));
                    topo.links.push((gx, rows - 1, Direction::North));
                }
                for gy in 1..rows - 1 {
                    topo.links.push((0, gy, Direction::East));
                    topo.links.push((cols - 1, gy, Direction::West));
                }
                for gy in 1..rows - 1 {
                    for gx in 1..cols - 1 {
                        if gx + 1 < cols - 1 {
                            topo.links.push((gx, gy, Direction::East));
                        }
                        if gy + 1 < rows - 1 {
                            topo.links.push((gx, gy, Direction::South));
                        }
                    }
                }
                topo
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Structure::from_str("ring").ok(), Some(Structure::Ring));
        assert_eq!(Structure::from_str("CROSSROADS").ok(), Some(Structure::Crossroads));
        assert!(Structure::from_str("labyrinth").is_err());
    }

    #[test]
    fn test_topology_shapes() {
        for structure in Structure::iter() {
            let topo = structure.topology();
            let (cols, rows) = structure.dimensions();
            assert_eq!(topo.roles.len(), cols * rows);
            for &(gx, gy, dir) in &topo.links {
                assert!(dir.is_cardinal());
                assert_ne!(topo.role(gx, gy), CellRole::Invalid, "{structure} links an invalid cell");
            }
        }
    }

    #[test]
    fn test_ring_has_eight_rooms() {
        let topo = Structure::Ring.topology();
        let rooms = topo.roles.iter().filter(|r| **r == CellRole::Room).count();
        assert_eq!(rooms, 8);
        assert_eq!(topo.role(1, 1), CellRole::Invalid);
        assert_eq!(topo.links.len(), 8);
    }

    #[test]
    fn test_crossroads_roles() {
        let topo = Structure::Crossroads.topology();
        assert_eq!(topo.role(0, 0), CellRole::Invalid);
        assert_eq!(topo.role(2, 0), CellRole::Room);
        assert_eq!(topo.role(0, 1), CellRole::Room);
        assert_eq!(topo.role(2, 2), CellRole::Anchor);
    }
}
