//! Compass directions and direction sets

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// One of the eight unit steps on the grid, ordered clockwise from north
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

/// Clockwise rotation table; index is `Direction as usize`
const ROTATION: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

impl Direction {
    /// All eight directions, clockwise from north
    pub const ALL: [Direction; 8] = ROTATION;

    /// The four cardinal directions used for macro cell connections
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Rotate one step (45°) clockwise
    pub const fn clockwise(self) -> Self {
        ROTATION[(self as usize + 1) % 8]
    }

    /// Rotate one step (45°) anticlockwise
    pub const fn anticlockwise(self) -> Self {
        ROTATION[(self as usize + 7) % 8]
    }

    /// The opposite direction
    pub const fn flip(self) -> Self {
        ROTATION[(self as usize + 4) % 8]
    }

    /// Unit step as (dx, dy); y grows southwards
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub const fn is_cardinal(self) -> bool {
        (self as u8) % 2 == 0
    }

    /// Does this direction move along the x axis only
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// The two cardinal directions at right angles to this one
    pub const fn perpendicular(self) -> [Direction; 2] {
        [
            self.clockwise().clockwise(),
            self.anticlockwise().anticlockwise(),
        ]
    }
}

bitflags! {
    /// A set of directions, one bit per direction
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirectionSet: u8 {
        const NORTH = 1 << Direction::North as u8;
        const NORTH_EAST = 1 << Direction::NorthEast as u8;
        const EAST = 1 << Direction::East as u8;
        const SOUTH_EAST = 1 << Direction::SouthEast as u8;
        const SOUTH = 1 << Direction::South as u8;
        const SOUTH_WEST = 1 << Direction::SouthWest as u8;
        const WEST = 1 << Direction::West as u8;
        const NORTH_WEST = 1 << Direction::NorthWest as u8;
    }
}

impl From<Direction> for DirectionSet {
    fn from(dir: Direction) -> Self {
        Self::from_bits_truncate(1 << dir as u8)
    }
}

impl DirectionSet {
    pub fn from_slice(directions: &[Direction]) -> Self {
        directions.iter().map(|dir| Self::from(*dir)).collect()
    }

    pub fn has(&self, dir: Direction) -> bool {
        self.contains(dir.into())
    }

    pub const fn len(&self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Members in clockwise order from north
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|dir| self.has(*dir))
    }

    /// A new set holding only the members that satisfy `keep`
    pub fn filtered(&self, mut keep: impl FnMut(Direction) -> bool) -> Self {
        self.directions().filter(|dir| keep(*dir)).map(Self::from).collect()
    }

    pub fn to_vec(&self) -> Vec<Direction> {
        self.directions().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_rotation_round_trip() {
        for dir in Direction::iter() {
            assert_eq!(dir.clockwise().anticlockwise(), dir);
            assert_eq!(dir.flip().flip(), dir);
            let mut turned = dir;
            for _ in 0..8 {
                turned = turned.clockwise();
            }
            assert_eq!(turned, dir);
        }
    }

    #[test]
    fn test_flip_negates_delta() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(dir.flip().delta(), (-dx, -dy));
        }
    }

    #[test]
    fn test_cardinals() {
        assert!(Direction::CARDINALS.iter().all(|d| d.is_cardinal()));
        assert!(!Direction::NorthEast.is_cardinal());
        assert_eq!(Direction::North.clockwise(), Direction::NorthEast);
        assert_eq!(Direction::North.anticlockwise(), Direction::NorthWest);
        assert_eq!(Direction::East.perpendicular(), [Direction::South, Direction::North]);
    }

    #[test]
    fn test_direction_set() {
        let mut set = DirectionSet::empty();
        assert!(set.is_empty());
        set.insert(Direction::East.into());
        set.insert(Direction::North.into());
        set.insert(Direction::East.into());
        assert_eq!(set.len(), 2);
        assert_eq!(set, DirectionSet::NORTH | DirectionSet::EAST);
        assert_eq!(set.to_vec(), vec![Direction::North, Direction::East]);
        assert!(set.has(Direction::North) && !set.has(Direction::South));

        let only_east = set.filtered(|d| d == Direction::East);
        assert_eq!(only_east.to_vec(), vec![Direction::East]);
        // filtering never touches the source set
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_direction_set_from_slice() {
        let set = DirectionSet::from_slice(&Direction::CARDINALS);
        assert_eq!(set, DirectionSet::NORTH | DirectionSet::EAST | DirectionSet::SOUTH | DirectionSet::WEST);
        assert!(Direction::ALL.iter().all(|d| set.has(*d) == d.is_cardinal()));
    }
}
