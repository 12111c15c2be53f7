//! Tile coordinates

use serde::{Deserialize, Serialize};

use super::Direction;
use crate::{FLOOR_HEIGHT, FLOOR_WIDTH};

/// A tile coordinate; (0, 0) is the north-west corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one step in `dir`; saturates at the `i32` limits
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Inside `[0, W) × [0, H)`
    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < FLOOR_WIDTH && (self.y as usize) < FLOOR_HEIGHT
    }

    /// Inside `[1, W-2] × [1, H-2]`, i.e. not on the outer wall ring
    pub const fn in_interior(self) -> bool {
        self.x >= 1
            && self.y >= 1
            && (self.x as usize) < FLOOR_WIDTH - 1
            && (self.y as usize) < FLOOR_HEIGHT - 1
    }

    /// The four cardinal neighbours (N, E, S, W)
    pub fn cardinal_neighbors(self) -> [Position; 4] {
        Direction::CARDINALS.map(|dir| self.step(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_and_bounds() {
        let pos = Position::new(0, 0);
        assert!(pos.in_bounds());
        assert!(!pos.in_interior());
        assert!(!pos.step(Direction::North).in_bounds());
        assert_eq!(pos.step(Direction::SouthEast), Position::new(1, 1));
        assert!(Position::new(1, 1).in_interior());

        let last = Position::new(FLOOR_WIDTH as i32 - 1, FLOOR_HEIGHT as i32 - 1);
        assert!(last.in_bounds());
        assert!(!last.in_interior());
        assert!(!last.step(Direction::East).in_bounds());
    }

    #[test]
    fn test_step_saturates() {
        let far = Position::new(i32::MAX, i32::MIN);
        assert_eq!(far.step(Direction::NorthEast), far);
        assert!(!far.step(Direction::SouthWest).in_bounds());
    }
}
