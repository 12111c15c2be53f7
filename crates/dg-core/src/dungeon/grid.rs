//! The finished floor grid handed to the turn loop

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::{Direction, Position, Tile};
use crate::{FLOOR_HEIGHT, FLOOR_WIDTH};

bitflags! {
    /// Which of the eight neighbours share the centre tile's terrain
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NeighborMask: u8 {
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

impl NeighborMask {
    pub const fn for_direction(dir: Direction) -> Self {
        Self::from_bits_truncate(1 << dir as u8)
    }
}

// Manual serde impl for NeighborMask
impl Serialize for NeighborMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NeighborMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(NeighborMask::from_bits_truncate(bits))
    }
}

/// Tile returned for every out-of-range read. Never handed out mutably.
static BORDER: Tile = Tile::border();

/// A complete floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Dense row-major tiles, `y * FLOOR_WIDTH + x`
    tiles: Vec<Tile>,

    pub(super) stairs_position: Position,
    pub(super) player_spawn_position: Position,

    /// Exit tiles of every room, keyed by room id
    pub(super) room_exits: BTreeMap<u32, Vec<Position>>,

    pub(super) has_shop: bool,

    /// Tileset the floor should be drawn with
    pub tileset: u16,
}

impl Grid {
    /// A solid floor: walls everywhere, impassable on the outer ring
    pub fn new(tileset: u16) -> Self {
        let mut tiles = vec![Tile::wall(); FLOOR_WIDTH * FLOOR_HEIGHT];
        for y in 0..FLOOR_HEIGHT {
            for x in 0..FLOOR_WIDTH {
                if x == 0 || y == 0 || x == FLOOR_WIDTH - 1 || y == FLOOR_HEIGHT - 1 {
                    tiles[y * FLOOR_WIDTH + x] = Tile::border();
                }
            }
        }
        Self {
            tiles,
            stairs_position: Position::default(),
            player_spawn_position: Position::default(),
            room_exits: BTreeMap::new(),
            has_shop: false,
            tileset,
        }
    }

    pub const fn width(&self) -> usize {
        FLOOR_WIDTH
    }

    pub const fn height(&self) -> usize {
        FLOOR_HEIGHT
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        Position::new(x, y)
            .in_bounds()
            .then(|| y as usize * FLOOR_WIDTH + x as usize)
    }

    /// Read a tile; anything off the map is the impassable border wall
    pub fn get(&self, x: i32, y: i32) -> &Tile {
        match Self::index(x, y) {
            Some(i) => &self.tiles[i],
            None => &BORDER,
        }
    }

    pub fn at(&self, pos: Position) -> &Tile {
        self.get(pos.x, pos.y)
    }

    /// Mutable access; None off the map
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        Self::index(x, y).map(|i| &mut self.tiles[i])
    }

    pub fn at_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.get_mut(pos.x, pos.y)
    }

    /// Overwrite a tile; writes off the map are ignored
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = tile;
        }
    }

    /// Every in-bounds position, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        (0..FLOOR_HEIGHT as i32)
            .flat_map(|y| (0..FLOOR_WIDTH as i32).map(move |x| Position::new(x, y)))
    }

    /// Mask of neighbours whose terrain equals the tile at (x, y)
    pub fn neighbor_mask(&self, x: i32, y: i32) -> NeighborMask {
        let center = Position::new(x, y);
        let terrain = self.at(center).terrain;
        let mut mask = NeighborMask::empty();
        for dir in Direction::ALL {
            if self.at(center.step(dir)).terrain == terrain {
                mask |= NeighborMask::for_direction(dir);
            }
        }
        mask
    }

    pub fn is_room(&self, pos: Position) -> bool {
        self.at(pos).is_room()
    }

    /// Both positions are room tiles of the same room
    pub fn in_same_room(&self, a: Position, b: Position) -> bool {
        let ta = self.at(a);
        let tb = self.at(b);
        ta.is_room() && tb.is_room() && ta.room_id == tb.room_id
    }

    pub fn stairs_position(&self) -> Position {
        self.stairs_position
    }

    pub fn player_spawn_position(&self) -> Position {
        self.player_spawn_position
    }

    pub fn has_shop(&self) -> bool {
        self.has_shop
    }

    /// Exit tiles of a room (empty for unknown ids)
    pub fn room_exits(&self, room_id: u32) -> &[Position] {
        self.room_exits.get(&room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_room_exits(&self) -> &BTreeMap<u32, Vec<Position>> {
        &self.room_exits
    }

    /// Distinct room ids present on the floor, ascending
    pub fn room_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .tiles
            .iter()
            .filter(|tile| tile.is_room())
            .map(|tile| tile.room_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Positions of spawn-eligible tiles
    pub fn spawn_candidates(&self) -> Vec<Position> {
        self.positions().filter(|pos| self.at(*pos).can_spawn).collect()
    }

    /// Recompute every room's exit list.
    ///
    /// An exit is a room tile with a cardinal ground neighbour that is in no room.
    pub fn compute_room_exits(&mut self) {
        let mut exits: BTreeMap<u32, Vec<Position>> = BTreeMap::new();
        for pos in self.positions() {
            let tile = self.at(pos);
            if !tile.is_room() {
                continue;
            }
            let is_exit = pos
                .cardinal_neighbors()
                .iter()
                .any(|next| self.at(*next).is_hallway());
            let entry = exits.entry(tile.room_id).or_default();
            if is_exit {
                entry.push(pos);
            }
        }
        self.room_exits = exits;
    }

    /// Store the neighbour mask on every tile
    pub fn compute_neighbor_masks(&mut self) {
        for pos in self.positions() {
            let mask = self.neighbor_mask(pos.x, pos.y);
            if let Some(tile) = self.at_mut(pos) {
                tile.neighbor_mask = mask;
            }
        }
    }

    /// ASCII rendering, one line per row
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((FLOOR_WIDTH + 1) * FLOOR_HEIGHT);
        for y in 0..FLOOR_HEIGHT as i32 {
            for x in 0..FLOOR_WIDTH as i32 {
                let pos = Position::new(x, y);
                let symbol = if pos == self.player_spawn_position {
                    '@'
                } else if pos == self.stairs_position {
                    '>'
                } else {
                    self.at(pos).symbol()
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Terrain;

    #[test]
    fn test_out_of_bounds_returns_border() {
        let grid = Grid::new(0);
        for (x, y) in [(-1, 0), (0, -1), (56, 3), (3, 32), (i32::MIN, i32::MAX)] {
            let tile = grid.get(x, y);
            assert!(tile.impassable);
            assert_eq!(tile.terrain, Terrain::Wall);
        }
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut grid = Grid::new(0);
        let before = grid.clone();
        grid.set(-1, -1, Tile::room(9));
        grid.set(100, 5, Tile::room(9));
        assert_eq!(grid, before);
        assert!(grid.get_mut(56, 0).is_none());
        assert_eq!(*grid.get(-1, -1), Tile::border());
    }

    #[test]
    fn test_rim_is_impassable() {
        let grid = Grid::new(0);
        assert!(grid.get(0, 5).impassable);
        assert!(grid.get(55, 31).impassable);
        assert!(!grid.get(1, 1).impassable);
    }

    #[test]
    fn test_neighbor_mask() {
        let mut grid = Grid::new(0);
        grid.set(10, 10, Tile::room(1));
        grid.set(11, 10, Tile::room(1));
        grid.set(10, 11, Tile::hallway());
        let mask = grid.neighbor_mask(10, 10);
        assert_eq!(mask, NeighborMask::EAST | NeighborMask::SOUTH);

        // a lone wall surrounded by walls matches everywhere, border included
        assert_eq!(grid.neighbor_mask(0, 0), NeighborMask::all());
        assert_eq!(grid.neighbor_mask(20, 20), NeighborMask::all());
    }

    #[test]
    fn test_neighbor_mask_far_off_map() {
        let grid = Grid::new(0);
        assert_eq!(grid.neighbor_mask(i32::MAX, 0), NeighborMask::all());
        assert_eq!(grid.neighbor_mask(i32::MIN, i32::MAX), NeighborMask::all());
    }

    #[test]
    fn test_same_room_and_exits() {
        let mut grid = Grid::new(0);
        for x in 5..=7 {
            for y in 5..=6 {
                grid.set(x, y, Tile::room(1));
            }
        }
        grid.set(8, 5, Tile::hallway());
        grid.set(20, 20, Tile::room(2));

        assert!(grid.in_same_room(Position::new(5, 5), Position::new(7, 6)));
        assert!(!grid.in_same_room(Position::new(5, 5), Position::new(20, 20)));
        assert!(!grid.in_same_room(Position::new(5, 5), Position::new(8, 5)));

        grid.compute_room_exits();
        assert_eq!(grid.room_exits(1), &[Position::new(7, 5)]);
        assert!(grid.room_exits(2).is_empty());
        assert!(grid.room_exits(99).is_empty());
        assert_eq!(grid.room_ids(), vec![1, 2]);
    }
}
