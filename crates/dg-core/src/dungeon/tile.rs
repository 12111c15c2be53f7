//! Map tile types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::NeighborMask;

/// Terrain classification of a tile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Wall = 0,
    /// Water, lava or whatever the tileset layers over walls
    Secondary = 1,
    Ground = 2,
}

impl Terrain {
    pub const fn is_wall(&self) -> bool {
        matches!(self, Terrain::Wall)
    }

    pub const fn is_secondary(&self) -> bool {
        matches!(self, Terrain::Secondary)
    }

    pub const fn is_ground(&self) -> bool {
        matches!(self, Terrain::Ground)
    }

    /// Get the display character for this terrain
    pub const fn symbol(&self) -> char {
        match self {
            Terrain::Wall => '#',
            Terrain::Secondary => '~',
            Terrain::Ground => '.',
        }
    }
}

/// Opaque handle to whatever the turn loop parks on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupantId(pub u32);

/// Item placed during generation; the consumer decides what it actually is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    /// Regular floor item
    Loot,
    /// Coin pile with its amount
    Coins(u32),
    /// Item hidden inside wall or secondary terrain
    Buried,
}

impl Item {
    pub const fn symbol(&self) -> char {
        match self {
            Item::Loot => '*',
            Item::Coins(_) => '$',
            Item::Buried => '%',
        }
    }
}

/// Trap kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum TrapKind {
    Mud,
    Sticky,
    Grimy,
    Summon,
    Pitfall,
    Warp,
    Gust,
    Spin,
    Slumber,
    Slow,
    Seal,
    Poison,
    Selfdestruct,
    Explosion,
    PokemonTrap,
    Chestnut,
    Wonder,
    Spiked,
}

impl TrapKind {
    /// All trap kinds for random selection
    pub const ALL: [TrapKind; 18] = [
        TrapKind::Mud,
        TrapKind::Sticky,
        TrapKind::Grimy,
        TrapKind::Summon,
        TrapKind::Pitfall,
        TrapKind::Warp,
        TrapKind::Gust,
        TrapKind::Spin,
        TrapKind::Slumber,
        TrapKind::Slow,
        TrapKind::Seal,
        TrapKind::Poison,
        TrapKind::Selfdestruct,
        TrapKind::Explosion,
        TrapKind::PokemonTrap,
        TrapKind::Chestnut,
        TrapKind::Wonder,
        TrapKind::Spiked,
    ];
}

/// Trap on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trap {
    pub kind: TrapKind,
    /// Traps start hidden
    pub revealed: bool,
}

impl Trap {
    pub const fn hidden(kind: TrapKind) -> Self {
        Self {
            kind,
            revealed: false,
        }
    }
}

/// A single map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain classification
    pub terrain: Terrain,

    /// Room number (0 = not in room)
    pub room_id: u32,

    /// Can never be entered or dug through
    pub impassable: bool,

    /// Eligible for spawn placement
    pub can_spawn: bool,

    /// Part of a shop interior
    pub is_shop: bool,

    pub occupant: Option<OccupantId>,
    pub item: Option<Item>,
    pub trap: Option<Trap>,

    /// Which neighbours share this tile's terrain (rendering hint)
    pub neighbor_mask: NeighborMask,
}

impl Tile {
    /// Create a plain wall tile
    pub const fn wall() -> Self {
        Self {
            terrain: Terrain::Wall,
            room_id: 0,
            impassable: false,
            can_spawn: false,
            is_shop: false,
            occupant: None,
            item: None,
            trap: None,
            neighbor_mask: NeighborMask::empty(),
        }
    }

    /// Create the impassable wall used outside the map and on its rim
    pub const fn border() -> Self {
        let mut tile = Self::wall();
        tile.impassable = true;
        tile
    }

    /// Create a spawn-eligible room floor tile
    pub const fn room(room_id: u32) -> Self {
        let mut tile = Self::wall();
        tile.terrain = Terrain::Ground;
        tile.room_id = room_id;
        tile.can_spawn = true;
        tile
    }

    /// Create a hallway floor tile
    pub const fn hallway() -> Self {
        let mut tile = Self::wall();
        tile.terrain = Terrain::Ground;
        tile
    }

    pub const fn is_wall(&self) -> bool {
        self.terrain.is_wall()
    }

    pub const fn is_ground(&self) -> bool {
        self.terrain.is_ground()
    }

    pub const fn is_water(&self) -> bool {
        self.terrain.is_secondary()
    }

    /// Ground tile belonging to a room
    pub const fn is_room(&self) -> bool {
        self.terrain.is_ground() && self.room_id != 0
    }

    /// Ground tile outside every room
    pub const fn is_hallway(&self) -> bool {
        self.terrain.is_ground() && self.room_id == 0
    }

    /// Can something walk here (before occupants are considered)
    pub const fn is_walkable(&self) -> bool {
        !self.impassable && self.terrain.is_ground()
    }

    /// Turn the tile into secondary terrain (walls only)
    pub fn flood(&mut self) -> bool {
        if self.terrain.is_wall() && !self.impassable {
            self.terrain = Terrain::Secondary;
            true
        } else {
            false
        }
    }

    /// Character used by text dumps
    pub fn symbol(&self) -> char {
        if let Some(item) = self.item
            && !matches!(item, Item::Buried)
        {
            return item.symbol();
        }
        if self.trap.is_some() {
            return '^';
        }
        if self.is_shop {
            return ':';
        }
        self.terrain.symbol()
    }
}
