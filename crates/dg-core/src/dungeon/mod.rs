//! Floor layout and generation
//!
//! Contains the tile grid, macro cells, structure templates and the
//! generation pipeline that fills them.

mod cell;
mod corridor;
mod direction;
mod extra_hallway;
mod generation;
mod grid;
mod merge;
mod params;
mod position;
mod rect;
mod room;
mod shop;
mod spawn;
mod structure;
mod tile;
mod water;

pub use cell::{Cell, CellCoord, CellGrid};
pub use direction::{Direction, DirectionSet};
pub use generation::{BuildReport, Floor, FloorBuilder};
pub use grid::{Grid, NeighborMask};
pub use params::FloorParams;
pub use position::Position;
pub use rect::Rect;
pub use structure::{CellRole, Structure, Topology};
pub use tile::{Item, OccupantId, Terrain, Tile, Trap, TrapKind};
