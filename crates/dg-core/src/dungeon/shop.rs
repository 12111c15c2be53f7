//! Shop placement
//!
//! A shop takes over the interior of one ordinary room. Stairs and the
//! player never spawn on shop tiles.

use tracing::debug;

use super::cell::{CellCoord, CellGrid};
use super::Grid;
use crate::rng::GameRng;

/// Smallest room side that can hold a shop
pub const MIN_SHOP_SIDE: i32 = 3;

/// Rooms eligible to become a shop: connected, unmerged, not ringed by
/// secondary terrain and at least 3×3
pub fn shop_candidates(cells: &CellGrid) -> Vec<CellCoord> {
    cells
        .room_coords()
        .into_iter()
        .filter(|c| {
            let cell = cells.cell(*c);
            cell.connected
                && !cell.merged
                && !cell.secondary
                && cell.room.width() >= MIN_SHOP_SIDE
                && cell.room.height() >= MIN_SHOP_SIDE
        })
        .collect()
}

/// Roll `shop_percentage` and turn one eligible room into a shop.
///
/// Returns the chosen cell.
pub fn place_shop(
    grid: &mut Grid,
    cells: &CellGrid,
    shop_percentage: u32,
    rng: &mut GameRng,
) -> Option<CellCoord> {
    if !rng.percent(shop_percentage) {
        return None;
    }
    let candidates = shop_candidates(cells);
    let &coord = rng.choose(&candidates)?;
    let interior = cells.cell(coord).room.shrunk(1)?;

    for pos in interior.positions() {
        if let Some(tile) = grid.at_mut(pos) {
            tile.is_shop = true;
        }
    }
    grid.has_shop = true;
    debug!(?coord, ?interior, "placed shop");
    Some(coord)
}
