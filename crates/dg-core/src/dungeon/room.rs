//! Room assignment and carving

use tracing::debug;

use super::cell::CellGrid;
use super::{FloorParams, Grid, Rect, Tile};
use crate::rng::GameRng;

/// Smallest room side
pub const MIN_ROOM_SIDE: i32 = 2;

/// Mark `room_density` random valid cells as rooms (generic structures).
///
/// The count is clamped to at least two rooms and at most the number of
/// valid cells. Returns how many rooms were marked.
pub fn assign_rooms(cells: &mut CellGrid, room_density: u32, rng: &mut GameRng) -> usize {
    let mut valid = cells.valid_coords();
    let wanted = (room_density as usize).max(2).min(valid.len());
    rng.shuffle(&mut valid);
    for (i, coord) in valid.into_iter().enumerate() {
        cells.cell_mut(coord).is_room = i < wanted;
    }
    wanted
}

/// Random room rectangle inside `region`: sides at least 2, aspect at most 3:2
pub fn random_room_rect(region: &Rect, rng: &mut GameRng) -> Rect {
    let max_w = region.width();
    let max_h = region.height();
    let mut w = rng.range(MIN_ROOM_SIDE, max_w);
    let mut h = rng.range(MIN_ROOM_SIDE, max_h);

    if w * 2 > h * 3 {
        w = (h * 3 / 2).max(MIN_ROOM_SIDE);
    }
    if h * 2 > w * 3 {
        h = (w * 3 / 2).max(MIN_ROOM_SIDE);
    }

    let lx = rng.range(region.lx, region.hx - w + 1);
    let ly = rng.range(region.ly, region.hy - h + 1);
    Rect::new(lx, ly, lx + w - 1, ly + h - 1)
}

/// Carve every valid cell: rooms get a fresh id and a stamped rectangle,
/// other valid cells get a single anchor hallway tile.
///
/// Returns the number of rooms carved.
pub fn carve_cells(
    grid: &mut Grid,
    cells: &mut CellGrid,
    params: &FloorParams,
    rng: &mut GameRng,
) -> u32 {
    let mut next_id = 1;
    for coord in cells.valid_coords() {
        let cell = cells.cell_mut(coord);
        if cell.is_room {
            let room = random_room_rect(&cell.region, rng);
            for pos in room.positions() {
                grid.set(pos.x, pos.y, Tile::room(next_id));
            }
            cell.room = room;
            cell.room_id = next_id;
            cell.imperfect = rng.percent(params.imperfect_percentage);
            cell.secondary = rng.percent(params.secondary_percentage);
            debug!(?coord, id = next_id, ?room, "carved room");
            next_id += 1;
        } else {
            let anchor = cell.region.random_point(rng);
            grid.set(anchor.x, anchor.y, Tile::hallway());
            cell.anchor = anchor;
        }
    }
    next_id - 1
}
