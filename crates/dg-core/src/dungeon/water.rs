//! Secondary terrain: rivers, lakes and flooded room rings
//!
//! Secondary terrain only ever replaces wall tiles inside the interior, so
//! it never cuts a room or hallway apart.

use tracing::debug;

use super::cell::CellGrid;
use super::{Direction, Grid, Position};
use crate::rng::GameRng;
use crate::{FLOOR_HEIGHT, FLOOR_WIDTH};

/// Side of the blob lake mask
const LAKE_MASK: usize = 10;
/// Random picks used to grow a blob lake
const LAKE_GROWTH_PICKS: u32 = 80;
/// Offsets sampled when a river widens into a lake
const RIVER_LAKE_SAMPLES: u32 = 100;
/// Upper bound on river steps
const MAX_RIVER_STEPS: u32 = (FLOOR_WIDTH + FLOOR_HEIGHT) as u32 * 3;

/// Flood one tile if it is an interior wall
fn flood(grid: &mut Grid, pos: Position) -> bool {
    if !pos.in_interior() {
        return false;
    }
    grid.at_mut(pos).is_some_and(|tile| tile.flood())
}

/// Widen a river into a rough disc around `center`
fn river_lake(grid: &mut Grid, center: Position, rng: &mut GameRng) {
    let radius = rng.range(2, 4);
    for _ in 0..RIVER_LAKE_SAMPLES {
        let dx = rng.range(-radius, radius);
        let dy = rng.range(-radius, radius);
        if dx * dx + dy * dy > radius * radius {
            continue;
        }
        let pos = Position::new(center.x + dx, center.y + dy);
        let touches_water = pos
            .cardinal_neighbors()
            .iter()
            .any(|next| grid.at(*next).is_water());
        if touches_water && grid.at(pos).is_wall() {
            flood(grid, pos);
        }
    }
}

/// Walk one river across the floor.
///
/// Starts on the top or bottom edge and heads for the other one, drifting
/// sideways. Occasionally it swaps to horizontal movement towards either
/// side and may swap back later.
pub fn carve_river(grid: &mut Grid, rng: &mut GameRng) -> u32 {
    let from_top = rng.one_in(2);
    let mut pos = Position::new(
        rng.range(2, FLOOR_WIDTH as i32 - 3),
        if from_top { 1 } else { FLOOR_HEIGHT as i32 - 2 },
    );
    let mut heading = if from_top {
        Direction::South
    } else {
        Direction::North
    };

    let mut painted = 0;
    for _ in 0..MAX_RIVER_STEPS {
        if !pos.in_interior() {
            break;
        }
        if flood(grid, pos) {
            painted += 1;
        }
        if rng.one_in(20) {
            river_lake(grid, pos, rng);
        }
        if rng.one_in(30) {
            let sides = heading.perpendicular();
            if let Some(&side) = rng.choose(&sides) {
                heading = side;
            }
        }

        // drift across the heading now and then
        let step = if rng.one_in(3) {
            let sides = heading.perpendicular();
            match rng.choose(&sides) {
                Some(&side) => side,
                None => heading,
            }
        } else {
            heading
        };
        let next = pos.step(step);
        // sideways drift never leaves the interior by itself
        if step != heading && !next.in_interior() {
            continue;
        }
        pos = next;
    }
    painted
}

/// Grow a wet mask from its centre; growth picks never touch the mask rim
fn grow_lake_mask(rng: &mut GameRng) -> [[bool; LAKE_MASK]; LAKE_MASK] {
    let mut mask = [[false; LAKE_MASK]; LAKE_MASK];
    let mid = LAKE_MASK / 2;
    mask[mid][mid] = true;

    let inner_max = LAKE_MASK as i32 - 2;
    for _ in 0..LAKE_GROWTH_PICKS {
        let mx = rng.range(1, inner_max) as usize;
        let my = rng.range(1, inner_max) as usize;
        let wet_neighbor =
            mask[my][mx - 1] || mask[my][mx + 1] || mask[my - 1][mx] || mask[my + 1][mx];
        if wet_neighbor {
            mask[my][mx] = true;
        }
    }
    mask
}

/// A blob lake grown from a 10×10 mask seeded at its centre
pub fn blob_lake(grid: &mut Grid, rng: &mut GameRng) -> u32 {
    let mask = grow_lake_mask(rng);
    let mid = LAKE_MASK / 2;

    let center = Position::new(
        rng.range(1, FLOOR_WIDTH as i32 - 2),
        rng.range(1, FLOOR_HEIGHT as i32 - 2),
    );
    let mut painted = 0;
    for (my, row) in mask.iter().enumerate() {
        for (mx, wet) in row.iter().enumerate() {
            if !*wet {
                continue;
            }
            let pos = Position::new(
                center.x + mx as i32 - mid as i32,
                center.y + my as i32 - mid as i32,
            );
            if flood(grid, pos) {
                painted += 1;
            }
        }
    }
    painted
}

/// Paint the wall ring around every room flagged `secondary`
pub fn flood_room_rings(grid: &mut Grid, cells: &CellGrid) -> u32 {
    let mut painted = 0;
    for coord in cells.room_coords() {
        let cell = cells.cell(coord);
        if !cell.secondary {
            continue;
        }
        let ring = cell.room.expanded(1);
        for pos in ring.positions() {
            if !cell.room.contains(pos) && flood(grid, pos) {
                painted += 1;
            }
        }
    }
    painted
}

/// Paint all secondary terrain for a floor.
///
/// Rivers and blob lakes only appear when `water_density` is nonzero; room
/// rings depend on the per-room `secondary` roll.
pub fn place_secondary_terrain(
    grid: &mut Grid,
    cells: &CellGrid,
    water_density: u32,
    rng: &mut GameRng,
) -> u32 {
    let mut painted = 0;
    if water_density > 0 {
        let rivers = rng.range(1, 3);
        for _ in 0..rivers {
            painted += carve_river(grid, rng);
        }
        for _ in 0..water_density {
            painted += blob_lake(grid, rng);
        }
    }
    painted += flood_room_rings(grid, cells);
    debug!(painted, "placed secondary terrain");
    painted
}
