//! Extra wandering hallways that branch off rooms

use tracing::debug;

use super::cell::CellGrid;
use super::{Direction, Grid, Position, Rect, Tile};
use crate::rng::GameRng;

/// Hard cap on the tiles one extra hallway may carve
pub const MAX_EXTRA_HALLWAY_STEPS: u32 = 60;

/// Ground on either side of `pos`, across `dir`
fn flanked_by_ground(grid: &Grid, pos: Position, dir: Direction) -> bool {
    dir.perpendicular()
        .into_iter()
        .any(|side| grid.at(pos.step(side)).is_ground())
}

/// 5×5 box around `pos` lies inside the floor interior
fn has_clearance(pos: Position) -> bool {
    let bounds = Rect::new(pos.x - 2, pos.y - 2, pos.x + 2, pos.y + 2);
    Position::new(bounds.lx, bounds.ly).in_interior()
        && Position::new(bounds.hx, bounds.hy).in_interior()
}

/// Try to carve one extra hallway from a random connected room.
///
/// Returns the number of tiles carved (0 when the spot was rejected).
pub fn carve_extra_hallway(grid: &mut Grid, cells: &CellGrid, rng: &mut GameRng) -> u32 {
    let rooms: Vec<_> = cells
        .room_coords()
        .into_iter()
        .filter(|c| cells.cell(*c).connected)
        .collect();
    let Some(&coord) = rng.choose(&rooms) else {
        return 0;
    };
    let Some(&heading) = rng.choose(&Direction::CARDINALS) else {
        return 0;
    };

    // leave the room through its edge and past any hallway touching it
    let mut pos = cells.cell(coord).room.random_point(rng);
    while grid.at(pos).is_ground() {
        pos = pos.step(heading);
    }
    if !has_clearance(pos) || flanked_by_ground(grid, pos, heading) {
        return 0;
    }

    let carved = wander(grid, pos, heading, rng).len() as u32;
    debug!(?coord, carved, "carved extra hallway");
    carved
}

/// Carve a corridor from `start`, turning every 3 to 5 tiles.
///
/// Stops at the floor edge, in front of ground, or before running alongside
/// ground. Returns the carved tiles in order.
fn wander(
    grid: &mut Grid,
    start: Position,
    heading: Direction,
    rng: &mut GameRng,
) -> Vec<Position> {
    let mut path = Vec::new();
    let mut pos = start;
    let mut dir = heading;
    let mut run = 0;
    let mut turn_after = rng.range(3, 5);
    while path.len() < MAX_EXTRA_HALLWAY_STEPS as usize {
        grid.set(pos.x, pos.y, Tile::hallway());
        path.push(pos);
        run += 1;

        if run >= turn_after {
            let sides = dir.perpendicular();
            if let Some(&side) = rng.choose(&sides) {
                dir = side;
            }
            run = 0;
            turn_after = rng.range(3, 5);
        }

        let next = pos.step(dir);
        if !next.in_interior() || grid.at(next).is_ground() || flanked_by_ground(grid, next, dir) {
            break;
        }
        pos = next;
    }
    path
}

/// Run `density` extra hallway attempts; returns the total tiles carved
pub fn carve_extra_hallways(grid: &mut Grid, cells: &CellGrid, density: u32, rng: &mut GameRng) -> u32 {
    (0..density)
        .map(|_| carve_extra_hallway(grid, cells, rng))
        .sum()
}
