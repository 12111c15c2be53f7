//! Room merging
//!
//! Two connected rooms can be fused into one: the bounding rectangle of
//! both is stamped as a single room carrying the first room's id.

use tracing::debug;

use super::cell::{CellCoord, CellGrid};
use super::{Direction, Grid, Rect, Tile};
use crate::rng::GameRng;

/// Fuse the rooms of `group` into one room.
///
/// Every cell sharing a room id with a group member joins the union, so
/// merging into an already merged room keeps the whole room together.
/// Cells keep their own `room` rectangle; only ids and flags change.
pub fn merge_group(grid: &mut Grid, cells: &mut CellGrid, group: &[CellCoord]) -> Option<u32> {
    let first = *group.first()?;
    let id = cells.cell(first).room_id;
    let ids: Vec<u32> = group.iter().map(|c| cells.cell(*c).room_id).collect();

    let members: Vec<CellCoord> = cells
        .room_coords()
        .into_iter()
        .filter(|c| ids.contains(&cells.cell(*c).room_id))
        .collect();
    let bounds = members
        .iter()
        .map(|c| cells.cell(*c).room)
        .reduce(|acc, room| acc.union(&room))?;

    stamp(grid, &bounds, id);
    for coord in members {
        let cell = cells.cell_mut(coord);
        cell.room_id = id;
        cell.merged = true;
    }
    debug!(id, ?bounds, "merged rooms");
    Some(id)
}

fn stamp(grid: &mut Grid, bounds: &Rect, id: u32) {
    for pos in bounds.positions() {
        if pos.in_interior() {
            grid.set(pos.x, pos.y, Tile::room(id));
        }
    }
}

/// Apply forced merges, then roll `merge_percentage` for each connected
/// pair of unmerged rooms. A room merges at most once.
///
/// Returns the number of merges performed.
pub fn merge_rooms(
    grid: &mut Grid,
    cells: &mut CellGrid,
    forced: &[Vec<CellCoord>],
    merge_percentage: u32,
    rng: &mut GameRng,
) -> u32 {
    let mut merges = 0;
    for group in forced {
        if merge_group(grid, cells, group).is_some() {
            merges += 1;
        }
    }

    for coord in cells.room_coords() {
        for dir in [Direction::East, Direction::South] {
            let cell = cells.cell(coord);
            if cell.merged || !cell.is_connected_towards(dir) {
                continue;
            }
            let Some(other) = cells.neighbor(coord, dir) else {
                continue;
            };
            let neighbor = cells.cell(other);
            if !neighbor.is_room || neighbor.merged {
                continue;
            }
            if rng.percent(merge_percentage) && merge_group(grid, cells, &[coord, other]).is_some()
            {
                merges += 1;
            }
        }
    }
    merges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::carve_cells;
    use crate::dungeon::{FloorParams, Structure};

    #[test]
    fn test_merge_pair_unions_bounds() {
        let mut rng = GameRng::new(2);
        let mut grid = Grid::new(0);
        let mut cells = CellGrid::from_topology(&Structure::Line.topology());
        carve_cells(&mut grid, &mut cells, &FloorParams::default(), &mut rng);

        let a = cells.cell((0, 0)).room;
        let b = cells.cell((1, 0)).room;
        let id = merge_group(&mut grid, &mut cells, &[(0, 0), (1, 0)]);
        assert_eq!(id, Some(1));
        assert!(a.union(&b).positions().all(|p| grid.at(p).room_id == 1));
        assert_eq!(cells.cell((1, 0)).room_id, 1);
        assert!(cells.cell((0, 0)).merged && cells.cell((1, 0)).merged);
        // the cell keeps its own rectangle
        assert_eq!(cells.cell((1, 0)).room, b);
        assert!(!grid.room_ids().contains(&2));
    }

    #[test]
    fn test_forced_merge_of_beetle_body() {
        let mut rng = GameRng::new(6);
        let mut grid = Grid::new(0);
        let topo = Structure::Beetle.topology();
        let mut cells = CellGrid::from_topology(&topo);
        carve_cells(&mut grid, &mut cells, &FloorParams::default(), &mut rng);

        let merges = merge_rooms(&mut grid, &mut cells, &topo.forced_merges, 0, &mut rng);
        assert_eq!(merges, 1);
        let body = cells.cell((1, 0)).room_id;
        assert_eq!(cells.cell((1, 1)).room_id, body);
        assert_eq!(cells.cell((1, 2)).room_id, body);
        assert_eq!(grid.room_ids().len(), 7);
    }

    #[test]
    fn test_certain_merge_on_line() {
        let mut rng = GameRng::new(12);
        let mut grid = Grid::new(0);
        let mut cells = CellGrid::from_topology(&Structure::Line.topology());
        carve_cells(&mut grid, &mut cells, &FloorParams::default(), &mut rng);

        let merges = merge_rooms(&mut grid, &mut cells, &[], 100, &mut rng);
        // (0,1) and (2,3) pair up, the last room has no free partner
        assert_eq!(merges, 2);
        assert_eq!(grid.room_ids().len(), 3);
        assert!(!cells.cell((4, 0)).merged);
    }
}
