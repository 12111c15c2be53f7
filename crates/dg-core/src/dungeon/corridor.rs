//! Connection graph and hallway carving
//!
//! Works in four phases:
//! 1. Random walk over the macro grid recording connections
//! 2. Extend hallway junctions that would otherwise be dead ends
//! 3. Carve every connection as an L or Z shaped hallway through the gap
//!    between the two cells
//! 4. Rescue rooms the walk never reached and drop orphaned anchors

use tracing::debug;

use super::cell::{CellCoord, CellGrid};
use super::{Direction, Grid, Position, Tile};
use crate::rng::GameRng;

/// Random walk of `steps` steps over valid cells, recording connections.
///
/// Each step prefers a neighbour that has no connection yet. When the
/// current cell has nothing left to open the walk jumps to a random
/// connected cell.
pub fn random_walk(cells: &mut CellGrid, steps: u32, rng: &mut GameRng) {
    let valid = cells.valid_coords();
    let Some(&start) = rng.choose(&valid) else {
        return;
    };
    let mut current = start;

    for _ in 0..steps {
        let open = cells.open_directions(current);
        if open.is_empty() {
            let joined: Vec<CellCoord> = cells
                .coords()
                .filter(|c| !cells.open_directions(*c).is_empty() && cells.cell(*c).connected)
                .collect();
            match rng.choose(&joined) {
                Some(&next) => {
                    current = next;
                    continue;
                }
                None => break,
            }
        }

        let fresh = open.filtered(|dir| {
            cells
                .neighbor(current, dir)
                .is_some_and(|n| !cells.cell(n).connected)
        });
        let choices = if fresh.is_empty() { open.to_vec() } else { fresh.to_vec() };
        let Some(&dir) = rng.choose(&choices) else {
            break;
        };
        if let Some(next) = cells.connect(current, dir) {
            current = next;
        }
    }
}

/// Give every connected single-connection anchor another connection.
///
/// Repeats until no dead end is left or none of them can grow.
/// Returns the number of connections added.
pub fn remove_dead_ends(cells: &mut CellGrid, rng: &mut GameRng) -> u32 {
    let mut added = 0;
    loop {
        let mut progress = false;
        for coord in cells.valid_coords() {
            let cell = cells.cell(coord);
            if cell.is_room || !cell.connected || cell.connections().len() != 1 {
                continue;
            }
            let open = cells.open_directions(coord).to_vec();
            if let Some(&dir) = rng.choose(&open)
                && cells.connect(coord, dir).is_some()
            {
                added += 1;
                progress = true;
            }
        }
        if !progress {
            break;
        }
    }
    added
}

/// Carve hallway tiles along a straight segment, endpoints included.
///
/// Existing ground is left untouched. The segment stops before entering a
/// room whose id is not one of `owners`. Returns false if it stopped early.
pub fn carve_segment(grid: &mut Grid, from: Position, to: Position, owners: [u32; 2]) -> bool {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    let mut pos = from;
    loop {
        let tile = grid.at(pos);
        if tile.is_room() && !owners.contains(&tile.room_id) {
            return false;
        }
        if !tile.is_ground() && pos.in_interior() {
            grid.set(pos.x, pos.y, Tile::hallway());
        }
        if pos == to {
            return true;
        }
        pos = Position::new(pos.x + dx, pos.y + dy);
    }
}

/// Point a hallway leaves a cell from
fn endpoint(cells: &CellGrid, coord: CellCoord, rng: &mut GameRng) -> Position {
    let cell = cells.cell(coord);
    if cell.is_room {
        cell.room.random_point(rng)
    } else {
        cell.anchor
    }
}

/// Carve the hallway for the connection `coord → dir`
pub fn carve_connection(
    grid: &mut Grid,
    cells: &CellGrid,
    coord: CellCoord,
    dir: Direction,
    rng: &mut GameRng,
) -> bool {
    let Some(other) = cells.neighbor(coord, dir) else {
        return false;
    };
    // always carve from the north-west cell so lanes are picked the same way
    let (a, b) = match dir {
        Direction::West | Direction::North => (other, coord),
        _ => (coord, other),
    };
    let owners = [cells.cell(a).hallway_owner(), cells.cell(b).hallway_owner()];
    let pa = endpoint(cells, a, rng);
    let pb = endpoint(cells, b, rng);

    if dir.is_horizontal() {
        let lane = cells.lane_x(a.0, rng.rn2(2));
        let ea = Position::new(lane, pa.y);
        let eb = Position::new(lane, pb.y);
        carve_segment(grid, pa, ea, owners)
            && carve_segment(grid, pb, eb, owners)
            && carve_segment(grid, ea, eb, owners)
    } else {
        let lane = cells.lane_y(a.1, rng.rn2(2));
        let ea = Position::new(pa.x, lane);
        let eb = Position::new(pb.x, lane);
        carve_segment(grid, pa, ea, owners)
            && carve_segment(grid, pb, eb, owners)
            && carve_segment(grid, ea, eb, owners)
    }
}

/// Carve every recorded connection once
pub fn carve_hallways(grid: &mut Grid, cells: &CellGrid, rng: &mut GameRng) -> u32 {
    let mut carved = 0;
    for coord in cells.valid_coords() {
        for dir in [Direction::East, Direction::South] {
            if cells.cell(coord).is_connected_towards(dir) {
                if !carve_connection(grid, cells, coord, dir, rng) {
                    debug!(?coord, %dir, "hallway stopped at a foreign room");
                }
                carved += 1;
            }
        }
    }
    carved
}

/// Join rooms the connection graph missed and drop anchors nobody uses.
///
/// The main component is whatever is reachable from the first connected
/// valid cell. Each room outside it is joined by the shortest chain of valid
/// cells, so a room next to the component needs a single connection.
/// Anchors still outside afterwards turn back into wall and stop being
/// valid. Returns the number of rooms rescued.
pub fn rescue_isolated(grid: &mut Grid, cells: &mut CellGrid, rng: &mut GameRng) -> u32 {
    let valid = cells.valid_coords();
    let Some(&root) = valid
        .iter()
        .find(|c| cells.cell(**c).connected)
        .or_else(|| valid.iter().find(|c| cells.cell(**c).is_room))
    else {
        return 0;
    };

    let mut rescued = 0;
    for coord in cells.room_coords() {
        let reached = cells.reachable_from(root);
        if cells.is_marked(&reached, coord) {
            continue;
        }
        let Some(path) = cells.path_to_any(coord, &reached) else {
            continue;
        };
        for pair in path.windows(2) {
            let Some(dir) = Direction::CARDINALS
                .into_iter()
                .find(|d| cells.neighbor(pair[0], *d) == Some(pair[1]))
            else {
                continue;
            };
            if !cells.cell(pair[0]).is_connected_towards(dir)
                && cells.connect(pair[0], dir).is_some()
            {
                carve_connection(grid, cells, pair[0], dir, rng);
            }
        }
        debug!(?coord, hops = path.len() - 1, "rescued isolated room");
        rescued += 1;
    }

    let reached = cells.reachable_from(root);
    for coord in valid {
        if cells.is_marked(&reached, coord) {
            continue;
        }
        let cell = cells.cell_mut(coord);
        if !cell.is_room {
            grid.set(cell.anchor.x, cell.anchor.y, Tile::wall());
            cell.valid = false;
            cell.connected = false;
        }
    }
    rescued
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Structure;
    use crate::dungeon::room::{assign_rooms, carve_cells};
    use crate::dungeon::FloorParams;

    fn generic(seed: u64) -> (Grid, CellGrid, GameRng) {
        let mut rng = GameRng::new(seed);
        let mut grid = Grid::new(0);
        let mut cells = CellGrid::from_topology(&Structure::Standard.topology());
        assign_rooms(&mut cells, 5, &mut rng);
        carve_cells(&mut grid, &mut cells, &FloorParams::default(), &mut rng);
        (grid, cells, rng)
    }

    #[test]
    fn test_random_walk_connects() {
        let (_, mut cells, mut rng) = generic(1);
        random_walk(&mut cells, 10, &mut rng);
        let connected = cells.cells().filter(|(_, c)| c.connected).count();
        assert!(connected >= 2);
    }

    #[test]
    fn test_dead_ends_removed() {
        for seed in 0..20 {
            let (_, mut cells, mut rng) = generic(seed);
            random_walk(&mut cells, 6, &mut rng);
            remove_dead_ends(&mut cells, &mut rng);
            for (coord, cell) in cells.cells() {
                if cell.connected && !cell.is_room {
                    // a junction may only stay a dead end when boxed in
                    assert!(
                        cell.connections().len() != 1 || cells.open_directions(coord).is_empty(),
                        "seed {seed}: dead end at {coord:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_carve_segment_stops_at_foreign_room() {
        let mut grid = Grid::new(0);
        grid.set(10, 5, Tile::room(7));
        let done = carve_segment(&mut grid, Position::new(5, 5), Position::new(15, 5), [1, 2]);
        assert!(!done);
        assert!(grid.get(9, 5).is_hallway());
        assert_eq!(grid.get(10, 5).room_id, 7);
        assert!(grid.get(11, 5).is_wall());
    }

    #[test]
    fn test_carve_segment_keeps_border() {
        let mut grid = Grid::new(0);
        assert!(carve_segment(&mut grid, Position::new(0, 3), Position::new(4, 3), [0, 0]));
        assert!(grid.get(0, 3).impassable);
        assert!(grid.get(1, 3).is_hallway());
    }

    #[test]
    fn test_carved_hallways_join_rooms() {
        let mut rng = GameRng::new(3);
        let mut grid = Grid::new(0);
        let mut cells = CellGrid::from_topology(&Structure::Line.topology());
        carve_cells(&mut grid, &mut cells, &FloorParams::default(), &mut rng);
        carve_hallways(&mut grid, &cells, &mut rng);

        // flood fill from the first room reaches the last
        let start = cells.cell((0, 0)).room.random_point(&mut rng);
        let goal = cells.cell((4, 0)).room.random_point(&mut rng);
        let mut seen = std::collections::BTreeSet::from([start]);
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            for next in pos.cardinal_neighbors() {
                if grid.at(next).is_ground() && seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        assert!(seen.contains(&goal));
    }

    #[test]
    fn test_rescue_joins_isolated_room() {
        let mut rng = GameRng::new(4);
        let mut grid = Grid::new(0);
        let mut cells = CellGrid::new(3, 1);
        for coord in cells.coords().collect::<Vec<_>>() {
            let cell = cells.cell_mut(coord);
            cell.valid = true;
            cell.is_room = coord.0 != 1;
        }
        carve_cells(&mut grid, &mut cells, &FloorParams::default(), &mut rng);
        cells.connect((0, 0), Direction::East);
        carve_hallways(&mut grid, &cells, &mut rng);
        assert!(!cells.is_strongly_connected());

        let rescued = rescue_isolated(&mut grid, &mut cells, &mut rng);
        assert_eq!(rescued, 1);
        assert!(cells.is_strongly_connected());
    }

    #[test]
    fn test_rescue_drops_orphan_anchor() {
        let mut rng = GameRng::new(8);
        let mut grid = Grid::new(0);
        let mut cells = CellGrid::new(3, 1);
        for coord in cells.coords().collect::<Vec<_>>() {
            let cell = cells.cell_mut(coord);
            cell.valid = true;
            cell.is_room = coord.0 != 2;
        }
        carve_cells(&mut grid, &mut cells, &FloorParams::default(), &mut rng);
        let anchor = cells.cell((2, 0)).anchor;
        cells.connect((0, 0), Direction::East);

        assert_eq!(rescue_isolated(&mut grid, &mut cells, &mut rng), 0);
        assert!(!cells.cell((2, 0)).valid);
        assert!(grid.at(anchor).is_wall());
        assert!(cells.is_strongly_connected());
    }
}
