//! Macro grid cells
//!
//! The floor is cut into a coarse grid of cells. Each cell holds at most one
//! room or one hallway anchor, and cells are joined by cardinal connections
//! that later become carved hallways.

use std::collections::VecDeque;

use super::structure::{CellRole, Topology};
use super::{Direction, DirectionSet, Position, Rect};
use crate::{FLOOR_HEIGHT, FLOOR_WIDTH};

/// Coordinates of a cell in the macro grid
pub type CellCoord = (usize, usize);

/// Generation-time record for one macro cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Takes part in the layout
    pub valid: bool,
    pub is_room: bool,
    /// Usable tiles of the cell, gap to the neighbours excluded
    pub region: Rect,
    /// The room's own rectangle (never the merged one)
    pub room: Rect,
    /// Hallway junction for non-room cells
    pub anchor: Position,
    /// Current room id, updated when the room is merged
    pub room_id: u32,
    pub connected: bool,
    pub merged: bool,
    /// Rolled per room and kept for later terrain variation
    pub imperfect: bool,
    /// Wall ring around the room is painted secondary
    pub secondary: bool,
    connections: DirectionSet,
}

impl Cell {
    pub fn connections(&self) -> DirectionSet {
        self.connections
    }

    pub fn is_connected_towards(&self, dir: Direction) -> bool {
        self.connections.has(dir)
    }

    /// Anchor cell: valid, not a room
    pub fn is_anchor(&self) -> bool {
        self.valid && !self.is_room
    }

    /// Room id allowed on a hallway leaving this cell (0 for anchors)
    pub fn hallway_owner(&self) -> u32 {
        if self.is_room { self.room_id } else { 0 }
    }
}

/// The macro grid of cells plus the cut points it was built from
#[derive(Debug, Clone)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    /// x cut points, `cols + 1` entries
    xs: Vec<i32>,
    /// y cut points, `rows + 1` entries
    ys: Vec<i32>,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Cut the floor into `cols × rows` cells; all start invalid
    pub fn new(cols: usize, rows: usize) -> Self {
        let xs: Vec<i32> = (0..=cols).map(|i| (i * FLOOR_WIDTH / cols) as i32).collect();
        let ys: Vec<i32> = (0..=rows).map(|j| (j * FLOOR_HEIGHT / rows) as i32).collect();
        let mut cells = Vec::with_capacity(cols * rows);
        for gy in 0..rows {
            for gx in 0..cols {
                let region = Rect::new(xs[gx] + 1, ys[gy] + 1, xs[gx + 1] - 2, ys[gy + 1] - 2);
                cells.push(Cell {
                    region,
                    ..Cell::default()
                });
            }
        }
        Self {
            cols,
            rows,
            xs,
            ys,
            cells,
        }
    }

    /// Build the grid for a structure's topology and apply its pre-wiring
    pub fn from_topology(topo: &Topology) -> Self {
        let mut grid = Self::new(topo.cols, topo.rows);
        for gy in 0..topo.rows {
            for gx in 0..topo.cols {
                let role = topo.role(gx, gy);
                let cell = grid.cell_mut((gx, gy));
                cell.valid = role != CellRole::Invalid;
                cell.is_room = role == CellRole::Room;
            }
        }
        for &(gx, gy, dir) in &topo.links {
            grid.connect((gx, gy), dir);
        }
        grid
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, (gx, gy): CellCoord) -> usize {
        gy * self.cols + gx
    }

    pub fn cell(&self, coord: CellCoord) -> &Cell {
        &self.cells[self.index(coord)]
    }

    pub fn cell_mut(&mut self, coord: CellCoord) -> &mut Cell {
        let i = self.index(coord);
        &mut self.cells[i]
    }

    /// All coordinates, row by row
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |gy| (0..cols).map(move |gx| (gx, gy)))
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        self.coords().map(|coord| (coord, self.cell(coord)))
    }

    /// Coordinates of valid cells
    pub fn valid_coords(&self) -> Vec<CellCoord> {
        self.coords().filter(|c| self.cell(*c).valid).collect()
    }

    /// Coordinates of valid room cells
    pub fn room_coords(&self) -> Vec<CellCoord> {
        self.coords()
            .filter(|c| {
                let cell = self.cell(*c);
                cell.valid && cell.is_room
            })
            .collect()
    }

    /// In-grid neighbour in a cardinal direction
    pub fn neighbor(&self, (gx, gy): CellCoord, dir: Direction) -> Option<CellCoord> {
        if !dir.is_cardinal() {
            return None;
        }
        let (dx, dy) = dir.delta();
        let nx = gx as i64 + dx as i64;
        let ny = gy as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx >= self.cols as i64 || ny >= self.rows as i64 {
            return None;
        }
        Some((nx as usize, ny as usize))
    }

    /// Join two neighbouring valid cells in both directions.
    ///
    /// Returns the neighbour on success. This is the only place connection
    /// sets change, so they stay reciprocal.
    pub fn connect(&mut self, from: CellCoord, dir: Direction) -> Option<CellCoord> {
        let to = self.neighbor(from, dir)?;
        if !self.cell(from).valid || !self.cell(to).valid {
            return None;
        }
        let a = self.cell_mut(from);
        a.connections.insert(dir.into());
        a.connected = true;
        let b = self.cell_mut(to);
        b.connections.insert(dir.flip().into());
        b.connected = true;
        Some(to)
    }

    /// Cardinal directions towards valid neighbours not yet joined to this cell
    pub fn open_directions(&self, coord: CellCoord) -> DirectionSet {
        let cell = self.cell(coord);
        DirectionSet::from_slice(&Direction::CARDINALS).filtered(|dir| {
            !cell.connections.has(dir)
                && self
                    .neighbor(coord, dir)
                    .is_some_and(|n| self.cell(n).valid)
        })
    }

    /// Connected neighbours of a cell
    pub fn linked(&self, coord: CellCoord) -> Vec<CellCoord> {
        self.cell(coord)
            .connections
            .directions()
            .filter_map(|dir| self.neighbor(coord, dir))
            .collect()
    }

    /// Cells reachable from `start` through connections, `start` included
    pub fn reachable_from(&self, start: CellCoord) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        let mut stack = vec![start];
        seen[self.index(start)] = true;
        while let Some(coord) = stack.pop() {
            for next in self.linked(coord) {
                let i = self.index(next);
                if !seen[i] {
                    seen[i] = true;
                    stack.push(next);
                }
            }
        }
        seen
    }

    /// Every valid cell is reachable from every other valid cell
    pub fn is_strongly_connected(&self) -> bool {
        let valid = self.valid_coords();
        let Some(&start) = valid.first() else {
            return false;
        };
        let seen = self.reachable_from(start);
        valid.iter().all(|c| seen[self.index(*c)])
    }

    /// Shortest chain of valid cells from `start` to any cell marked in
    /// `targets`, endpoints included
    pub fn path_to_any(&self, start: CellCoord, targets: &[bool]) -> Option<Vec<CellCoord>> {
        let mut came_from: Vec<Option<CellCoord>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([start]);
        seen[self.index(start)] = true;
        while let Some(coord) = queue.pop_front() {
            if targets[self.index(coord)] {
                let mut path = vec![coord];
                let mut cur = coord;
                while let Some(prev) = came_from[self.index(cur)] {
                    path.push(prev);
                    cur = prev;
                }
                path.reverse();
                return Some(path);
            }
            for dir in Direction::CARDINALS {
                let Some(next) = self.neighbor(coord, dir) else {
                    continue;
                };
                let i = self.index(next);
                if !seen[i] && self.cell(next).valid {
                    seen[i] = true;
                    came_from[i] = Some(coord);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Membership flag vector indexed like the cells
    pub fn is_marked(&self, flags: &[bool], coord: CellCoord) -> bool {
        flags[self.index(coord)]
    }

    /// Tile column used as the vertical lane between `gx` and `gx + 1`,
    /// picked from the two gap columns
    pub fn lane_x(&self, gx: usize, offset: u32) -> i32 {
        self.xs[gx + 1] - 1 + offset.min(1) as i32
    }

    /// Tile row used as the horizontal lane between `gy` and `gy + 1`
    pub fn lane_y(&self, gy: usize, offset: u32) -> i32 {
        self.ys[gy + 1] - 1 + offset.min(1) as i32
    }
}
