//! Floor generation
//!
//! `FloorBuilder` runs the whole pipeline on a fresh grid and retries the
//! attempt when the macro connection graph comes out broken. Every attempt
//! draws from the same RNG stream, so a retry is a new layout rather than a
//! replay of the failed one.

use tracing::{debug, info, warn};

use super::cell::CellGrid;
use super::corridor::{carve_hallways, random_walk, remove_dead_ends, rescue_isolated};
use super::extra_hallway::carve_extra_hallways;
use super::merge::merge_rooms;
use super::room::{assign_rooms, carve_cells};
use super::shop::place_shop;
use super::spawn::place_spawns;
use super::water::place_secondary_terrain;
use super::{FloorParams, Grid, Topology};
use crate::error::GenerationError;
use crate::rng::GameRng;

/// Counters gathered while building one floor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Attempts used, the successful one included
    pub attempts: u32,
    pub rooms: u32,
    pub merges: u32,
    /// Rooms joined by the isolated-room rescue
    pub rescued: u32,
    pub extra_hallway_tiles: u32,
    pub secondary_tiles: u32,
    pub has_shop: bool,
}

/// A finished floor together with the macro layout it was built from
#[derive(Debug, Clone)]
pub struct Floor {
    pub grid: Grid,
    pub cells: CellGrid,
    pub report: BuildReport,
}

/// Why a single attempt was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptFailure {
    Disconnected,
}

/// Builds floors from a parameter set and an RNG
#[derive(Debug)]
pub struct FloorBuilder {
    params: FloorParams,
    rng: GameRng,
}

impl FloorBuilder {
    pub fn new(params: FloorParams, rng: GameRng) -> Self {
        Self { params, rng }
    }

    pub fn params(&self) -> &FloorParams {
        &self.params
    }

    /// Generate one floor
    pub fn build(&mut self) -> Result<Grid, GenerationError> {
        Ok(self.build_floor()?.grid)
    }

    /// Generate one floor and keep the macro layout and counters
    pub fn build_floor(&mut self) -> Result<Floor, GenerationError> {
        let topology = self.params.structure.topology();
        self.build_from_topology(&topology)
    }

    /// Retry loop over an explicit macro layout
    pub(crate) fn build_from_topology(
        &mut self,
        topology: &Topology,
    ) -> Result<Floor, GenerationError> {
        self.params.validate()?;

        for attempt in 1..=self.params.max_attempts {
            match self.attempt(topology)? {
                Ok(mut floor) => {
                    floor.report.attempts = attempt;
                    info!(
                        structure = %self.params.structure,
                        seed = self.rng.seed(),
                        attempt,
                        rooms = floor.report.rooms,
                        rescued = floor.report.rescued,
                        "generated floor"
                    );
                    return Ok(floor);
                }
                Err(failure) => {
                    warn!(attempt, ?failure, "discarding floor attempt");
                }
            }
        }
        Err(GenerationError::Exhausted {
            attempts: self.params.max_attempts,
        })
    }

    /// One full pass of the pipeline on a fresh grid.
    ///
    /// The outer error is fatal, the inner one asks for a retry.
    fn attempt(
        &mut self,
        topology: &Topology,
    ) -> Result<Result<Floor, AttemptFailure>, GenerationError> {
        let params = &self.params;
        let rng = &mut self.rng;

        let mut grid = Grid::new(params.tileset);
        let mut cells = CellGrid::from_topology(topology);
        let mut report = BuildReport::default();

        if params.structure.is_generic() {
            assign_rooms(&mut cells, params.room_density, rng);
        }
        report.rooms = carve_cells(&mut grid, &mut cells, params, rng);

        if params.structure.is_generic() {
            random_walk(&mut cells, params.floor_connectivity, rng);
        }
        if !params.dead_ends {
            let added = remove_dead_ends(&mut cells, rng);
            debug!(added, "extended dead ends");
        }

        let hallways = carve_hallways(&mut grid, &cells, rng);
        debug!(hallways, "carved hallways");

        report.merges = merge_rooms(
            &mut grid,
            &mut cells,
            &topology.forced_merges,
            params.merge_percentage,
            rng,
        );
        report.rescued = rescue_isolated(&mut grid, &mut cells, rng);

        report.has_shop = place_shop(&mut grid, &cells, params.shop_percentage, rng).is_some();
        report.extra_hallway_tiles =
            carve_extra_hallways(&mut grid, &cells, params.extra_hallway_density, rng);
        report.secondary_tiles =
            place_secondary_terrain(&mut grid, &cells, params.water_density, rng);

        place_spawns(&mut grid, params, rng)?;

        if !cells.is_strongly_connected() {
            return Ok(Err(AttemptFailure::Disconnected));
        }

        grid.compute_room_exits();
        grid.compute_neighbor_masks();
        Ok(Ok(Floor {
            grid,
            cells,
            report,
        }))
    }
}
