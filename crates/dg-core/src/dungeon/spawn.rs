//! Spawn placement: stairs, items, buried items, traps and the player

use std::collections::BTreeSet;

use tracing::debug;

use super::{FloorParams, Grid, Item, Position, Trap, TrapKind};
use crate::error::GenerationError;
use crate::rng::GameRng;
use crate::SPAWN_COUNT_SPREAD;

/// Re-draws tried before falling back to scanning the free tiles
const MAX_REDRAWS: u32 = 16;

/// Tracks tiles already used so every placement lands somewhere new
struct Picker {
    taken: BTreeSet<Position>,
}

impl Picker {
    fn new() -> Self {
        Self {
            taken: BTreeSet::new(),
        }
    }

    /// Uniform pick among `pool`, re-drawing on collisions
    fn pick(&mut self, pool: &[Position], rng: &mut GameRng) -> Option<Position> {
        for _ in 0..MAX_REDRAWS {
            let &pos = rng.choose(pool)?;
            if self.taken.insert(pos) {
                return Some(pos);
            }
        }
        let free: Vec<Position> = pool
            .iter()
            .copied()
            .filter(|p| !self.taken.contains(p))
            .collect();
        let &pos = rng.choose(&free)?;
        self.taken.insert(pos);
        Some(pos)
    }

    fn free_in(&self, pool: &[Position]) -> usize {
        pool.iter().filter(|p| !self.taken.contains(p)).count()
    }
}

/// `density ± spread`, at least one when density is nonzero
fn spread_count(density: u32, rng: &mut GameRng) -> u32 {
    if density == 0 {
        return 0;
    }
    let n = density as i32 + rng.range(-SPAWN_COUNT_SPREAD, SPAWN_COUNT_SPREAD);
    n.max(1) as u32
}

/// Interior tiles that can hide a buried item
fn burial_candidates(grid: &Grid) -> Vec<Position> {
    grid.positions()
        .filter(|p| {
            let tile = grid.at(*p);
            p.in_interior() && !tile.impassable && !tile.is_ground()
        })
        .collect()
}

/// Place every spawn on the floor.
///
/// Stairs and player never land in a shop. One shop-free tile is always
/// kept back for the player, so item and trap counts shrink on crowded
/// floors instead of starving it.
pub fn place_spawns(
    grid: &mut Grid,
    params: &FloorParams,
    rng: &mut GameRng,
) -> Result<(), GenerationError> {
    let all = grid.spawn_candidates();
    let safe: Vec<Position> = all
        .iter()
        .copied()
        .filter(|p| !grid.at(*p).is_shop)
        .collect();
    let mut picker = Picker::new();

    let stairs = picker
        .pick(&safe, rng)
        .ok_or(GenerationError::NoSpawnCandidate { what: "stairs" })?;
    grid.stairs_position = stairs;

    let items = spread_count(params.item_density, rng);
    let mut placed_items = 0;
    for _ in 0..items {
        if picker.free_in(&safe) <= 1 {
            break;
        }
        let Some(pos) = picker.pick(&all, rng) else {
            break;
        };
        let item = if params.max_coin_amount > 0 && rng.one_in(3) {
            Item::Coins(rng.rnd(params.max_coin_amount))
        } else {
            Item::Loot
        };
        if let Some(tile) = grid.at_mut(pos) {
            tile.item = Some(item);
        }
        placed_items += 1;
    }

    let buried_pool = burial_candidates(grid);
    let buried = if params.buried_item_density == 0 {
        0
    } else {
        let spread = rng.range(-SPAWN_COUNT_SPREAD, SPAWN_COUNT_SPREAD);
        (params.buried_item_density as i32 + spread).max(0) as u32
    };
    let mut placed_buried = 0;
    for _ in 0..buried {
        let Some(pos) = picker.pick(&buried_pool, rng) else {
            break;
        };
        if let Some(tile) = grid.at_mut(pos) {
            tile.item = Some(Item::Buried);
        }
        placed_buried += 1;
    }

    let traps = rng.range(
        (params.trap_density / 2) as i32,
        params.trap_density as i32,
    );
    let mut placed_traps = 0;
    for _ in 0..traps {
        if picker.free_in(&safe) <= 1 {
            break;
        }
        let Some(pos) = picker.pick(&all, rng) else {
            break;
        };
        let Some(&kind) = rng.choose(&TrapKind::ALL) else {
            break;
        };
        if let Some(tile) = grid.at_mut(pos) {
            tile.trap = Some(Trap::hidden(kind));
        }
        placed_traps += 1;
    }

    let player = picker
        .pick(&safe, rng)
        .ok_or(GenerationError::NoSpawnCandidate { what: "player" })?;
    grid.player_spawn_position = player;

    debug!(
        ?stairs,
        ?player,
        items = placed_items,
        buried = placed_buried,
        traps = placed_traps,
        "placed spawns"
    );
    Ok(())
}
