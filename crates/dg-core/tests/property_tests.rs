//! Property-based tests using proptest
//!
//! Invariants that must hold for every seed and structure:
//! - every spawn tile reaches every other spawn tile over ground
//! - each room id covers one connected patch of tiles
//! - the outer ring stays impassable wall
//! - reads off the map always give the border sentinel
//! - stairs, player, items and traps never share a tile
//! - a seed always yields the same floor

use std::collections::{BTreeMap, BTreeSet};

use dg_core::dungeon::{Floor, FloorBuilder, FloorParams, Grid, Item, Position, Structure, Tile};
use dg_core::{GameRng, FLOOR_HEIGHT, FLOOR_WIDTH};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn structures() -> impl Strategy<Value = Structure> {
    prop::sample::select(Structure::iter().collect::<Vec<_>>())
}

fn params_for(structure: Structure, water: u32, merge: u32, shop: u32) -> FloorParams {
    FloorParams {
        structure,
        water_density: water,
        merge_percentage: merge,
        shop_percentage: shop,
        secondary_percentage: 20,
        ..FloorParams::default()
    }
}

fn build(params: FloorParams, seed: u64) -> Floor {
    FloorBuilder::new(params, GameRng::new(seed))
        .build_floor()
        .unwrap_or_else(|err| panic!("seed {seed}: {err}"))
}

/// Ground tiles reachable from `start` through cardinal steps
fn flood(grid: &Grid, start: Position) -> BTreeSet<Position> {
    let mut seen = BTreeSet::from([start]);
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        for next in pos.cardinal_neighbors() {
            if grid.at(next).is_ground() && seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_spawn_tiles_are_connected(
        seed in any::<u64>(),
        structure in structures(),
        water in 0u32..=4,
        merge in 0u32..=100,
    ) {
        let floor = build(params_for(structure, water, merge, 50), seed);
        let spawns = floor.grid.spawn_candidates();
        prop_assert!(!spawns.is_empty());
        let reached = flood(&floor.grid, spawns[0]);
        for pos in &spawns {
            prop_assert!(reached.contains(pos), "{} seed {}: {:?} cut off", structure, seed, pos);
        }
    }

    #[test]
    fn prop_rooms_are_single_patches(
        seed in any::<u64>(),
        structure in structures(),
        merge in 0u32..=100,
    ) {
        let floor = build(params_for(structure, 1, merge, 0), seed);
        let grid = &floor.grid;

        let mut by_id: BTreeMap<u32, Vec<Position>> = BTreeMap::new();
        for pos in grid.positions() {
            let tile = grid.at(pos);
            if tile.is_room() {
                by_id.entry(tile.room_id).or_default().push(pos);
            }
        }
        for (id, tiles) in &by_id {
            let start = tiles[0];
            let mut seen = BTreeSet::from([start]);
            let mut stack = vec![start];
            while let Some(pos) = stack.pop() {
                for next in pos.cardinal_neighbors() {
                    if grid.at(next).is_room() && grid.at(next).room_id == *id && seen.insert(next) {
                        stack.push(next);
                    }
                }
            }
            prop_assert_eq!(seen.len(), tiles.len(), "room {} is split", id);
        }
    }

    #[test]
    fn prop_rim_is_intact(seed in any::<u64>(), structure in structures(), water in 0u32..=6) {
        let floor = build(params_for(structure, water, 5, 0), seed);
        for pos in floor.grid.positions() {
            let tile = floor.grid.at(pos);
            if pos.in_interior() {
                prop_assert!(!tile.impassable);
            } else {
                prop_assert!(tile.impassable && tile.is_wall());
                prop_assert!(tile.item.is_none() && tile.trap.is_none());
            }
        }
    }

    #[test]
    fn prop_off_map_reads_are_sentinel(
        seed in any::<u64>(),
        x in -100i32..200,
        y in -100i32..200,
    ) {
        let floor = build(FloorParams::default(), seed);
        let inside = (0..FLOOR_WIDTH as i32).contains(&x) && (0..FLOOR_HEIGHT as i32).contains(&y);
        if !inside {
            prop_assert_eq!(*floor.grid.get(x, y), Tile::border());
        }
        // writing off the map changes nothing, including the sentinel
        let mut grid = floor.grid.clone();
        grid.set(-1, y, Tile::room(1));
        prop_assert!(grid.get_mut(-1, y).is_none());
        prop_assert_eq!(&grid, &floor.grid);
        prop_assert_eq!(*grid.get(-1, y), Tile::border());
    }

    #[test]
    fn prop_spawns_are_exclusive(
        seed in any::<u64>(),
        structure in structures(),
        items in 0u32..=12,
        traps in 0u32..=12,
    ) {
        let params = FloorParams {
            item_density: items,
            trap_density: traps,
            max_coin_amount: 50,
            ..params_for(structure, 1, 5, 30)
        };
        let floor = build(params, seed);
        let grid = &floor.grid;
        let stairs = grid.stairs_position();
        let player = grid.player_spawn_position();

        prop_assert_ne!(stairs, player);
        for pos in [stairs, player] {
            let tile = grid.at(pos);
            prop_assert!(tile.is_room() && tile.can_spawn && !tile.is_shop);
            prop_assert!(tile.item.is_none() && tile.trap.is_none());
        }
        for pos in grid.positions() {
            let tile = grid.at(pos);
            prop_assert!(!(tile.item.is_some() && tile.trap.is_some()));
            match tile.item {
                Some(Item::Buried) => prop_assert!(!tile.is_ground() && pos.in_interior()),
                Some(Item::Coins(amount)) => prop_assert!((1..=50).contains(&amount)),
                Some(Item::Loot) => prop_assert!(tile.can_spawn),
                None => {}
            }
            if tile.trap.is_some() {
                prop_assert!(tile.can_spawn);
            }
        }
    }

    #[test]
    fn prop_seed_is_deterministic(seed in any::<u64>(), structure in structures()) {
        let params = params_for(structure, 2, 20, 40);
        let a = build(params.clone(), seed);
        let b = build(params, seed);
        prop_assert_eq!(a.grid, b.grid);
        prop_assert_eq!(a.report, b.report);
    }
}
