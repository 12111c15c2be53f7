//! dg-core: procedural floor generation for a tile-based dungeon crawler
//!
//! Turns a compact set of floor parameters into a fully connected 56×32
//! grid of rooms, hallways, secondary terrain and spawn points. The crate
//! does no I/O; randomness comes from the `GameRng` handed to the builder.

pub mod dungeon;

mod consts;
mod error;
mod rng;

pub use consts::*;
pub use dungeon::{FloorBuilder, FloorParams, Grid, Structure};
pub use error::{GenerationError, ParamsError};
pub use rng::GameRng;
