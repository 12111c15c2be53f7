//! Per-floor generation parameters

use serde::{Deserialize, Serialize};

use super::Structure;
use crate::error::ParamsError;
use crate::{DEFAULT_MAX_ATTEMPTS, MAX_DENSITY};

/// Tunables for one floor
///
/// Every field has a default, so a partial config only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorParams {
    pub structure: Structure,
    pub tileset: u16,

    /// Rooms placed on generic structures
    pub room_density: u32,
    /// Random-walk steps over the macro grid
    pub floor_connectivity: u32,
    /// Allow single-connection hallway junctions to remain
    pub dead_ends: bool,

    pub item_density: u32,
    pub trap_density: u32,
    pub buried_item_density: u32,
    pub extra_hallway_density: u32,
    /// Blob lakes; any nonzero value also enables rivers
    pub water_density: u32,
    pub max_coin_amount: u32,

    pub imperfect_percentage: u32,
    pub secondary_percentage: u32,
    pub shop_percentage: u32,
    /// Accepted for config compatibility, never consumed
    pub monster_house_percentage: u32,
    /// Chance for each connected room pair to merge
    pub merge_percentage: u32,

    /// Attempts before `build` gives up
    pub max_attempts: u32,
}

impl Default for FloorParams {
    fn default() -> Self {
        Self {
            structure: Structure::Standard,
            tileset: 0,
            room_density: 6,
            floor_connectivity: 15,
            dead_ends: false,
            item_density: 3,
            trap_density: 3,
            buried_item_density: 2,
            extra_hallway_density: 2,
            water_density: 1,
            max_coin_amount: 100,
            imperfect_percentage: 0,
            secondary_percentage: 0,
            shop_percentage: 0,
            monster_house_percentage: 0,
            merge_percentage: 5,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl FloorParams {
    /// Parameters for a given structure, everything else default
    pub fn with_structure(structure: Structure) -> Self {
        Self {
            structure,
            ..Self::default()
        }
    }

    /// Check generator preconditions
    pub fn validate(&self) -> Result<(), ParamsError> {
        let percentages = [
            ("imperfect_percentage", self.imperfect_percentage),
            ("secondary_percentage", self.secondary_percentage),
            ("shop_percentage", self.shop_percentage),
            ("monster_house_percentage", self.monster_house_percentage),
            ("merge_percentage", self.merge_percentage),
        ];
        for (field, value) in percentages {
            if value > 100 {
                return Err(ParamsError::PercentageOutOfRange { field, value });
            }
        }

        let densities = [
            ("room_density", self.room_density),
            ("item_density", self.item_density),
            ("trap_density", self.trap_density),
            ("buried_item_density", self.buried_item_density),
            ("extra_hallway_density", self.extra_hallway_density),
            ("water_density", self.water_density),
        ];
        for (field, value) in densities {
            if value > MAX_DENSITY {
                return Err(ParamsError::DensityTooHigh {
                    field,
                    value,
                    max: MAX_DENSITY,
                });
            }
        }

        if self.structure.is_generic() && self.floor_connectivity == 0 {
            return Err(ParamsError::NoConnectivity {
                structure: self.structure,
            });
        }
        if self.max_attempts == 0 {
            return Err(ParamsError::NoAttempts);
        }
        Ok(())
    }
}
