//! Inclusive tile rectangles used for cell regions and room bounds

use serde::{Deserialize, Serialize};

use super::Position;
use crate::rng::GameRng;

/// A rectangle of tiles, both corners inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left x coordinate
    pub lx: i32,
    /// Top y coordinate
    pub ly: i32,
    /// Right x coordinate
    pub hx: i32,
    /// Bottom y coordinate
    pub hy: i32,
}

impl Rect {
    pub const fn new(lx: i32, ly: i32, hx: i32, hy: i32) -> Self {
        Self { lx, ly, hx, hy }
    }

    /// Get the width of the rectangle
    pub const fn width(&self) -> i32 {
        if self.hx >= self.lx {
            self.hx - self.lx + 1
        } else {
            0
        }
    }

    /// Get the height of the rectangle
    pub const fn height(&self) -> i32 {
        if self.hy >= self.ly {
            self.hy - self.ly + 1
        } else {
            0
        }
    }

    /// Check if the rectangle is valid (has positive area)
    pub const fn is_valid(&self) -> bool {
        self.hx >= self.lx && self.hy >= self.ly
    }

    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.lx && pos.x <= self.hx && pos.y >= self.ly && pos.y <= self.hy
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            lx: self.lx.min(other.lx),
            ly: self.ly.min(other.ly),
            hx: self.hx.max(other.hx),
            hy: self.hy.max(other.hy),
        }
    }

    /// Shrink every side by `margin`; None if nothing is left
    pub fn shrunk(&self, margin: i32) -> Option<Rect> {
        let inner = Rect::new(
            self.lx + margin,
            self.ly + margin,
            self.hx - margin,
            self.hy - margin,
        );
        inner.is_valid().then_some(inner)
    }

    /// Grow every side by `margin`
    pub fn expanded(&self, margin: i32) -> Rect {
        Rect::new(
            self.lx - margin,
            self.ly - margin,
            self.hx + margin,
            self.hy + margin,
        )
    }

    /// A uniformly random tile inside the rectangle
    pub fn random_point(&self, rng: &mut GameRng) -> Position {
        Position::new(rng.range(self.lx, self.hx), rng.range(self.ly, self.hy))
    }

    /// Every tile, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.ly..=self.hy).flat_map(move |y| (self.lx..=self.hx).map(move |x| Position::new(x, y)))
    }
}
