//! Axis-aligned bounding boxes in the 2D playfield
//!
//! Everything collidable is reduced to one or more of these. Overlap tests
//! are strict, so boxes that merely touch do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of the given size centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounding box of a square of side `side` rotated by `angle` radians
    pub fn of_rotated_square(center: Vec2, side: f32, angle: f32) -> Self {
        let half = side / 2.0 * (angle.cos().abs() + angle.sin().abs());
        Self::from_center(center, Vec2::splat(half * 2.0))
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict overlap on the x axis
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    /// Strict overlap on the y axis
    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.min.y < other.max.y && self.max.y > other.min.y
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}
