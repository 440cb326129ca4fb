//! Arena geometry: bounds clamping, bounding boxes and state encoding.
//!
//! The arena is the rectangle `[0, W] × [0, H]` with y growing downwards.
//! Entities are axis-aligned squares whose `position` is the top-left corner;
//! they are always kept inside `[0, W - extent] × [0, H - extent]`.
//!
//! # State Index
//!
//! A position is discretized to the whole-unit cell containing its top-left
//! corner and encoded row-major:
//!
//! ```text
//! index = clamp(floor(y)) * W + clamp(floor(x))        in [0, W*H)
//! ```
//!
//! # Example
//!
//! ```
//! use skirmish_core::arena::Arena;
//! use glam::Vec2;
//!
//! let arena = Arena::new(800, 600).unwrap();
//! assert_eq!(arena.state_index(Vec2::new(3.0, 2.0)), Some(2 * 800 + 3));
//! assert_eq!(
//!     arena.clamp_to_arena(Vec2::new(790.0, -4.0), Vec2::splat(50.0)),
//!     Vec2::new(750.0, 0.0),
//! );
//! ```

use glam::Vec2;
use qtable::StateIndex;
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;
use crate::error::ConfigError;

// =============================================================================
// Rect
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Rect {
    /// Rect from its top-left corner and size.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Rect from its center and size.
    #[must_use]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::from_min_size(center - size * 0.5, size)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Grows the rect by `amount` in total per axis, keeping the center.
    #[must_use]
    pub fn inflate(&self, amount: Vec2) -> Self {
        let half = amount * 0.5;
        Self {
            min: self.min - half,
            max: self.max + half,
        }
    }

    /// Strict overlap test; rects that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

// =============================================================================
// Arena
// =============================================================================

/// The bounded play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    width: u32,
    height: u32,
}

impl Arena {
    /// Creates an arena of `width × height` units.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ArenaSize`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ArenaSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Arena described by a validated config.
    ///
    /// # Errors
    ///
    /// Same as [`Arena::new`].
    pub fn from_config(config: &ArenaConfig) -> Result<Self, ConfigError> {
        Self::new(config.width, config.height)
    }

    /// Width `W`.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height `H`.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(W, H)` as a vector.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Center of the arena.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// The arena as a rect.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(Vec2::ZERO, self.size())
    }

    /// Number of distinct state indices, `W * H`.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Clamps a top-left position so a body of `extent` stays inside.
    ///
    /// x is clamped into `[0, W - extent.x]` and y into `[0, H - extent.y]`.
    #[must_use]
    pub fn clamp_to_arena(&self, position: Vec2, extent: Vec2) -> Vec2 {
        let upper = (self.size() - extent).max(Vec2::ZERO);
        Vec2::new(
            position.x.clamp(0.0, upper.x),
            position.y.clamp(0.0, upper.y),
        )
    }

    /// True if `rect` has left the arena past any edge.
    #[must_use]
    pub fn is_outside(&self, rect: &Rect) -> bool {
        let size = self.size();
        rect.max.y < 0.0 || rect.min.x > size.x || rect.max.x < 0.0 || rect.min.y > size.y
    }

    /// Row-major state index of the cell holding `position`.
    ///
    /// Returns `None` for non-finite positions or if the encoding falls
    /// outside `[0, W*H)`.
    #[must_use]
    pub fn state_index(&self, position: Vec2) -> Option<StateIndex> {
        if !position.is_finite() {
            return None;
        }
        let x = Self::cell(position.x, self.width);
        let y = Self::cell(position.y, self.height);
        let index = y.checked_mul(self.width as usize)?.checked_add(x)?;
        (index < self.state_count()).then_some(index)
    }

    /// Floors `coord` and clamps it to `[0, limit - 1]`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn cell(coord: f32, limit: u32) -> usize {
        coord.floor().clamp(0.0, (limit - 1) as f32) as usize
    }
}
