//! Error types for the combat simulation.
//!
//! Only construction problems and broken invariants are errors. Cooldowns,
//! degenerate aims, projectiles leaving the arena and defeated entities are
//! normal outcomes reported through [`TickResult`](crate::output::TickResult).

use glam::Vec2;
use thiserror::Error;

use crate::entity::EntityId;

/// Invalid simulation configuration, raised at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Arena width or height is zero.
    #[error("arena dimensions must be positive, got {width}x{height}")]
    ArenaSize {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },

    /// An extent does not fit inside the arena or is not positive.
    #[error("{what} extent {extent} must be positive and fit a {width}x{height} arena")]
    Extent {
        /// Which body the extent belongs to.
        what: &'static str,
        /// The offending extent.
        extent: Vec2,
        /// Arena width.
        width: u32,
        /// Arena height.
        height: u32,
    },

    /// A speed is zero, negative or not finite.
    #[error("{what} speed must be positive and finite, got {speed}")]
    Speed {
        /// Which body the speed belongs to.
        what: &'static str,
        /// The offending speed.
        speed: f32,
    },

    /// Fire cooldown is negative or not finite.
    #[error("fire cooldown must be non-negative and finite, got {0}")]
    Cooldown(f64),

    /// A spawn point lies outside the arena.
    #[error("spawn point {spawn} for entity {entity} lies outside the arena")]
    Spawn {
        /// Entity whose spawn is invalid.
        entity: EntityId,
        /// The offending spawn center.
        spawn: Vec2,
    },

    /// Reward or dodge margin is negative or not finite.
    #[error("{what} must be non-negative and finite, got {value}")]
    Scalar {
        /// Which parameter is invalid.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The policy table width does not match the action set.
    #[error("learning config has {found} actions, the duel uses {expected}")]
    ActionCount {
        /// Columns the duel needs.
        expected: usize,
        /// Columns configured.
        found: usize,
    },

    /// Learning hyperparameters are out of range.
    #[error("learning config: {0}")]
    Learning(#[from] qtable::ConfigError),
}

/// Errors raised while stepping a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The configuration could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// An entity position produced a state index outside `[0, W*H)`.
    ///
    /// This aborts the run before any policy table is updated.
    #[error("entity {entity} at {position} has no valid state index")]
    StateIndexOutOfRange {
        /// Entity whose position is invalid.
        entity: EntityId,
        /// The position that failed to encode.
        position: Vec2,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learning_errors_convert() {
        let err: ConfigError = qtable::ConfigError::NoActions.into();
        assert!(matches!(err, ConfigError::Learning(_)));

        let sim: SimError = err.into();
        assert!(sim.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn out_of_range_message_names_entity() {
        let err = SimError::StateIndexOutOfRange {
            entity: EntityId::SECOND,
            position: Vec2::new(f32::NAN, 0.0),
        };
        assert!(err.to_string().contains("entity 1"));
    }
}
