//! Learning hyperparameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a [`LearningConfig`] is unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Learning rate must lie in `(0, 1]`.
    #[error("learning rate {0} must be in (0, 1]")]
    LearningRate(f64),
    /// Discount factor must lie in `[0, 1]`.
    #[error("discount factor {0} must be in [0, 1]")]
    Discount(f64),
    /// Exploration rate must lie in `[0, 1]`.
    #[error("exploration rate {0} must be in [0, 1]")]
    Exploration(f64),
    /// A table needs at least one action.
    #[error("action count must be non-zero")]
    NoActions,
}

/// Hyperparameters of the one-step Q-learning rule.
///
/// The defaults are γ = 0.9, α = 0.1, ε = 0.1 over 5 actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Discount factor γ applied to the best next-state value.
    pub discount: f64,
    /// Learning rate α.
    pub learning_rate: f64,
    /// Probability ε of taking a uniformly random action.
    pub exploration: f64,
    /// Number of discrete actions per state.
    pub action_count: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            learning_rate: 0.1,
            exploration: 0.1,
            action_count: 5,
        }
    }
}

impl LearningConfig {
    /// Copy of this config with a different exploration rate.
    #[must_use]
    pub fn with_exploration(self, exploration: f64) -> Self {
        Self {
            exploration,
            ..self
        }
    }

    /// Checks every hyperparameter against its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range parameter. NaN fails every check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(ConfigError::Discount(self.discount));
        }
        if !(0.0..=1.0).contains(&self.exploration) {
            return Err(ConfigError::Exploration(self.exploration));
        }
        if self.action_count == 0 {
            return Err(ConfigError::NoActions);
        }
        Ok(())
    }
}
