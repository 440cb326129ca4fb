//! Sparse action-value table.
//!
//! Rows live in a `BTreeMap` keyed by state index, so iteration order is the
//! ascending state order on every platform. A missing row is an all-zero row.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::trace;

use crate::config::{ConfigError, LearningConfig};

/// Row key of a [`PolicyTable`].
pub type StateIndex = usize;

/// Index of the largest value, ties going to the lowest index.
///
/// Returns 0 for an empty slice.
///
/// # Example
///
/// ```
/// assert_eq!(qtable::argmax(&[0.0, 0.0, 0.0]), 0);
/// assert_eq!(qtable::argmax(&[1.0, 3.0, 3.0]), 1);
/// ```
#[must_use]
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Tabular action-value store with epsilon-greedy selection.
///
/// # Example
///
/// ```
/// use qtable::{LearningConfig, PolicyTable};
///
/// let mut table = PolicyTable::new(LearningConfig::default()).unwrap();
/// assert_eq!(table.greedy(3), 0);
///
/// table.update(3, 4, 10.0, 3);
/// assert_eq!(table.greedy(3), 4);
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    config: LearningConfig,
    rows: BTreeMap<StateIndex, Box<[f64]>>,
    /// Returned for states that were never updated.
    zero_row: Box<[f64]>,
}

impl PolicyTable {
    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the hyperparameters are out of range.
    pub fn new(config: LearningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            zero_row: vec![0.0; config.action_count].into_boxed_slice(),
            rows: BTreeMap::new(),
            config,
        })
    }

    /// Hyperparameters this table learns with.
    #[must_use]
    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Number of actions per row.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.config.action_count
    }

    /// The action-value row for `state`.
    #[must_use]
    pub fn values(&self, state: StateIndex) -> &[f64] {
        self.rows.get(&state).map_or(&self.zero_row, |row| row)
    }

    /// A single action value; out-of-range actions read as 0.
    #[must_use]
    pub fn value(&self, state: StateIndex, action: usize) -> f64 {
        self.values(state).get(action).copied().unwrap_or(0.0)
    }

    /// Best value available from `state`.
    #[must_use]
    pub fn max_value(&self, state: StateIndex) -> f64 {
        let row = self.values(state);
        row[argmax(row)]
    }

    /// Greedy action for `state` (lowest id wins ties).
    #[must_use]
    pub fn greedy(&self, state: StateIndex) -> usize {
        argmax(self.values(state))
    }

    /// Epsilon-greedy action selection.
    ///
    /// One uniform draw in `[0, 1)` is always taken; below ε a second draw
    /// picks a uniformly random action, otherwise the greedy action is used.
    pub fn select_action<R: Rng + ?Sized>(&self, state: StateIndex, rng: &mut R) -> usize {
        let roll: f64 = rng.gen();
        if roll < self.config.exploration {
            rng.gen_range(0..self.config.action_count)
        } else {
            self.greedy(state)
        }
    }

    /// Applies the one-step Q-learning update and returns the TD error.
    ///
    /// The bootstrap term reads `next_state` before the cell is written, so
    /// a self-loop (`state == next_state`) uses the prior row.
    ///
    /// # Panics
    ///
    /// Panics if `action >= action_count`.
    pub fn update(
        &mut self,
        state: StateIndex,
        action: usize,
        reward: f64,
        next_state: StateIndex,
    ) -> f64 {
        assert!(
            action < self.config.action_count,
            "action {action} out of range for {} actions",
            self.config.action_count
        );
        debug_assert!(reward.is_finite(), "non-finite reward {reward}");

        let target = reward + self.config.discount * self.max_value(next_state);
        let alpha = self.config.learning_rate;
        let zero_row = &self.zero_row;
        let row = self.rows.entry(state).or_insert_with(|| zero_row.clone());

        let td_error = target - row[action];
        row[action] += alpha * td_error;

        trace!(state, action, reward, td_error, "q update");
        td_error
    }

    /// Number of materialized rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no state has been updated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// States that have a materialized row, ascending.
    pub fn visited_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.rows.keys().copied()
    }

    /// All materialized rows in ascending state order.
    pub fn iter(&self) -> impl Iterator<Item = (StateIndex, &[f64])> + '_ {
        self.rows.iter().map(|(state, row)| (*state, &row[..]))
    }
}
