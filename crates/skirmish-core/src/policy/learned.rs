//! Learned action selection.

use qtable::{PolicyTable, StateIndex};
use rand::Rng;

use super::Action;

/// Maps the table's epsilon-greedy column choice onto an [`Action`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnedPolicy;

impl LearnedPolicy {
    /// Chooses an action for `state`.
    ///
    /// The table is built with one column per action, so the column is
    /// always a valid action; anything else falls back to the greedy
    /// default of the first column.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        table: &PolicyTable,
        state: StateIndex,
        rng: &mut R,
    ) -> Action {
        Action::from_id(table.select_action(state, rng)).unwrap_or(Action::MoveLeft)
    }
}
