//! # Qtable
//!
//! Tabular Q-learning substrate for online-adapting agents.
//!
//! A [`PolicyTable`] maps discrete state indices to a row of action values and
//! learns them with the standard one-step update:
//!
//! ```text
//! Q[s,a] += α * (r + γ * max_a' Q[s',a'] − Q[s,a])
//! ```
//!
//! Rows are materialized lazily: an unvisited state reads as an all-zero row,
//! which is exactly what a dense zero-initialized table would return, without
//! allocating one row per possible state up front.
//!
//! ## Quick Start
//!
//! ```
//! use qtable::{LearningConfig, PolicyTable};
//! use rand::SeedableRng;
//!
//! let mut table = PolicyTable::new(LearningConfig::default()).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let action = table.select_action(12, &mut rng);
//! table.update(12, action, 10.0, 13);
//!
//! assert!(table.value(12, action) > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod hash;
pub mod table;

// Re-exports for convenience
pub use config::{ConfigError, LearningConfig};
pub use hash::hash_table;
pub use table::{argmax, PolicyTable, StateIndex};
