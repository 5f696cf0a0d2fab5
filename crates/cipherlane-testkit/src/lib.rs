//! # Cipherlane Testkit
//!
//! Testing utilities for Cipherlane.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a deterministic five-party setup (viewer + four writers)
//!   with helpers to build instances and perform sealed reads
//! - **Generators**: proptest strategies for slots, values and write scripts,
//!   plus a plaintext model of the aggregate
//! - **Golden scenarios**: known write sequences with their expected aggregate
//!
//! ## Golden Scenarios
//!
//! ```rust
//! use cipherlane_testkit::vectors::{all_scenarios, run_scenario};
//!
//! for scenario in all_scenarios() {
//!     assert_eq!(run_scenario(&scenario), scenario.expected);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cipherlane_testkit::generators::{expected_aggregate, write_script};
//!
//! proptest! {
//!     #[test]
//!     fn aggregate_matches_model(script in write_script(16)) {
//!         // apply `script`, read as the viewer, compare with the model
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{FiveParty, Party};
pub use generators::{expected_aggregate, write_script, ScriptedWrite};
pub use vectors::{all_scenarios, run_scenario, GoldenScenario};
