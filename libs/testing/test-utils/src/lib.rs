//! Shared test utilities.
//!
//! Deterministic test-data builders (stable ids and names derived from
//! the test name, so parallel tests never collide and reruns produce
//! identical fixtures) plus float-friendly assertion helpers.

pub mod assertions;
pub mod builder;

pub use assertions::{assert_close, assert_some};
pub use builder::TestDataBuilder;
