//! Testing infrastructure for loghive integration tests.
//!
//! - `TestWorld`: isolated workspace + provider log roots + CLI execution
//! - `fixtures`: write realistic provider session trees into a log root

pub mod fixtures;
pub mod world;

pub use world::TestWorld;
