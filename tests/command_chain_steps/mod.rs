//! Step definitions for command chain scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
