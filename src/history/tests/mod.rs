//! Unit tests for history rendering and turn references.

mod transcript_tests;
mod turn_reference_tests;
