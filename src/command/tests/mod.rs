//! Unit tests for command definitions, discovery and expansion.

mod manifest_tests;
