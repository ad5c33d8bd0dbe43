//! Unit tests for session orchestration.
