//! Shared helpers for integration tests.

pub mod go_tree;
