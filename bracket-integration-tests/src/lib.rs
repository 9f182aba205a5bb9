//! Integration tests for bracket
//!
//! This crate contains integration tests that run bracket fixtures through
//! the `bracket-memory` host, checking the lifecycle of every descriptor
//! variant against real hook ordering.

// This is a test-only crate
#![cfg(test)]
