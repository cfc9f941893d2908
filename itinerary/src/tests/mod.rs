//! Unit tests for the itinerary crate, organized by module.
//!
//! Each submodule documents the behaviour under test.
