//! Shared helpers for engine integration tests.

pub mod logging;
