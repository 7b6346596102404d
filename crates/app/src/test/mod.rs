//! Shared test infrastructure: per-test databases and service wiring.

pub(crate) mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
