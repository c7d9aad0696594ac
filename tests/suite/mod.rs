//! Integration test suites, one module per end-to-end property.

mod durability;
mod determinism;
mod resumability;
