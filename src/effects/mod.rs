//! Effects-as-data for review-service operations.
//!
//! The decision engine describes what it wants from the review service as
//! `GerritEffect` values and receives `GerritResponse` values back. This keeps
//! the engine free of transport concerns and lets tests substitute a fake
//! interpreter for the network.

pub mod gerrit;
pub mod interpreter;

pub use gerrit::{GerritEffect, GerritResponse};
pub use interpreter::GerritInterpreter;
