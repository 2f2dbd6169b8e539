//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod model_gateway;
pub mod participant;
pub mod run_deliberation;

#[cfg(test)]
pub(crate) mod testing;
