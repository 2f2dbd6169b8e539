//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - the backend model the agents run on
//! - [`message::Message`] - a role-tagged conversation turn
//! - [`error::DomainError`] - configuration errors

pub mod error;
pub mod message;
pub mod model;
