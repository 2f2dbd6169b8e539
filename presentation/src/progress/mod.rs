//! Progress reporters for the deliberation phases

pub mod reporter;
