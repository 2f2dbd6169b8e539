//! Session persistence
//!
//! Provides [`JsonSessionStore`], which implements the
//! [`SessionStore`](council_application::SessionStore) port with one
//! pretty-printed JSON file per deliberation.

mod json_store;

pub use json_store::JsonSessionStore;
