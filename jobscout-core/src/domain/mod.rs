//! Core domain types
//!
//! These types mirror what the remote API returns. The client only ever
//! observes them; nothing here is persisted or mutated server-side by the
//! client.

pub mod form;
pub mod job;
pub mod kit;
pub mod resume;
pub mod task;
