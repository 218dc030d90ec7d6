//! Data Transfer Objects for the JobScout API
//!
//! Request bodies sent to the API and the envelopes it answers with.
//! Domain payloads nested in these envelopes live in [`crate::domain`].

pub mod form;
pub mod job;
pub mod kit;
pub mod resume;
pub mod task;
