//! JobScout Core
//!
//! Core types shared by the JobScout client crates.
//!
//! This crate contains:
//! - Domain types: tasks, job listings, application kits, résumé references
//!   and form-fill outcomes as the remote API reports them
//! - DTOs: request and response bodies for the API endpoints

pub mod domain;
pub mod dto;
