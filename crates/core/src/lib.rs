//! Copperline Core - Shared types and wire protocol.
//!
//! This crate provides the common vocabulary used across all Copperline
//! components:
//! - `api` - The CRM API server (query/mutation surface)
//! - `jobs` - Scheduled jobs that call the API as clients
//! - `cli` - Command-line tools for migrations, seeding and job invocation
//!
//! # Architecture
//!
//! The core crate contains only types, with no I/O or database access.
//! Both sides of the wire (the axum server and the reqwest-based job
//! client) deserialize and serialize exactly these types, so a document
//! that round-trips here is a document the server understands.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails and phone numbers
//! - [`api`] - Request/response documents, entities, filters and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use types::*;
