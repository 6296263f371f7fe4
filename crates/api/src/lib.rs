//! Copperline API library.
//!
//! This crate provides the CRM query/mutation server as a library,
//! allowing it to be tested and reused. The CLI uses it for database
//! access when migrating and seeding.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod state;
