//! Copperline Jobs - scheduled CRM maintenance tasks.
//!
//! Each job is a plain async function that receives a typed [`ApiClient`]
//! and the [`JobLogFile`] it reports into; nothing here reads global state,
//! so the CLI (or a test harness) wires the pieces together per invocation.
//! Every job run appends a timestamped entry to its own log file under the
//! configured log directory, success or failure.
//!
//! # Jobs
//!
//! - [`heartbeat`] - Liveness probe against the `hello` query
//! - [`low_stock`] - Restocks products below the low-stock threshold
//! - [`order_reminders`] - Logs orders placed within the last seven days
//! - [`report`] - Customer/order/revenue totals, retried on failure

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod heartbeat;
pub mod logfile;
pub mod low_stock;
pub mod order_reminders;
pub mod report;

use thiserror::Error;

pub use client::{ApiClient, ApiClientError};
pub use config::{ConfigError, JobsConfig};
pub use logfile::JobLogFile;

/// Failure of one job invocation.
///
/// Every job writes its failure to the job log before returning this, so
/// the caller only decides the exit status.
#[derive(Debug, Error)]
pub enum JobError {
    /// The API call failed.
    #[error(transparent)]
    Client(#[from] ApiClientError),
    /// The job log file could not be written.
    #[error("failed to write job log: {0}")]
    Log(#[from] std::io::Error),
}
