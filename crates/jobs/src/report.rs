//! Report job: totals customers, orders and revenue.
//!
//! Counts customers via the connection's `total_count`, pages through every
//! order summing `total_amount` client-side, and appends one
//! `{ts} - Report: X customers, Y orders, $Z revenue.` line. The order
//! count is the number of rows actually summed, so the two figures in the
//! line always describe the same snapshot.
//!
//! A failed attempt logs an ERROR line and is retried on a fixed delay up
//! to a capped attempt count. Re-running an already-successful report only
//! appends another line; the totals queries write nothing.

use std::time::Duration;

use chrono::Local;
use rust_decimal::Decimal;

use copperline_core::api::OrderFilter;

use crate::JobError;
use crate::client::{ApiClient, ApiClientError};
use crate::logfile::JobLogFile;

/// File name under the log directory.
pub const LOG_FILE: &str = "crm_report_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Retry tunables for the report job.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, counting the first.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// A fixed-delay policy.
    #[must_use]
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// The totals one report run produced.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Total number of customers.
    pub customers: i64,
    /// Number of orders summed into the revenue figure.
    pub orders: i64,
    /// Sum of `total_amount` across those orders.
    pub revenue: Decimal,
}

/// Run the report, retrying failed attempts per `policy`.
///
/// # Errors
///
/// Returns [`JobError::Client`] when the final attempt fails (every failed
/// attempt is logged first) and [`JobError::Log`] when the log file cannot
/// be written.
pub async fn run(
    client: &ApiClient,
    log: &JobLogFile,
    policy: RetryPolicy,
) -> Result<ReportOutcome, JobError> {
    let mut attempt = 1u32;

    loop {
        match generate(client).await {
            Ok(outcome) => {
                let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
                log.append_line(&report_line(&timestamp, &outcome))?;
                tracing::info!(
                    "CRM Report generated: {} customers, {} orders, ${:.2} revenue",
                    outcome.customers,
                    outcome.orders,
                    outcome.revenue
                );
                return Ok(outcome);
            }
            Err(e) => {
                let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
                log.append_line(&error_line(&timestamp, &e))?;

                if attempt >= policy.max_attempts {
                    return Err(JobError::Client(e));
                }
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_secs = policy.delay.as_secs(),
                    error = %e,
                    "report attempt failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

async fn generate(client: &ApiClient) -> Result<ReportOutcome, ApiClientError> {
    let customers = client.customer_count().await?;
    let orders = client.orders_matching(OrderFilter::default()).await?;
    let revenue: Decimal = orders.iter().map(|order| order.total_amount).sum();

    Ok(ReportOutcome {
        customers,
        orders: orders.len() as i64,
        revenue,
    })
}

fn report_line(timestamp: &str, outcome: &ReportOutcome) -> String {
    format!(
        "{timestamp} - Report: {} customers, {} orders, ${:.2} revenue.",
        outcome.customers, outcome.orders, outcome.revenue
    )
}

fn error_line(timestamp: &str, error: &ApiClientError) -> String {
    format!("{timestamp} - ERROR: Error generating CRM report: {error}")
}
