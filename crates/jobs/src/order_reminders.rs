//! Order reminders job: surfaces orders placed within the last seven days.
//!
//! Queries `all_orders` with an `order_date_gte` filter at now minus seven
//! days, paging through every match, and appends one block to the log: a
//! header with the order count, then one line per order carrying its ID,
//! the customer's email and the order date. The whole block shares a single
//! timestamp so one invocation reads as one entry.
//!
//! Unlike the heartbeat, a failure here is a failed run: follow-up mail
//! depends on this log, so the caller maps it to a non-zero exit status.

use chrono::{Duration, Local, Utc};

use copperline_core::api::{Order, OrderFilter};

use crate::JobError;
use crate::client::ApiClient;
use crate::logfile::JobLogFile;

/// File name under the log directory.
pub const LOG_FILE: &str = "order_reminders_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The reminder window in days.
const WINDOW_DAYS: i64 = 7;

/// Summary of one reminders run.
#[derive(Debug, Clone, Copy)]
pub struct RemindersOutcome {
    /// Number of orders in the window that were logged.
    pub processed: usize,
}

/// Run the reminders pass once.
///
/// # Errors
///
/// Returns [`JobError::Client`] when the order query fails (after logging
/// it) and [`JobError::Log`] when the log file cannot be written.
pub async fn run(client: &ApiClient, log: &JobLogFile) -> Result<RemindersOutcome, JobError> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let filter = OrderFilter {
        order_date_gte: Some(Utc::now() - Duration::days(WINDOW_DAYS)),
        ..OrderFilter::default()
    };

    match client.orders_matching(filter).await {
        Ok(orders) => {
            log.append(&format_block(&timestamp, &orders))?;
            Ok(RemindersOutcome {
                processed: orders.len(),
            })
        }
        Err(e) => {
            log.append_line(&format!(
                "[{timestamp}] Error processing order reminders: {e}"
            ))?;
            Err(JobError::Client(e))
        }
    }
}

fn format_block(timestamp: &str, orders: &[Order]) -> String {
    let mut block = format!(
        "[{timestamp}] Processing {} orders from the last {WINDOW_DAYS} days\n",
        orders.len()
    );
    for order in orders {
        block.push_str(&format!(
            "[{timestamp}] Order ID: {}, Customer Email: {}, Order Date: {}\n",
            order.id,
            order.customer.email,
            order.order_date.to_rfc3339()
        ));
    }
    block
}
