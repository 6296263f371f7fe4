//! Low-stock job: restocks products that have fallen below ten units.
//!
//! Invokes the `update_low_stock_products` mutation and logs the outcome as
//! a timestamped block: the mutation's message, then one line per restocked
//! product with its new stock level. An API failure is logged too and does
//! not disrupt the schedule; the caller treats it as a degraded run.

use chrono::Local;

use copperline_core::api::{LowStockProduct, LowStockUpdateResult};

use crate::JobError;
use crate::client::ApiClient;
use crate::logfile::JobLogFile;

/// File name under the log directory.
pub const LOG_FILE: &str = "low_stock_updates_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summary of one restock run.
#[derive(Debug, Clone)]
pub struct LowStockOutcome {
    /// The mutation's outcome message.
    pub message: String,
    /// The restocked products with their new stock levels.
    pub updated: Vec<LowStockProduct>,
}

/// Run the restock once.
///
/// # Errors
///
/// Returns [`JobError::Client`] when the mutation call fails (after logging
/// it) and [`JobError::Log`] when the log file cannot be written.
pub async fn run(client: &ApiClient, log: &JobLogFile) -> Result<LowStockOutcome, JobError> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    match client.update_low_stock_products().await {
        Ok(result) => {
            log.append(&format_block(&timestamp, &result))?;
            Ok(LowStockOutcome {
                message: result.message,
                updated: result.updated_products,
            })
        }
        Err(e) => {
            log.append_line(&format!("[{timestamp}] Error running low-stock update: {e}"))?;
            Err(JobError::Client(e))
        }
    }
}

/// One `[timestamp]`-prefixed block: outcome message, then a line per
/// restocked product.
fn format_block(timestamp: &str, result: &LowStockUpdateResult) -> String {
    let mut block = format!("[{timestamp}] {}\n", result.message);
    for product in &result.updated_products {
        block.push_str(&format!(
            "[{timestamp}] - {}: stock {}\n",
            product.name, product.stock
        ));
    }
    block
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use copperline_core::types::ProductId;

    use super::*;

    #[test]
    fn test_block_lists_each_updated_product() {
        let result = LowStockUpdateResult {
            success: true,
            message: "Successfully updated 2 low-stock products".to_string(),
            updated_count: 2,
            updated_products: vec![
                LowStockProduct {
                    id: ProductId::new(1),
                    name: "Widget".to_string(),
                    stock: 13,
                },
                LowStockProduct {
                    id: ProductId::new(2),
                    name: "Gadget".to_string(),
                    stock: 18,
                },
            ],
        };

        let block = format_block("2026-08-23 12:00:00", &result);
        assert_eq!(
            block,
            "[2026-08-23 12:00:00] Successfully updated 2 low-stock products\n\
             [2026-08-23 12:00:00] - Widget: stock 13\n\
             [2026-08-23 12:00:00] - Gadget: stock 18\n"
        );
    }

    #[test]
    fn test_block_for_empty_run_is_one_line() {
        let result = LowStockUpdateResult {
            success: true,
            message: "No low-stock products found".to_string(),
            updated_count: 0,
            updated_products: vec![],
        };

        let block = format_block("2026-08-23 12:00:00", &result);
        assert_eq!(block, "[2026-08-23 12:00:00] No low-stock products found\n");
    }
}
