//! Scheduled job invocation.
//!
//! Wires config, API client and log file together, runs the requested job
//! body once and maps its result to the process exit status. The heartbeat
//! and low-stock jobs are time-triggered probes of a live system: their
//! failures are already in their log files, so they exit zero and keep
//! their schedule. Order reminders and the report feed downstream work, so
//! their failures propagate as a non-zero exit for the scheduler to see.

use tracing::{error, info, warn};

use copperline_jobs::report::RetryPolicy;
use copperline_jobs::{
    ApiClient, JobLogFile, JobsConfig, heartbeat, low_stock, order_reminders, report,
};

fn setup() -> Result<(JobsConfig, ApiClient), Box<dyn std::error::Error>> {
    let config = JobsConfig::from_env()?;
    let client = ApiClient::new(&config);
    Ok((config, client))
}

/// Run the heartbeat job. Always exits zero.
///
/// # Errors
///
/// Infallible in practice; failures are logged and swallowed so the
/// schedule is preserved.
pub async fn run_heartbeat() -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = setup()?;
    let log = JobLogFile::new(&config.log_dir, heartbeat::LOG_FILE);

    match heartbeat::run(&client, &log).await {
        Ok(outcome) => {
            if outcome.api_reachable {
                info!("{}", outcome.line);
            } else {
                warn!("{}", outcome.line);
            }
        }
        Err(e) => {
            // The log file itself is unavailable; the console is the fallback.
            error!("Heartbeat failed: {e}");
        }
    }
    Ok(())
}

/// Run the low-stock restock job. Always exits zero.
///
/// # Errors
///
/// Infallible in practice; failures are logged and swallowed so the
/// schedule is preserved.
pub async fn run_low_stock() -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = setup()?;
    let log = JobLogFile::new(&config.log_dir, low_stock::LOG_FILE);

    match low_stock::run(&client, &log).await {
        Ok(outcome) => {
            info!("{}", outcome.message);
            for product in &outcome.updated {
                info!("  {}: stock {}", product.name, product.stock);
            }
        }
        Err(e) => {
            error!("Low-stock update failed: {e}");
        }
    }
    Ok(())
}

/// Run the order reminders job.
///
/// # Errors
///
/// Returns the job's error, which the caller maps to a non-zero exit.
pub async fn run_order_reminders() -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = setup()?;
    let log = JobLogFile::new(&config.log_dir, order_reminders::LOG_FILE);

    let outcome = order_reminders::run(&client, &log).await?;
    info!("Order reminders processed!");
    info!("Processed {} orders from the last 7 days", outcome.processed);
    Ok(())
}

/// Run the report job with the configured retry policy.
///
/// # Errors
///
/// Returns the job's error after the final attempt, which the caller maps
/// to a non-zero exit.
pub async fn run_report() -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = setup()?;
    let log = JobLogFile::new(&config.log_dir, report::LOG_FILE);
    let policy = RetryPolicy::fixed(config.report_max_attempts, config.report_retry_delay);

    let outcome = report::run(&client, &log, policy).await?;
    info!(
        "Report: {} customers, {} orders, ${:.2} revenue",
        outcome.customers, outcome.orders, outcome.revenue
    );
    Ok(())
}
