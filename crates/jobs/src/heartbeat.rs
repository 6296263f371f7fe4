//! Heartbeat job: proves the scheduler and the API are both alive.
//!
//! Appends one `DD/MM/YYYY-HH:MM:SS CRM is alive` line per invocation and
//! tacks on the outcome of a `hello` round-trip. An unreachable API is part
//! of the report, not a job failure; the heartbeat keeps its schedule.

use chrono::Local;

use crate::JobError;
use crate::client::{ApiClient, ApiClientError};
use crate::logfile::JobLogFile;

/// File name under the log directory.
pub const LOG_FILE: &str = "crm_heartbeat_log.txt";

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";

/// What one heartbeat invocation observed.
#[derive(Debug, Clone)]
pub struct HeartbeatOutcome {
    /// The line appended to the log file.
    pub line: String,
    /// False when the `hello` round-trip failed.
    pub api_reachable: bool,
}

/// Run the heartbeat once.
///
/// # Errors
///
/// Returns [`JobError::Log`] when the log file cannot be written. An API
/// failure is folded into the logged line instead.
pub async fn run(client: &ApiClient, log: &JobLogFile) -> Result<HeartbeatOutcome, JobError> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let hello = client.hello().await;
    let api_reachable = hello.is_ok();

    let line = compose_line(&timestamp, &hello);
    log.append_line(&line)?;

    Ok(HeartbeatOutcome {
        line,
        api_reachable,
    })
}

fn compose_line(timestamp: &str, hello: &Result<String, ApiClientError>) -> String {
    let mut line = format!("{timestamp} CRM is alive");
    match hello {
        Ok(greeting) => line.push_str(&format!(" - API hello: {greeting}")),
        Err(e) => line.push_str(&format!(" - API error: {e}")),
    }
    line
}
