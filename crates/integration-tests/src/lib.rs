//! Integration tests for Copperline.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, then prepare and launch the API server
//! cargo run -p copperline-cli -- migrate
//! cargo run -p copperline-api
//!
//! # Run the ignored end-to-end tests against it
//! cargo test -p copperline-integration-tests -- --ignored
//! ```
//!
//! Every test drives the real wire: request documents go out as JSON over
//! HTTP and assertions read the `data`/`errors` envelope that came back.
//! Tests namespace the rows they create with unique markers, so they
//! tolerate a database that already holds data. The low-stock tests do
//! restock whatever else qualifies at the time they run.
//!
//! # Environment
//!
//! - `CRM_API_BASE_URL` - Server under test (default: `http://localhost:8000`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

/// Base URL for the API server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CRM_API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// A thin handle on the server under test.
pub struct TestApi {
    client: Client,
    endpoint: String,
}

impl TestApi {
    /// A client against the configured server.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api", base_url()),
        }
    }

    /// Post one request document and return the decoded envelope.
    ///
    /// Operation outcomes arrive with HTTP 200 whether they succeeded or
    /// not; the envelope's `data`/`errors` split carries the verdict.
    ///
    /// # Panics
    ///
    /// Panics when the server is unreachable, answers a non-200 status or
    /// returns a body that is not JSON.
    pub async fn post(&self, document: &Value) -> Value {
        let response = self
            .client
            .post(&self.endpoint)
            .json(document)
            .send()
            .await
            .expect("Failed to reach API server");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Response body was not JSON")
    }
}

impl Default for TestApi {
    fn default() -> Self {
        Self::new()
    }
}

/// An email address no other test run will have used.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

/// A marker for namespacing names created by one test.
#[must_use]
pub fn unique_marker(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
