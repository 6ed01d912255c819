use std::time::Duration;

use serde_json::Value;
use ureq::Agent;

use crate::engine::{records_from_response, Record};
use crate::error::{ConsoleError, Result};

/// Thin client for the admin backend. Holds the bearer token as plain
/// data; callers construct one per invocation from config.
pub struct ApiClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>, timeout_secs: u64) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    /// GET a collection endpoint (e.g. `admin/invoices`) and adapt the
    /// response into records.
    pub fn fetch_collection(&self, endpoint: &str) -> Result<Vec<Record>> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        let mut request = self.agent.get(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let body: String = request
            .call()
            .map_err(|e| ConsoleError::Api {
                url: url.clone(),
                reason: e.to_string(),
            })?
            .body_mut()
            .read_to_string()
            .map_err(|e| ConsoleError::Api {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let value: Value = serde_json::from_str(&body).map_err(|e| ConsoleError::Api {
            url,
            reason: format!("invalid JSON: {e}"),
        })?;

        Ok(records_from_response(value))
    }
}
