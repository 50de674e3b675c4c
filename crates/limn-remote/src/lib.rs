//! HTTP client for the external compile/execute collaborator.

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use std::time::Duration;

use limn_exec::{CompileService, ExecuteRequest, ServiceResponse};

#[derive(Clone)]
pub struct HttpCompileService {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpCompileService {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Cheap liveness probe against the service's health endpoint.
    pub fn is_reachable(&self) -> bool {
        let client = match Client::builder().timeout(Duration::from_secs(2)).build() {
            Ok(c) => c,
            Err(_) => return false,
        };
        client
            .get(self.endpoint("/api/health"))
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

impl CompileService for HttpCompileService {
    fn execute(&self, req: &ExecuteRequest) -> Result<ServiceResponse> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("failed to build HTTP client")?;

        let response = client
            .post(self.endpoint("/api/compile"))
            .json(req)
            .send()
            .context("failed calling compile service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .unwrap_or_else(|_| "<unavailable>".to_string());
            return Err(anyhow!("compile service request failed ({status}): {body}"));
        }

        response
            .json()
            .context("failed to decode compile service response")
    }
}
