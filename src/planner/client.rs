//! HTTP client for the planner service.

use super::transport;
use super::Planner;
use crate::error::PlannerError;
use crate::types::{AgentResponse, ChatRequest, HealthStatus, IterateRequest};
use async_trait::async_trait;
use std::time::Duration;

/// Planner reached over HTTP with JSON bodies.
///
/// No retries: a failed request is reported to the controller as-is.
pub struct PlannerClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlannerClient {
    /// Build a client for `base_url` with a per-request timeout.
    ///
    /// Fails only when the HTTP stack cannot be initialised (e.g. no TLS
    /// backend); a client without the timeout is never substituted.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PlannerError> {
        Ok(Self {
            http: transport::build_http_client(timeout)?,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<AgentResponse, PlannerError> {
        tracing::debug!(
            session_id = request.session_id.as_deref().unwrap_or("-"),
            "planner /chat"
        );
        let response: AgentResponse =
            transport::post_json(&self.http, &self.url("/chat"), request).await?;
        log_response("/chat", &response);
        Ok(response)
    }

    pub async fn iterate(&self, request: &IterateRequest) -> Result<AgentResponse, PlannerError> {
        tracing::debug!(
            session_id = %request.session_id,
            command = %request.command,
            has_error = request.error.is_some(),
            "planner /iterate"
        );
        let response: AgentResponse =
            transport::post_json(&self.http, &self.url("/iterate"), request).await?;
        log_response("/iterate", &response);
        Ok(response)
    }

    pub async fn health(&self) -> Result<HealthStatus, PlannerError> {
        transport::get_json(&self.http, &self.url("/")).await
    }
}

fn log_response(endpoint: &str, response: &AgentResponse) {
    tracing::debug!(
        endpoint,
        loop_status = %response.loop_status,
        iteration = response.iteration_count,
        has_proposal = response.proposal.is_some(),
        "planner reply"
    );
}

#[async_trait]
impl Planner for PlannerClient {
    async fn chat(&self, request: &ChatRequest) -> Result<AgentResponse, PlannerError> {
        PlannerClient::chat(self, request).await
    }

    async fn iterate(&self, request: &IterateRequest) -> Result<AgentResponse, PlannerError> {
        PlannerClient::iterate(self, request).await
    }

    async fn health(&self) -> Result<HealthStatus, PlannerError> {
        PlannerClient::health(self).await
    }
}
