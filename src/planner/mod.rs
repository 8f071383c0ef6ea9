//! Planner collaborator: the remote service that turns user intent and
//! execution reports into proposals.
//!
//! - `client`: HTTP implementation over reqwest
//! - `transport`: request/response helpers shared by every endpoint

use crate::error::PlannerError;
use crate::types::{AgentResponse, ChatRequest, HealthStatus, IterateRequest};
use async_trait::async_trait;
use std::sync::Arc;

mod client;
mod transport;

pub use client::PlannerClient;

/// Planner interface used by the session controller.
///
/// Tests swap in scripted implementations; production uses [`PlannerClient`].
#[async_trait]
pub trait Planner: Send + Sync {
    /// `POST /chat`: a top-level user message.
    async fn chat(&self, request: &ChatRequest) -> Result<AgentResponse, PlannerError>;

    /// `POST /iterate`: report one execution and get the next step.
    async fn iterate(&self, request: &IterateRequest) -> Result<AgentResponse, PlannerError>;

    /// `GET /`: liveness probe.
    async fn health(&self) -> Result<HealthStatus, PlannerError>;
}

#[async_trait]
impl<P: Planner + ?Sized> Planner for Arc<P> {
    async fn chat(&self, request: &ChatRequest) -> Result<AgentResponse, PlannerError> {
        (**self).chat(request).await
    }

    async fn iterate(&self, request: &IterateRequest) -> Result<AgentResponse, PlannerError> {
        (**self).iterate(request).await
    }

    async fn health(&self) -> Result<HealthStatus, PlannerError> {
        (**self).health().await
    }
}
