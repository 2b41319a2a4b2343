//! Client for the LLM provider's structured-output endpoint.
//!
//! One call is one HTTP round trip. Retry policy lives in the generator;
//! this layer only reports what happened:
//! - non-2xx statuses with the raw body
//! - network and timeout failures
//! - 2xx bodies that do not decode
//! - cancellation while the request is in flight

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::cancellation::CancellationToken;
use crate::config::OpenAiSettings;
use crate::domain::ai::{from_str_ignore_case, ResponsesRequest, ResponsesResponse};
use crate::error::CompletionError;

/// Path of the structured-output endpoint, relative to the base URL.
pub const RESPONSES_PATH: &str = "/v1/responses";

/// Single request/response exchange with an LLM provider.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(
        &self,
        request: &ResponsesRequest,
        cancel: &CancellationToken,
    ) -> Result<ResponsesResponse, CompletionError>;
}

/// HTTP client for the provider's `/v1/responses` endpoint.
#[derive(Clone)]
pub struct ResponsesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ResponsesClient {
    /// Create a new provider client.
    pub fn new(settings: &OpenAiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = %settings.base_url, model = %settings.model, "LLM client initialized");

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, RESPONSES_PATH)
    }
}

#[async_trait]
impl CompletionTransport for ResponsesClient {
    #[instrument(skip_all, fields(model = %request.model))]
    async fn send(
        &self,
        request: &ResponsesRequest,
        cancel: &CancellationToken,
    ) -> Result<ResponsesResponse, CompletionError> {
        let url = self.endpoint();

        debug!(url = %url, "Sending request to LLM provider");

        let call = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send();

        let response = cancel
            .run_until_cancelled(call)
            .await
            .map_err(|_| CompletionError::Cancelled)?
            .map_err(|e| {
                error!(error = %e, "LLM provider request failed");
                CompletionError::Network(e)
            })?;

        let status = response.status();

        let body = cancel
            .run_until_cancelled(response.text())
            .await
            .map_err(|_| CompletionError::Cancelled)?
            .map_err(|e| {
                error!(error = %e, "Failed to read LLM provider response");
                CompletionError::Network(e)
            })?;

        if !status.is_success() {
            error!(status = %status, body = %body, "LLM provider error");
            return Err(CompletionError::Http { status, body });
        }

        from_str_ignore_case::<ResponsesResponse>(&body).map_err(|e| {
            error!(error = %e, "Failed to parse LLM provider response");
            CompletionError::MalformedResponse(e.to_string())
        })
    }
}
