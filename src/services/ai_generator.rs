//! Network-backed document generator with bounded retries.
//!
//! The wire request is built once per call and resent unchanged on every
//! attempt. Attempt outcomes:
//!
//! | outcome            | not last attempt           | last attempt              |
//! |--------------------|----------------------------|---------------------------|
//! | empty output       | retry now                  | `Exhausted(EmptyOutput)`  |
//! | malformed JSON     | wait 2^attempt s, retry    | `Exhausted(Malformed..)`  |
//! | invalid structure  | retry now                  | `Exhausted(Structural..)` |
//! | transport failure  | wait 2^attempt s, retry    | `Transport(error)`        |
//! | cancelled          | `Cancelled`                | `Cancelled`               |

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::cancellation::CancellationToken;
use crate::config::OpenAiSettings;
use crate::domain::ai::{from_str_ignore_case, RawAiDocument, ResponsesRequest};
use crate::domain::{DocumentRequest, GeneratedDocument, ModelContext};
use crate::error::{AttemptError, CompletionError, GenerationError};
use crate::services::ai_client::{CompletionTransport, ResponsesClient};
use crate::services::generator::DocumentGenerator;
use crate::services::mapper::map_document;
use crate::services::prompt::{build_system_prompt, build_user_prompt};
use crate::services::schema::DocumentSchema;
use crate::services::validator::{validate, ResponseViolation};

/// Attempt bound and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// At least one attempt is always made.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after a failed `attempt` (1-based): 2s, 4s, 8s, ...
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs(1u64 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Model parameters copied into every wire request.
#[derive(Debug, Clone)]
struct ModelParams {
    model: String,
    temperature: f64,
    max_output_tokens: u32,
}

/// Generator that calls the LLM provider's structured-output endpoint.
#[derive(Clone)]
pub struct AiDocumentGenerator {
    transport: Arc<dyn CompletionTransport>,
    schema: DocumentSchema,
    params: ModelParams,
    policy: RetryPolicy,
}

/// How one attempt ended when it did not yield a document.
enum AttemptFailure {
    Rejected(AttemptError),
    Transport(CompletionError),
    Cancelled,
}

impl From<AttemptError> for AttemptFailure {
    fn from(e: AttemptError) -> Self {
        Self::Rejected(e)
    }
}

impl AiDocumentGenerator {
    pub fn new(
        transport: Arc<dyn CompletionTransport>,
        schema: DocumentSchema,
        settings: &OpenAiSettings,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            schema,
            params: ModelParams {
                model: settings.model.clone(),
                temperature: settings.temperature,
                max_output_tokens: settings.max_output_tokens,
            },
            policy,
        }
    }

    /// Generator backed by the HTTP [`ResponsesClient`].
    pub fn from_settings(
        settings: &OpenAiSettings,
        schema: DocumentSchema,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let client = ResponsesClient::new(settings)?;
        Ok(Self::new(Arc::new(client), schema, settings, policy))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Wire request for one generation call.
    pub fn build_request(
        &self,
        context: &ModelContext,
        request: &DocumentRequest,
    ) -> Result<ResponsesRequest, serde_json::Error> {
        let user_prompt = build_user_prompt(context, request)?;

        Ok(ResponsesRequest::structured(
            &self.params.model,
            build_system_prompt(),
            user_prompt,
            self.schema.to_value(),
            self.params.temperature,
            self.params.max_output_tokens,
        ))
    }

    async fn attempt(
        &self,
        wire: &ResponsesRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedDocument, AttemptFailure> {
        let response = match self.transport.send(wire, cancel).await {
            Ok(response) => response,
            Err(CompletionError::Cancelled) => return Err(AttemptFailure::Cancelled),
            // A 2xx body that does not decode is handled like malformed output
            Err(CompletionError::MalformedResponse(message)) => {
                return Err(AttemptError::MalformedPayload(message).into())
            }
            Err(e) => return Err(AttemptFailure::Transport(e)),
        };

        debug!(response_id = %response.id, "LLM provider responded");

        if let Some(provider_error) = &response.error {
            warn!(
                code = provider_error.code.as_deref().unwrap_or_default(),
                message = provider_error.message.as_deref().unwrap_or_default(),
                "LLM provider reported an error"
            );
        }

        let text = match response.output_text() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(AttemptError::EmptyOutput.into()),
        };

        let raw: Option<RawAiDocument> = from_str_ignore_case(text)
            .map_err(|e| AttemptError::MalformedPayload(e.to_string()))?;

        let Some(raw) = raw else {
            return Err(AttemptError::from(ResponseViolation::NullResponse).into());
        };

        validate(Some(&raw)).map_err(AttemptError::from)?;

        Ok(map_document(raw))
    }

    async fn backoff(&self, attempt: u32, cancel: &CancellationToken) -> Result<(), GenerationError> {
        let delay = self.policy.backoff_delay(attempt);
        debug!(attempt, delay_secs = delay.as_secs(), "Backing off before retry");

        cancel
            .sleep(delay)
            .await
            .map_err(|_| GenerationError::Cancelled)
    }
}

#[async_trait]
impl DocumentGenerator for AiDocumentGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip_all, fields(document_type = request.document_type.label()))]
    async fn generate(
        &self,
        context: &ModelContext,
        request: &DocumentRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedDocument, GenerationError> {
        let wire = self.build_request(context, request)?;
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }

            let is_last = attempt == max_attempts;
            info!(attempt, max_attempts, "AI generation attempt");

            match self.attempt(&wire, cancel).await {
                Ok(document) => return Ok(document),
                Err(AttemptFailure::Cancelled) => return Err(GenerationError::Cancelled),
                Err(AttemptFailure::Rejected(e)) if is_last => {
                    error!(attempt, error = %e, "AI response rejected on final attempt");
                    return Err(GenerationError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
                Err(AttemptFailure::Rejected(e)) => {
                    warn!(attempt, error = %e, "AI response rejected, retrying");
                    if matches!(e, AttemptError::MalformedPayload(_)) {
                        self.backoff(attempt, cancel).await?;
                    }
                }
                Err(AttemptFailure::Transport(e)) if is_last => {
                    error!(attempt, error = %e, "LLM provider call failed on final attempt");
                    return Err(GenerationError::Transport(e));
                }
                Err(AttemptFailure::Transport(e)) => {
                    warn!(attempt, error = %e, "LLM provider call failed, retrying");
                    self.backoff(attempt, cancel).await?;
                }
            }
        }

        Err(GenerationError::NoAttempts)
    }
}
