//! Generator capability shared by the network-backed and offline generators.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::cancellation::CancellationToken;
use crate::domain::{DocumentRequest, GeneratedDocument, ModelContext};
use crate::error::GenerationError;

/// Produces a document from a model snapshot and the user's options.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Short identifier used in logs and health output.
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        context: &ModelContext,
        request: &DocumentRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedDocument, GenerationError>;
}

/// Entry point used by the shell: wraps a generator with request logging.
#[derive(Clone)]
pub struct GenerationPipeline {
    generator: Arc<dyn DocumentGenerator>,
}

impl GenerationPipeline {
    pub fn new(generator: Arc<dyn DocumentGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    pub async fn generate(
        &self,
        context: &ModelContext,
        request: &DocumentRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedDocument, GenerationError> {
        info!(
            generator = self.generator.name(),
            document_type = request.document_type.label(),
            phase = request.phase.label(),
            audience = request.audience.label(),
            "Starting document generation"
        );

        if !context.warnings.is_empty() {
            warn!(
                count = context.warnings.len(),
                "Model has extraction warning(s)"
            );
        }

        match self.generator.generate(context, request, cancel).await {
            Ok(document) => {
                info!(
                    title = %document.title,
                    sections = document.sections.len(),
                    "Document generated successfully"
                );
                Ok(document)
            }
            Err(GenerationError::Cancelled) => {
                info!("Document generation was cancelled");
                Err(GenerationError::Cancelled)
            }
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "Document generation failed");
                Err(e)
            }
        }
    }
}
