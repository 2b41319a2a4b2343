use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{Attachment, DataResponse};
use crate::app::AppState;
use crate::cancellation::CancellationToken;
use crate::domain::{DocumentRequest, GeneratedDocument, ModelContext};
use crate::error::{ApiError, ApiResult};
use crate::middleware::RequestIdExt;
use crate::services::export::{self, ExportFormat};

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentBody {
    pub context: ModelContext,
    pub request: DocumentRequest,
}

/// Generate a document from a model snapshot
///
/// Generation runs on its own task. If the client goes away the handler
/// future is dropped, which cancels the task through the drop guard.
pub async fn generate_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GenerateDocumentBody>,
) -> ApiResult<DataResponse<GeneratedDocument>> {
    tracing::info!(
        request_id = headers.request_id().unwrap_or("-"),
        project = %body.context.project_info.name,
        document_type = body.request.document_type.label(),
        "Document generation requested"
    );

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let pipeline = state.pipeline.clone();
    let task = tokio::spawn(async move {
        pipeline
            .generate(&body.context, &body.request, &cancel)
            .await
    });

    let result = task
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("generation task failed: {e}")))?;
    guard.disarm();

    Ok(DataResponse::new(result?))
}

/// Export a (possibly edited) document as a downloadable file
pub async fn export_document(
    Path(format): Path<String>,
    Json(document): Json<GeneratedDocument>,
) -> ApiResult<Attachment> {
    let format: ExportFormat = format.parse().map_err(ApiError::BadRequest)?;

    tracing::info!(
        format = format.label(),
        title = %document.title,
        "Exporting document"
    );

    let rendered = export::render(&document, format)?;
    Ok(Attachment(rendered))
}
