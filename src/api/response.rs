//! Standard API response types

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::export::RenderedDocument;

/// Response for single data item
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Exported document served as a downloadable file
pub struct Attachment(pub RenderedDocument);

impl IntoResponse for Attachment {
    fn into_response(self) -> Response {
        let Attachment(doc) = self;
        let disposition = HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            doc.file_name
        ))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

        (
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(doc.format.content_type()),
                ),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            doc.bytes,
        )
            .into_response()
    }
}
