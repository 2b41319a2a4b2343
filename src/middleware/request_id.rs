//! Request ID middleware for request tracing

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::error::ErrorResponse;

/// Header name for request ID
pub const X_REQUEST_ID: &str = "x-request-id";

/// Creates a layered middleware that:
/// 1. Sets a request ID if not present (using UUID v4)
/// 2. Propagates the request ID to the response
pub fn request_id_layer() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    let header_name = HeaderName::from_static(X_REQUEST_ID);

    (
        SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid),
        PropagateRequestIdLayer::new(header_name),
    )
}

/// Extension trait for extracting request ID from headers
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> Option<&str> {
        self.get(X_REQUEST_ID)?.to_str().ok()
    }
}

/// Copy the request's `x-request-id` into JSON error bodies.
///
/// Must sit inside the layer that sets the request id.
pub async fn attach_request_id(request: Request, next: Next) -> Response {
    let request_id = request.headers().request_id().map(str::to_string);
    let response = next.run(request).await;

    let Some(request_id) = request_id else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let Some(mut error) = parts.extensions.remove::<ErrorResponse>() else {
        return Response::from_parts(parts, body);
    };
    error.request_id = Some(request_id);

    parts.headers.remove(header::CONTENT_LENGTH);
    let body = Json(error).into_response().into_body();
    Response::from_parts(parts, body)
}
