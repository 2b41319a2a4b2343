//! HTTP middleware

pub mod request_id;

pub use request_id::{attach_request_id, request_id_layer, RequestIdExt, X_REQUEST_ID};
