//! API response types

pub mod response;

pub use response::{Attachment, DataResponse};
