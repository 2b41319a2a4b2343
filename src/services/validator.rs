//! Structural checks on a decoded AI payload.

use thiserror::Error;

use crate::domain::ai::RawAiDocument;

/// First structural rule a payload breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseViolation {
    #[error("response is null")]
    NullResponse,

    #[error("response title is empty")]
    EmptyTitle,

    #[error("response document type is empty")]
    EmptyDocumentType,

    #[error("response contains no sections")]
    NoSections,

    #[error("section at order {order} has empty heading")]
    EmptyHeading { order: i32 },

    #[error("section '{heading}' has empty content")]
    EmptyContent { heading: String },

    #[error("response metadata is null")]
    NullMetadata,
}

/// Check a decoded payload, stopping at the first violation.
///
/// Rules run in a fixed order: payload present, title, document type,
/// section list, each section's heading then content, metadata.
pub fn validate(response: Option<&RawAiDocument>) -> Result<(), ResponseViolation> {
    let response = response.ok_or(ResponseViolation::NullResponse)?;

    if is_blank(&response.title) {
        return Err(ResponseViolation::EmptyTitle);
    }
    if is_blank(&response.document_type) {
        return Err(ResponseViolation::EmptyDocumentType);
    }

    let sections = match response.sections.as_deref() {
        Some(sections) if !sections.is_empty() => sections,
        _ => return Err(ResponseViolation::NoSections),
    };

    for section in sections {
        if is_blank(&section.heading) {
            return Err(ResponseViolation::EmptyHeading {
                order: section.order,
            });
        }
        if is_blank(&section.content) {
            return Err(ResponseViolation::EmptyContent {
                heading: section.heading.clone().unwrap_or_default(),
            });
        }
    }

    if response.metadata.is_none() {
        return Err(ResponseViolation::NullMetadata);
    }

    Ok(())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}
