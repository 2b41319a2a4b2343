//! Conversion from a validated AI payload to a [`GeneratedDocument`].

use crate::domain::ai::RawAiDocument;
use crate::domain::{DocumentSection, GeneratedDocument};

/// Copy a validated payload into the caller-facing document.
///
/// Sections keep their list position and `order` values. Sorting happens at
/// render time.
pub fn map_document(raw: RawAiDocument) -> GeneratedDocument {
    let metadata = raw.metadata.unwrap_or_default();

    GeneratedDocument {
        title: raw.title.unwrap_or_default(),
        document_type: raw.document_type.unwrap_or_default(),
        generated_date: raw.generated_date.unwrap_or_default(),
        sections: raw
            .sections
            .unwrap_or_default()
            .into_iter()
            .map(|s| DocumentSection {
                heading: s.heading.unwrap_or_default(),
                content: s.content.unwrap_or_default(),
                order: s.order,
            })
            .collect(),
        project_name: metadata.project_name.unwrap_or_default(),
        phase: metadata.phase.unwrap_or_default(),
        audience: metadata.audience.unwrap_or_default(),
        detail_level: metadata.detail_level.unwrap_or_default(),
        warnings: metadata.warnings.unwrap_or_default(),
    }
}
