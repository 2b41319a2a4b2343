//! Caller-facing generated document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSection {
    pub heading: String,
    pub content: String,
    /// Presentation key. Not unique; equal values keep list order.
    pub order: i32,
}

/// Validated document produced by a generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedDocument {
    pub title: String,
    pub document_type: String,
    pub generated_date: String,
    pub sections: Vec<DocumentSection>,
    pub project_name: String,
    pub phase: String,
    pub audience: String,
    pub detail_level: String,
    pub warnings: Vec<String>,
}

impl GeneratedDocument {
    /// Render the document as Markdown.
    ///
    /// Sections are emitted ascending by `order`. The sort is stable so
    /// sections sharing an order value keep their relative position.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("**Document Type:** {}\n", self.document_type));
        out.push_str(&format!("**Project:** {}\n", self.project_name));
        out.push_str(&format!("**Phase:** {}\n", self.phase));
        out.push_str(&format!("**Audience:** {}\n", self.audience));
        out.push_str(&format!("**Detail Level:** {}\n", self.detail_level));
        out.push_str(&format!("**Generated:** {}\n\n", self.generated_date));

        if !self.warnings.is_empty() {
            out.push_str("---\n\n");
            out.push_str("> **Warnings:**\n");
            for warning in &self.warnings {
                out.push_str(&format!("> - {}\n", warning));
            }
            out.push('\n');
        }

        out.push_str("---\n\n");

        let mut sections: Vec<&DocumentSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);

        for section in sections {
            out.push_str(&format!("## {}\n\n", section.heading));
            out.push_str(&section.content);
            out.push_str("\n\n");
        }

        out
    }
}
