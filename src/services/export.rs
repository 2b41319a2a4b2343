//! Document export formats.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::GeneratedDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Markdown,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn label(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Docx => "DOCX",
            Self::Pdf => "PDF",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown; charset=utf-8",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{} export is not implemented", .0.label())]
    Unsupported(ExportFormat),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Exported bytes plus the metadata needed to serve them as a file.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Write `document` in `format` to `out`.
pub fn write_document<W: Write>(
    document: &GeneratedDocument,
    format: ExportFormat,
    out: &mut W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Markdown => {
            out.write_all(document.to_markdown().as_bytes())?;
            out.flush()?;
            Ok(())
        }
        ExportFormat::Docx | ExportFormat::Pdf => Err(ExportError::Unsupported(format)),
    }
}

pub fn render(
    document: &GeneratedDocument,
    format: ExportFormat,
) -> Result<RenderedDocument, ExportError> {
    let mut bytes = Vec::new();
    write_document(document, format, &mut bytes)?;

    Ok(RenderedDocument {
        format,
        file_name: format!("{}.{}", file_stem(document), format.file_extension()),
        bytes,
    })
}

/// File name stem derived from the title, restricted to safe characters.
fn file_stem(document: &GeneratedDocument) -> String {
    let mut stem = String::new();
    for c in document.title.trim().chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c);
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');

    if stem.is_empty() {
        "document".to_string()
    } else {
        stem.to_string()
    }
}
