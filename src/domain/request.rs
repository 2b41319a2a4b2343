//! User-selected generation options.

use serde::{Deserialize, Serialize};

/// Kind of document to generate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    DescriptiveReport,
    TechnicalSpecification,
    ProgressReport,
    CoordinationReport,
    FinalDeliveryDocument,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        Self::DescriptiveReport,
        Self::TechnicalSpecification,
        Self::ProgressReport,
        Self::CoordinationReport,
        Self::FinalDeliveryDocument,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::DescriptiveReport => "Descriptive Report",
            Self::TechnicalSpecification => "Technical Specification",
            Self::ProgressReport => "Progress Report",
            Self::CoordinationReport => "Coordination Report",
            Self::FinalDeliveryDocument => "Final Delivery Document",
        }
    }
}

/// Project phase the document is written for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    ConceptualDesign,
    DetailedDesign,
    Construction,
    Handover,
}

impl ProjectPhase {
    pub const ALL: [ProjectPhase; 4] = [
        Self::ConceptualDesign,
        Self::DetailedDesign,
        Self::Construction,
        Self::Handover,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ConceptualDesign => "Conceptual Design",
            Self::DetailedDesign => "Detailed Design",
            Self::Construction => "Construction",
            Self::Handover => "Handover",
        }
    }
}

/// Intended reader of the document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Client,
    Supervision,
    Management,
    PublicAuthority,
}

impl Audience {
    pub const ALL: [Audience; 4] = [
        Self::Client,
        Self::Supervision,
        Self::Management,
        Self::PublicAuthority,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Supervision => "Supervision / Inspector",
            Self::Management => "Management",
            Self::PublicAuthority => "Public Authority",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    Short,
    Standard,
    Extended,
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 3] = [Self::Short, Self::Standard, Self::Extended];

    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::Standard => "Standard",
            Self::Extended => "Extended",
        }
    }
}

/// Configuration chosen by the user for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRequest {
    pub document_type: DocumentType,
    pub phase: ProjectPhase,
    pub audience: Audience,
    pub detail_level: DetailLevel,
    #[serde(default = "default_include_quantities")]
    pub include_quantities_summary: bool,
    #[serde(default)]
    pub use_company_template: bool,
}

fn default_include_quantities() -> bool {
    true
}

impl DocumentRequest {
    pub fn new(
        document_type: DocumentType,
        phase: ProjectPhase,
        audience: Audience,
        detail_level: DetailLevel,
    ) -> Self {
        Self {
            document_type,
            phase,
            audience,
            detail_level,
            include_quantities_summary: true,
            use_company_template: false,
        }
    }
}
