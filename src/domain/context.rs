//! Model context snapshot handed to the LLM as grounding data.
//!
//! The snapshot is produced by the CAD-side extractor and arrives fully
//! formed. Keys are camelCase on the wire and inside the user prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured snapshot of the source model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelContext {
    pub project_info: ProjectInfo,
    pub levels: Vec<Level>,
    pub category_counts: Vec<CategoryCount>,
    pub materials: Vec<Material>,
    pub mep_systems: Vec<MepSystem>,
    pub rooms: Vec<Room>,
    pub quantity_summary: QuantitySummary,
    pub warnings: Vec<ExtractionWarning>,
    pub extraction_timestamp: DateTime<Utc>,
}

impl Default for ModelContext {
    fn default() -> Self {
        Self {
            project_info: ProjectInfo::default(),
            levels: Vec::new(),
            category_counts: Vec::new(),
            materials: Vec::new(),
            mep_systems: Vec::new(),
            rooms: Vec::new(),
            quantity_summary: QuantitySummary::default(),
            warnings: Vec::new(),
            extraction_timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInfo {
    pub name: String,
    pub number: String,
    pub client_name: String,
    pub building_name: String,
    pub author: String,
    pub issue_date: String,
    pub status: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Level {
    pub name: String,
    pub elevation: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryCount {
    pub category_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
    pub name: String,
    pub material_class: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MepSystem {
    pub name: String,
    pub system_type: String,
    pub element_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    pub name: String,
    pub number: String,
    pub level: String,
    pub area: f64,
    pub volume: f64,
}

/// Aggregated quantities computed during extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuantitySummary {
    pub total_floor_area: f64,
    pub total_wall_area: f64,
    pub total_room_area: f64,
    pub total_room_volume: f64,
    pub level_count: u32,
    pub room_count: u32,
}

/// Data gap detected while extracting the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionWarning {
    pub code: String,
    pub message: String,
}

impl ExtractionWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl ModelContext {
    /// Completeness checks applied to a freshly extracted snapshot.
    ///
    /// Returns one warning per missing block, in a fixed order. Callers that
    /// build a context by hand use this to populate [`ModelContext::warnings`].
    pub fn collect_warnings(&self) -> Vec<ExtractionWarning> {
        let mut warnings = Vec::new();

        if self.project_info.name.trim().is_empty() {
            warnings.push(ExtractionWarning::new(
                "MISSING_PROJECT_NAME",
                "Project name is not set in Project Information.",
            ));
        }
        if self.levels.is_empty() {
            warnings.push(ExtractionWarning::new("NO_LEVELS", "No levels found in the model."));
        }
        if self.rooms.is_empty() {
            warnings.push(ExtractionWarning::new(
                "NO_ROOMS",
                "No rooms with area > 0 found in the model.",
            ));
        }
        if self.quantity_summary.total_floor_area == 0.0 {
            warnings.push(ExtractionWarning::new(
                "NO_FLOOR_AREA",
                "Total floor area is zero. No floor elements found or areas not computed.",
            ));
        }
        if self.mep_systems.is_empty() {
            warnings.push(ExtractionWarning::new(
                "NO_MEP_SYSTEMS",
                "No MEP systems found in the model.",
            ));
        }
        if self.materials.is_empty() {
            warnings.push(ExtractionWarning::new(
                "NO_MATERIALS",
                "No materials found in the model.",
            ));
        }
        if self.category_counts.is_empty() {
            warnings.push(ExtractionWarning::new(
                "NO_ELEMENTS",
                "No categorized elements found in the model.",
            ));
        }

        warnings
    }
}
