//! Offline generator and sample model snapshots.
//!
//! The demo generator builds a document straight from the context fields
//! without any network I/O. It backs demo mode and shell development.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::time::Duration;

use crate::cancellation::CancellationToken;
use crate::domain::{
    CategoryCount, DocumentRequest, DocumentSection, GeneratedDocument, Level, Material, MepSystem,
    ModelContext, ProjectInfo, QuantitySummary, Room,
};
use crate::error::GenerationError;
use crate::services::generator::DocumentGenerator;

/// Deterministic generator with optional simulated latency.
#[derive(Debug, Clone, Default)]
pub struct DemoDocumentGenerator {
    latency: Duration,
}

impl DemoDocumentGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// Build the document synchronously, dated today (UTC).
    pub fn compose(context: &ModelContext, request: &DocumentRequest) -> GeneratedDocument {
        Self::compose_on(context, request, Utc::now().date_naive())
    }

    /// Build the document with an explicit generation date.
    pub fn compose_on(
        context: &ModelContext,
        request: &DocumentRequest,
        date: NaiveDate,
    ) -> GeneratedDocument {
        let info = &context.project_info;
        let project_name = if info.name.trim().is_empty() {
            "Untitled Project".to_string()
        } else {
            info.name.clone()
        };
        let doc_type = request.document_type.label();
        let quantities = &context.quantity_summary;

        let mut sections = Vec::new();
        let mut push = |heading: &str, content: String| {
            let order = sections.len() as i32 + 1;
            sections.push(DocumentSection {
                heading: heading.to_string(),
                content,
                order,
            });
        };

        push(
            "Project Overview",
            format!(
                "**Project Name:** {}\n**Project Number:** {}\n**Client:** {}\n**Building:** {}\n\
                 **Address:** {}\n**Status:** {}\n**Author:** {}\n**Issue Date:** {}",
                project_name,
                info.number,
                info.client_name,
                info.building_name,
                info.address,
                info.status,
                info.author,
                info.issue_date
            ),
        );

        let levels: Vec<String> = context
            .levels
            .iter()
            .map(|l| format!("- {}: Elevation {:.2}", l.name, l.elevation))
            .collect();
        push(
            "Building Description",
            format!(
                "The building comprises {} levels:\n\n{}\n\nTotal floor area: {:.2} sq units.\n\
                 Total wall area: {:.2} sq units.",
                context.levels.len(),
                levels.join("\n"),
                quantities.total_floor_area,
                quantities.total_wall_area
            ),
        );

        let categories: Vec<String> = context
            .category_counts
            .iter()
            .map(|c| format!("| {} | {} |", c.category_name, c.count))
            .collect();
        push(
            "Element Inventory",
            format!("| Category | Count |\n|---|---|\n{}", categories.join("\n")),
        );

        if !context.rooms.is_empty() {
            let rooms: Vec<String> = context
                .rooms
                .iter()
                .map(|r| {
                    format!(
                        "| {} | {} | {} | {:.2} | {:.2} |",
                        r.number, r.name, r.level, r.area, r.volume
                    )
                })
                .collect();
            push(
                "Room Schedule",
                format!(
                    "The model contains {} rooms.\n\n| Number | Name | Level | Area | Volume |\n\
                     |---|---|---|---|---|\n{}",
                    context.rooms.len(),
                    rooms.join("\n")
                ),
            );
        }

        if !context.materials.is_empty() {
            let materials: Vec<String> = context
                .materials
                .iter()
                .map(|m| format!("| {} | {} |", m.name, m.material_class))
                .collect();
            push(
                "Materials Summary",
                format!("| Material | Class |\n|---|---|\n{}", materials.join("\n")),
            );
        }

        if !context.mep_systems.is_empty() {
            let systems: Vec<String> = context
                .mep_systems
                .iter()
                .map(|s| format!("| {} | {} | {} |", s.name, s.system_type, s.element_count))
                .collect();
            push(
                "MEP Systems",
                format!(
                    "| System | Type | Elements |\n|---|---|---|\n{}",
                    systems.join("\n")
                ),
            );
        }

        if request.include_quantities_summary {
            push(
                "Quantities Summary",
                format!(
                    "| Metric | Value |\n|---|---|\n| Total Floor Area | {:.2} |\n\
                     | Total Wall Area | {:.2} |\n| Total Room Area | {:.2} |\n\
                     | Total Room Volume | {:.2} |\n| Level Count | {} |\n| Room Count | {} |",
                    quantities.total_floor_area,
                    quantities.total_wall_area,
                    quantities.total_room_area,
                    quantities.total_room_volume,
                    quantities.level_count,
                    quantities.room_count
                ),
            );
        }

        let notes = if context.warnings.is_empty() {
            "No warnings. Model data appears complete.".to_string()
        } else {
            context
                .warnings
                .iter()
                .map(|w| format!("- **{}:** {}", w.code, w.message))
                .collect::<Vec<_>>()
                .join("\n")
        };
        push("Notes and Observations", notes);

        GeneratedDocument {
            title: format!("{} - {} [DEMO]", project_name, doc_type),
            document_type: doc_type.to_string(),
            generated_date: date.format("%Y-%m-%d").to_string(),
            sections,
            project_name,
            phase: request.phase.label().to_string(),
            audience: request.audience.label().to_string(),
            detail_level: request.detail_level.label().to_string(),
            warnings: context.warnings.iter().map(|w| w.message.clone()).collect(),
        }
    }
}

#[async_trait]
impl DocumentGenerator for DemoDocumentGenerator {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn generate(
        &self,
        context: &ModelContext,
        request: &DocumentRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedDocument, GenerationError> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }
        if !self.latency.is_zero() {
            cancel
                .sleep(self.latency)
                .await
                .map_err(|_| GenerationError::Cancelled)?;
        }

        Ok(Self::compose(context, request))
    }
}

/// Fully populated snapshot of a six-level office tower.
pub fn demo_context() -> ModelContext {
    fn level(name: &str, elevation: f64) -> Level {
        Level {
            name: name.to_string(),
            elevation,
        }
    }
    fn category(name: &str, count: u32) -> CategoryCount {
        CategoryCount {
            category_name: name.to_string(),
            count,
        }
    }
    fn material(name: &str, class: &str) -> Material {
        Material {
            name: name.to_string(),
            material_class: class.to_string(),
        }
    }
    fn system(name: &str, system_type: &str, element_count: u32) -> MepSystem {
        MepSystem {
            name: name.to_string(),
            system_type: system_type.to_string(),
            element_count,
        }
    }
    fn room(name: &str, number: &str, level: &str, area: f64, volume: f64) -> Room {
        Room {
            name: name.to_string(),
            number: number.to_string(),
            level: level.to_string(),
            area,
            volume,
        }
    }

    ModelContext {
        project_info: ProjectInfo {
            name: "Centro Empresarial Procol".to_string(),
            number: "PRJ-2025-042".to_string(),
            client_name: "Grupo Inversiones del Pacifico S.A.S.".to_string(),
            building_name: "Torre Norte".to_string(),
            author: "Ing. Carlos Mendoza".to_string(),
            issue_date: "2025-03-15".to_string(),
            status: "Detailed Design".to_string(),
            address: "Calle 5 #38-25, Cali, Valle del Cauca".to_string(),
        },
        levels: vec![
            level("Basement", -3.00),
            level("Ground Floor", 0.00),
            level("Level 1", 4.20),
            level("Level 2", 8.40),
            level("Level 3", 12.60),
            level("Roof", 16.80),
        ],
        category_counts: vec![
            category("Walls", 187),
            category("Floors", 12),
            category("Roofs", 2),
            category("Doors", 64),
            category("Windows", 48),
            category("Structural Columns", 32),
            category("Structural Framing", 96),
            category("Structural Foundation", 16),
            category("Ceilings", 18),
            category("Stairs", 4),
            category("Curtain Wall Panels", 24),
            category("Railings", 8),
            category("Furniture", 42),
            category("Plumbing Fixtures", 28),
            category("Mechanical Equipment", 6),
            category("Electrical Equipment", 12),
            category("Duct Curves", 134),
            category("Pipe Curves", 89),
        ],
        materials: vec![
            material("Concrete - Cast-in-Place", "Concrete"),
            material("Concrete - Precast", "Concrete"),
            material("Steel - ASTM A992", "Metal"),
            material("Brick - Clay Common", "Masonry"),
            material("Glass - Clear Float 6mm", "Glass"),
            material("Glass - Low-E Insulated", "Glass"),
            material("Gypsum Board - 12.5mm", "Finish"),
            material("Ceramic Tile - Floor", "Finish"),
            material("Aluminum - Anodized", "Metal"),
            material("Waterproofing Membrane", "Miscellaneous"),
            material("Insulation - Mineral Wool", "Insulation"),
            material("Paint - Interior Latex", "Finish"),
        ],
        mep_systems: vec![
            system("Supply Air System 1", "Mechanical", 45),
            system("Return Air System 1", "Mechanical", 38),
            system("Exhaust Air System", "Mechanical", 22),
            system("Domestic Cold Water", "Piping", 34),
            system("Domestic Hot Water", "Piping", 28),
            system("Sanitary Drainage", "Piping", 27),
            system("Power Distribution Panel A", "Electrical", 18),
            system("Lighting Circuit - Floor 1", "Electrical", 14),
            system("Lighting Circuit - Floor 2", "Electrical", 12),
        ],
        rooms: vec![
            room("Lobby", "001", "Ground Floor", 85.50, 358.10),
            room("Reception", "002", "Ground Floor", 32.00, 134.40),
            room("Meeting Room A", "003", "Ground Floor", 28.50, 119.70),
            room("Office 101", "101", "Level 1", 45.00, 189.00),
            room("Office 102", "102", "Level 1", 38.20, 160.44),
            room("Office 103", "103", "Level 1", 42.00, 176.40),
            room("Conference Room", "104", "Level 1", 55.00, 231.00),
            room("Restroom M - L1", "105", "Level 1", 18.50, 77.70),
            room("Restroom F - L1", "106", "Level 1", 18.50, 77.70),
            room("Corridor - L1", "107", "Level 1", 34.00, 142.80),
            room("Office 201", "201", "Level 2", 52.30, 219.66),
            room("Office 202", "202", "Level 2", 48.00, 201.60),
            room("Open Plan Office", "203", "Level 2", 120.00, 504.00),
            room("Server Room", "204", "Level 2", 15.00, 63.00),
            room("Break Room", "205", "Level 2", 22.00, 92.40),
            room("Director Office", "301", "Level 3", 65.00, 273.00),
            room("Board Room", "302", "Level 3", 48.00, 201.60),
            room("Archive", "B01", "Basement", 95.00, 285.00),
            room("Parking", "B02", "Basement", 450.00, 1350.00),
            room("Mechanical Room", "B03", "Basement", 35.00, 105.00),
        ],
        quantity_summary: QuantitySummary {
            total_floor_area: 1850.75,
            total_wall_area: 4235.20,
            total_room_area: 1347.50,
            total_room_volume: 5062.50,
            level_count: 6,
            room_count: 20,
        },
        warnings: Vec::new(),
        extraction_timestamp: Utc::now(),
    }
}

/// Sparse snapshot whose warnings describe the missing blocks.
pub fn minimal_context() -> ModelContext {
    let mut context = ModelContext {
        project_info: ProjectInfo {
            name: "Minimal Test Project".to_string(),
            number: "MIN-001".to_string(),
            ..Default::default()
        },
        levels: vec![Level {
            name: "Ground Floor".to_string(),
            elevation: 0.0,
        }],
        category_counts: vec![CategoryCount {
            category_name: "Walls".to_string(),
            count: 4,
        }],
        ..Default::default()
    };
    context.warnings = context.collect_warnings();
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Audience, DetailLevel, DocumentType, ExtractionWarning, ProjectPhase};

    fn request() -> DocumentRequest {
        DocumentRequest::new(
            DocumentType::CoordinationReport,
            ProjectPhase::DetailedDesign,
            Audience::Management,
            DetailLevel::Standard,
        )
    }

    fn headings(doc: &GeneratedDocument) -> Vec<&str> {
        doc.sections.iter().map(|s| s.heading.as_str()).collect()
    }

    #[test]
    fn full_context_produces_every_section() {
        let doc = DemoDocumentGenerator::compose(&demo_context(), &request());

        assert_eq!(
            headings(&doc),
            vec![
                "Project Overview",
                "Building Description",
                "Element Inventory",
                "Room Schedule",
                "Materials Summary",
                "MEP Systems",
                "Quantities Summary",
                "Notes and Observations",
            ]
        );
        let orders: Vec<i32> = doc.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, (1..=8).collect::<Vec<_>>());
        assert_eq!(doc.title, "Centro Empresarial Procol - Coordination Report [DEMO]");
        assert_eq!(doc.audience, "Management");
        assert!(doc.sections[3].content.contains("| 001 | Lobby | Ground Floor | 85.50 | 358.10 |"));
    }

    #[test]
    fn minimal_context_skips_empty_blocks_and_carries_warnings() {
        let mut req = request();
        req.include_quantities_summary = false;

        let context = minimal_context();
        let doc = DemoDocumentGenerator::compose(&context, &req);

        assert_eq!(
            headings(&doc),
            vec![
                "Project Overview",
                "Building Description",
                "Element Inventory",
                "Notes and Observations",
            ]
        );
        assert_eq!(doc.warnings.len(), context.warnings.len());
        assert!(doc.sections[3].content.contains("**NO_ROOMS:**"));
    }

    #[test]
    fn minimal_context_flags_missing_data() {
        let codes: Vec<String> = minimal_context().warnings.into_iter().map(|w| w.code).collect();

        assert_eq!(
            codes,
            vec!["NO_ROOMS", "NO_FLOOR_AREA", "NO_MEP_SYSTEMS", "NO_MATERIALS"]
        );
    }

    #[test]
    fn unnamed_project_gets_placeholder() {
        let doc = DemoDocumentGenerator::compose(&ModelContext::default(), &request());

        assert_eq!(doc.project_name, "Untitled Project");
        assert!(doc.sections.iter().all(|s| !s.content.trim().is_empty()));
    }

    #[tokio::test]
    async fn generate_honours_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = DemoDocumentGenerator::with_latency(Duration::from_secs(5))
            .generate(&demo_context(), &request(), &cancel)
            .await;

        assert!(matches!(result, Err(GenerationError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn generate_waits_for_latency() {
        let start = tokio::time::Instant::now();

        let doc = DemoDocumentGenerator::with_latency(Duration::from_millis(1500))
            .generate(&demo_context(), &request(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert!(!doc.sections.is_empty());
    }

    #[test]
    fn demo_output_satisfies_document_schema() {
        let doc = DemoDocumentGenerator::compose(&minimal_context(), &request());
        let payload = serde_json::json!({
            "title": doc.title,
            "documentType": doc.document_type,
            "generatedDate": doc.generated_date,
            "sections": doc.sections,
            "metadata": {
                "projectName": doc.project_name,
                "phase": doc.phase,
                "audience": doc.audience,
                "detailLevel": doc.detail_level,
                "warnings": doc.warnings,
            }
        });

        let schema = crate::services::schema::DocumentSchema::load().unwrap();
        let compiled = jsonschema::JSONSchema::compile(schema.value()).unwrap();
        assert!(compiled.is_valid(&payload));
    }

    #[test]
    fn generated_date_uses_given_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

        let doc = DemoDocumentGenerator::compose_on(&demo_context(), &request(), date);

        assert_eq!(doc.generated_date, "2025-03-15");
    }

    #[test]
    fn default_date_matches_snapshot_clock() {
        let context = demo_context();

        let doc = DemoDocumentGenerator::compose(&context, &request());

        // Both reads may straddle midnight UTC
        let snapshot_day = context.extraction_timestamp.date_naive();
        let generated = NaiveDate::parse_from_str(&doc.generated_date, "%Y-%m-%d").unwrap();
        assert!(generated == snapshot_day || generated.pred_opt() == Some(snapshot_day));
    }

    #[test]
    fn extraction_warning_constructor() {
        let warning = ExtractionWarning::new("CODE", "message");
        assert_eq!(warning.code, "CODE");
    }
}
