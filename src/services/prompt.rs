//! Prompt construction for schema-constrained document generation.
//!
//! The system prompt carries the grounding contract. The user prompt carries
//! the configuration, the section checklist for the document type and the
//! model context as JSON.

use crate::domain::{DocumentRequest, DocumentType, ModelContext};

const SYSTEM_PROMPT: &str = r#"You are an expert construction documentation writer with deep knowledge of building construction, architecture, structural engineering, and MEP systems.

YOUR TASK:
Generate a professional construction document based EXCLUSIVELY on the Revit model data provided in the user message. The model data is a JSON object called ModelContext.

STRICT RULES:
1. Use ONLY facts present in the ModelContext JSON. Do not invent, assume, or hallucinate any data.
2. If specific information is not available in the ModelContext, explicitly state: "Not available in the model data."
3. Do not reference external standards, codes, or specifications unless directly mentioned in the model data.
4. All quantities, counts, and measurements must come directly from the ModelContext. Do not perform calculations beyond simple aggregation of provided values.
5. Use professional, clear language appropriate for the specified target audience.
6. Structure the document with clear headings and sections as specified by the document type.
7. Include relevant data from every section of the ModelContext that is applicable to the requested document type.
8. If the ModelContext contains warnings, incorporate them as caveats in the relevant sections.
9. Format all content in Markdown within the JSON string fields.
10. Respond ONLY with the JSON structure matching the provided schema. Do not include any text outside the JSON.

FORMATTING:
- Use ## for main headings within section content.
- Use bullet points for lists.
- Use Markdown tables for quantitative data.
- "Short" detail: 2-3 sentences per section.
- "Standard" detail: 1-2 paragraphs per section.
- "Extended" detail: Multiple paragraphs, tables, thorough analysis per section.
"#;

/// Fixed instruction block sent as the request's `instructions`.
pub fn build_system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Render the per-request user message.
pub fn build_user_prompt(
    context: &ModelContext,
    request: &DocumentRequest,
) -> Result<String, serde_json::Error> {
    let doc_type = request.document_type.label();
    let context_json = serde_json::to_string_pretty(context)?;

    let mut prompt = String::new();
    prompt.push_str(&format!(
        "Generate a {doc_type} document for the following Revit model.\n\n"
    ));

    prompt.push_str("Configuration:\n");
    prompt.push_str(&format!("- Document Type: {doc_type}\n"));
    prompt.push_str(&format!("- Project Phase: {}\n", request.phase.label()));
    prompt.push_str(&format!("- Target Audience: {}\n", request.audience.label()));
    prompt.push_str(&format!("- Detail Level: {}\n", request.detail_level.label()));
    prompt.push_str(&format!(
        "- Include Quantities Summary: {}\n",
        yes_no(request.include_quantities_summary)
    ));
    prompt.push_str(&format!(
        "- Apply Company Template Style: {}\n\n",
        yes_no(request.use_company_template)
    ));

    prompt.push_str(&format!(
        "Document-Specific Instructions ({doc_type}):\nInclude these sections in order:\n"
    ));
    for (i, section) in section_checklist(request.document_type).iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, section));
    }
    prompt.push('\n');

    prompt.push_str("Revit Model Data (ModelContext):\n");
    prompt.push_str("```json\n");
    prompt.push_str(&context_json);
    prompt.push_str("\n```\n");

    Ok(prompt)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Ordered section checklist for a document type.
pub fn section_checklist(document_type: DocumentType) -> &'static [&'static str] {
    match document_type {
        DocumentType::DescriptiveReport => &[
            "Project Overview (name, number, client, building, address, status)",
            "Building Description (levels, overall dimensions from quantities)",
            "Architectural Elements (walls, floors, roofs, doors, windows, columns - counts and descriptions)",
            "Structural Systems (columns, framing, foundations - counts)",
            "MEP Systems Overview (mechanical, piping, electrical systems)",
            "Space Summary (room schedule with areas)",
            "Materials Summary (material types and classes)",
            "Quantities Summary (if requested - aggregate areas, volumes, counts)",
            "Notes and Observations (warnings, missing data caveats)",
        ],
        DocumentType::TechnicalSpecification => &[
            "General Information (project info, scope)",
            "Structural Systems (columns, beams, framing, foundations - types and counts)",
            "Architectural Elements (walls, floors, roofs, ceilings, doors, windows - types and counts)",
            "MEP Overview (all mechanical, piping, electrical systems with element counts)",
            "Materials Specification (all materials with classes)",
            "Room Schedule (complete room list with areas and volumes)",
            "Quantities Summary (all aggregate measurements)",
            "Technical Notes (warnings, data gaps, assumptions)",
        ],
        DocumentType::ProgressReport => &[
            "Executive Summary (project status overview)",
            "Project Information (name, number, client, current status)",
            "Model Status (element counts by category, completeness indicators)",
            "Space Planning Status (rooms defined, areas calculated)",
            "Systems Status (MEP systems defined)",
            "Material Definitions (materials assigned)",
            "Quantities Overview (key metrics)",
            "Issues and Warnings (extraction warnings, missing data)",
            "Recommendations (based on warnings and gaps)",
        ],
        DocumentType::CoordinationReport => &[
            "Project Summary (key project details)",
            "Model Overview (total elements, levels, rooms)",
            "Architectural Status (element counts for architectural categories)",
            "Structural Status (element counts for structural categories)",
            "MEP Coordination (all MEP systems, element counts, system types)",
            "Space Coordination (room list, area verification)",
            "Material Coordination (materials in use)",
            "Coordination Issues (warnings, potential conflicts based on data)",
            "Action Items (recommendations based on gaps)",
        ],
        DocumentType::FinalDeliveryDocument => &[
            "Project Identification (complete project info)",
            "Building Description (levels, overall building data)",
            "Complete Element Inventory (all categories with counts)",
            "Room Schedule (complete room list with all data)",
            "MEP Systems Inventory (all systems with details)",
            "Materials Registry (all materials)",
            "Final Quantities (complete quantities summary)",
            "Model Quality Notes (all warnings, data completeness assessment)",
            "Delivery Certification (statement of model contents and extraction date)",
        ],
    }
}
