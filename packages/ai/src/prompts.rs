// ABOUTME: Prompt construction for document, tip and media generation
// ABOUTME: Embeds form inputs and roadmap hints into the generation instructions

use blueprint_core::FormInputs;

const DEFAULT_ROADMAP_INSTRUCTION: &str =
    "Create a logical 3-phase release roadmap (MVP, v1.1, v2.0).";

/// Roadmap section: the user's phase hints, or a request for a default plan
pub fn roadmap_instruction(inputs: &FormInputs) -> String {
    if inputs.roadmap_phases.is_empty() {
        return DEFAULT_ROADMAP_INSTRUCTION.to_string();
    }

    let phases = inputs
        .roadmap_phases
        .iter()
        .map(|p| format!("{} (Goals: {})", p.name, p.key_goals))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "The user has defined the following roadmap phases which you must flesh out with realistic milestones: {}",
        phases
    )
}

/// Main instruction text for a full document
pub fn document_prompt(inputs: &FormInputs) -> String {
    format!(
        r#"Generate a highly professional and comprehensive Product Requirements Document (PRD).

Product Identity:
- Name: {name}
- Executive Summary/Description: {description}
- Primary Users: {audience}
- Key Objectives: {goals}
- Core Features: {features}

Roadmap Constraints:
{roadmap}

Required Detail Level:
1. Vision & Strategy: Deep dive into why this matters.
2. Market Context: Provide a brief analysis of the problem space.
3. User Stories: Follow "As a [role], I want [action], so that [benefit]".
4. Functional Requirements: Give every requirement a unique id (e.g. FR-1) and a priority of High, Medium or Low. Break each one down into at least 2-3 smaller, actionable sub-tasks. Each sub-task must have its own specific Title, Description, and a list of detailed Acceptance Criteria.
5. Risks: Identify 3-4 potential risks and their mitigation strategies.
6. Technical Constraints: Mention expected constraints (e.g., scalability, API limits, platform specificities).

Context Information:
The user has attached {file_count} files as additional context.
Analyze the contents of these files (images or text) to inform the PRD.

Output the data in strict JSON format matching the requested schema."#,
        name = inputs.name,
        description = inputs.description,
        audience = inputs.target_audience,
        goals = inputs.primary_goals,
        features = inputs.key_features,
        roadmap = roadmap_instruction(inputs),
        file_count = inputs.context_files.len(),
    )
}

/// One-sentence strategy tip request
pub fn quick_tip_prompt(inputs: &FormInputs) -> String {
    format!(
        "Provide a one-sentence high-level product strategy tip for a product named {} that {}",
        inputs.name, inputs.description
    )
}

/// Default prompt for brand asset generation
pub fn default_media_prompt(product_name: &str) -> String {
    format!(
        "A professional high-tech dashboard UI for {}, sleek modern design, 4k resolution",
        product_name
    )
}
