// ABOUTME: Structured output schema for document generation
// ABOUTME: Mirrors the Document type field for field so responses parse without ad-hoc checks

use serde_json::{json, Value};

/// Top-level document fields the backend must always return
pub const REQUIRED_DOCUMENT_FIELDS: [&str; 13] = [
    "productName",
    "vision",
    "problemStatement",
    "marketContext",
    "targetAudience",
    "goals",
    "userStories",
    "functionalRequirements",
    "nonFunctionalRequirements",
    "successMetrics",
    "risks",
    "technicalConstraints",
    "roadmap",
];

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn level() -> Value {
    json!({ "type": "STRING", "enum": ["High", "Medium", "Low"] })
}

fn object_list(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        }
    })
}

/// Response schema sent with every document generation request
pub fn document_response_schema() -> Value {
    let user_stories = object_list(
        json!({ "role": string(), "action": string(), "benefit": string() }),
        &["role", "action", "benefit"],
    );

    let sub_tasks = object_list(
        json!({
            "title": string(),
            "description": string(),
            "acceptanceCriteria": string_list(),
        }),
        &["title", "description", "acceptanceCriteria"],
    );

    let functional_requirements = object_list(
        json!({
            "id": string(),
            "title": string(),
            "description": string(),
            "priority": level(),
            "subTasks": sub_tasks,
        }),
        &["id", "title", "description", "priority", "subTasks"],
    );

    let risks = object_list(
        json!({ "title": string(), "impact": level(), "mitigation": string() }),
        &["title", "impact", "mitigation"],
    );

    let roadmap = object_list(
        json!({ "phase": string(), "duration": string(), "milestones": string_list() }),
        &["phase", "duration", "milestones"],
    );

    json!({
        "type": "OBJECT",
        "properties": {
            "productName": string(),
            "vision": string(),
            "problemStatement": string(),
            "marketContext": string(),
            "targetAudience": string_list(),
            "goals": string_list(),
            "userStories": user_stories,
            "functionalRequirements": functional_requirements,
            "nonFunctionalRequirements": string_list(),
            "successMetrics": string_list(),
            "risks": risks,
            "technicalConstraints": string_list(),
            "roadmap": roadmap,
        },
        "required": REQUIRED_DOCUMENT_FIELDS,
    })
}
