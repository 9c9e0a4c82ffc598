// ABOUTME: Type definitions for generated product requirements documents
// ABOUTME: Document sections, comments, form inputs and saved templates

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority of a functional requirement, also used for risk impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

// Models occasionally answer "high" or "HIGH" even with an enum in the schema.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// "As a [role], I want [action], so that [benefit]"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub role: String,
    pub action: String,
    pub benefit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalRequirement {
    pub id: String,
    pub title: String,
    pub description: String,
    /// The only field editable after generation
    pub priority: Priority,
    pub sub_tasks: Vec<SubTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub title: String,
    pub impact: Priority,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub phase: String,
    pub duration: String,
    pub milestones: Vec<String>,
}

/// A generated product requirements document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Stamped by the gateway after parsing; absent in backend payloads
    #[serde(default)]
    pub id: String,
    pub product_name: String,
    pub vision: String,
    pub problem_statement: String,
    pub market_context: String,
    pub target_audience: Vec<String>,
    pub goals: Vec<String>,
    pub user_stories: Vec<UserStory>,
    pub functional_requirements: Vec<FunctionalRequirement>,
    pub non_functional_requirements: Vec<String>,
    pub success_metrics: Vec<String>,
    pub risks: Vec<Risk>,
    pub technical_constraints: Vec<String>,
    pub roadmap: Vec<RoadmapPhase>,
}

impl Document {
    pub fn requirement(&self, requirement_id: &str) -> Option<&FunctionalRequirement> {
        self.functional_requirements
            .iter()
            .find(|req| req.id == requirement_id)
    }
}

/// A collaboration note attached to a document section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub section_id: String,
    pub author: String,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

/// A user-declared roadmap phase passed to the generator as a hint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhaseHint {
    pub name: String,
    pub key_goals: String,
}

/// A file attached as generation context.
///
/// `data` holds a base64 data URL for images and the raw text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFile {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub data: String,
}

impl ContextFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Base64 payload of an image, with any data-URL prefix stripped
    pub fn base64_payload(&self) -> &str {
        if self.data.starts_with("data:") {
            self.data
                .split_once(',')
                .map(|(_, payload)| payload)
                .unwrap_or("")
        } else {
            &self.data
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInputs {
    pub name: String,
    pub description: String,
    pub target_audience: String,
    pub primary_goals: String,
    pub key_features: String,
    #[serde(default)]
    pub roadmap_phases: Vec<RoadmapPhaseHint>,
    #[serde(default)]
    pub context_files: Vec<ContextFile>,
}

/// A named snapshot of form inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub data: FormInputs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_accepts_any_case() {
        let parsed: Priority = serde_json::from_value(json!("high")).unwrap();
        assert_eq!(parsed, Priority::High);
        let parsed: Priority = serde_json::from_value(json!("MEDIUM")).unwrap();
        assert_eq!(parsed, Priority::Medium);
        assert!(serde_json::from_value::<Priority>(json!("urgent")).is_err());
        assert_eq!(serde_json::to_value(Priority::Low).unwrap(), json!("Low"));
    }

    #[test]
    fn test_document_uses_camel_case_fields() {
        let value = json!({
            "productName": "Acme",
            "vision": "v",
            "problemStatement": "p",
            "marketContext": "m",
            "targetAudience": ["teams"],
            "goals": [],
            "userStories": [{"role": "pm", "action": "track", "benefit": "focus"}],
            "functionalRequirements": [{
                "id": "FR-1",
                "title": "Track",
                "description": "Track widgets",
                "priority": "High",
                "subTasks": [{"title": "t", "description": "d", "acceptanceCriteria": ["a"]}]
            }],
            "nonFunctionalRequirements": [],
            "successMetrics": [],
            "risks": [{"title": "r", "impact": "Low", "mitigation": "m"}],
            "technicalConstraints": [],
            "roadmap": [{"phase": "MVP", "duration": "4 weeks", "milestones": ["ship"]}]
        });

        let doc: Document = serde_json::from_value(value).unwrap();
        assert_eq!(doc.id, "");
        assert_eq!(doc.product_name, "Acme");
        assert_eq!(doc.functional_requirements[0].sub_tasks[0].acceptance_criteria, vec!["a"]);
        assert!(doc.requirement("FR-1").is_some());
        assert!(doc.requirement("FR-2").is_none());

        let back = serde_json::to_value(&doc).unwrap();
        assert!(back.get("functionalRequirements").is_some());
        assert!(back.get("functional_requirements").is_none());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let value = json!({ "productName": "Acme" });
        assert!(serde_json::from_value::<Document>(value).is_err());
    }

    #[test]
    fn test_context_file_payload() {
        let image = ContextFile {
            name: "logo.png".to_string(),
            mime_type: "image/png".to_string(),
            data: "data:image/png;base64,AAAA".to_string(),
        };
        assert!(image.is_image());
        assert_eq!(image.base64_payload(), "AAAA");

        let text = ContextFile {
            name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            data: "hello".to_string(),
        };
        assert!(!text.is_image());

        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["type"], "text/plain");
    }
}
