// ABOUTME: Structural validation for generated documents
// ABOUTME: Checks invariants that the response schema alone cannot express

use std::collections::HashSet;
use thiserror::Error;

use crate::types::Document;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' must not be empty")]
    EmptyField(String),

    #[error("Functional requirement #{0} has no id")]
    MissingRequirementId(usize),

    #[error("Duplicate functional requirement id: {0}")]
    DuplicateRequirementId(String),

    #[error("Functional requirement {0} has no sub-tasks")]
    NoSubTasks(String),

    #[error("Sub-task #{index} of requirement {requirement_id} has no title")]
    UntitledSubTask { requirement_id: String, index: usize },
}

/// Validate a parsed document before it is handed to callers
pub fn validate_document(doc: &Document) -> Result<(), ValidationError> {
    if doc.product_name.trim().is_empty() {
        return Err(ValidationError::EmptyField("productName".to_string()));
    }

    let mut seen = HashSet::new();
    for (idx, req) in doc.functional_requirements.iter().enumerate() {
        if req.id.trim().is_empty() {
            return Err(ValidationError::MissingRequirementId(idx + 1));
        }
        if !seen.insert(req.id.as_str()) {
            return Err(ValidationError::DuplicateRequirementId(req.id.clone()));
        }
        if req.sub_tasks.is_empty() {
            return Err(ValidationError::NoSubTasks(req.id.clone()));
        }
        if let Some(index) = req
            .sub_tasks
            .iter()
            .position(|task| task.title.trim().is_empty())
        {
            return Err(ValidationError::UntitledSubTask {
                requirement_id: req.id.clone(),
                index: index + 1,
            });
        }
    }

    Ok(())
}
