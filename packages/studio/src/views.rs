// ABOUTME: Read-only projections over a document and its comments
// ABOUTME: Requirement search plus per-section comment grouping

use std::collections::BTreeMap;

use blueprint_core::{Comment, Document, FunctionalRequirement};

/// Requirements whose text or any sub-task text contains the query.
///
/// Matching is case-insensitive; a blank query keeps every requirement.
pub fn filter_requirements<'a>(document: &'a Document, query: &str) -> Vec<&'a FunctionalRequirement> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return document.functional_requirements.iter().collect();
    }

    let matches = |text: &str| text.to_lowercase().contains(&needle);

    document
        .functional_requirements
        .iter()
        .filter(|req| {
            matches(&req.title)
                || matches(&req.description)
                || req.sub_tasks.iter().any(|task| {
                    matches(&task.title)
                        || matches(&task.description)
                        || task.acceptance_criteria.iter().any(|c| matches(c))
                })
        })
        .collect()
}

pub fn comments_for_section<'a>(comments: &'a [Comment], section_id: &str) -> Vec<&'a Comment> {
    comments
        .iter()
        .filter(|c| c.section_id == section_id)
        .collect()
}

pub fn comment_counts(comments: &[Comment]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for comment in comments {
        *counts.entry(comment.section_id.clone()).or_insert(0) += 1;
    }
    counts
}
