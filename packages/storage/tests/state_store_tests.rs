// ABOUTME: Integration tests for typed state persistence
// ABOUTME: Round-trips documents, comments and templates through both store backends

use blueprint_core::{
    Comment, Document, FormInputs, FunctionalRequirement, Priority, RoadmapPhase, SubTask,
    Template,
};
use blueprint_storage::{
    LocalStore, MemoryStore, SqliteStore, StateStore, StorageError, COMMENTS_KEY, DOCUMENT_KEY,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn sample_document() -> Document {
    Document {
        id: "1700000000000".to_string(),
        product_name: "Acme".to_string(),
        vision: "Every widget accounted for".to_string(),
        problem_statement: "Widgets go missing".to_string(),
        market_context: "Crowded".to_string(),
        target_audience: vec!["Warehouse leads".to_string(), "Ops".to_string()],
        goals: vec!["Find widgets".to_string()],
        user_stories: vec![],
        functional_requirements: vec![FunctionalRequirement {
            id: "FR-1".to_string(),
            title: "Scan".to_string(),
            description: "Scan widgets".to_string(),
            priority: Priority::High,
            sub_tasks: vec![SubTask {
                title: "Barcode".to_string(),
                description: "Read barcodes".to_string(),
                acceptance_criteria: vec!["EAN-13 supported".to_string()],
            }],
        }],
        non_functional_requirements: vec!["p95 < 200ms".to_string()],
        success_metrics: vec![],
        risks: vec![],
        technical_constraints: vec![],
        roadmap: vec![RoadmapPhase {
            phase: "MVP".to_string(),
            duration: "6 weeks".to_string(),
            milestones: vec!["Pilot".to_string()],
        }],
    }
}

#[tokio::test]
async fn test_document_roundtrip_sqlite() {
    let state = StateStore::new(Arc::new(SqliteStore::in_memory().await.unwrap()));
    let doc = sample_document();

    assert_eq!(state.load_document().await.unwrap(), None);
    state.save_document(&doc).await.unwrap();
    assert_eq!(state.load_document().await.unwrap(), Some(doc));

    state.clear_document().await.unwrap();
    assert_eq!(state.load_document().await.unwrap(), None);
}

#[tokio::test]
async fn test_absent_lists_default_to_empty() {
    let state = StateStore::new(Arc::new(MemoryStore::new()));
    assert!(state.load_comments().await.unwrap().is_empty());
    assert!(state.load_templates().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comments_and_templates_roundtrip() {
    let state = StateStore::new(Arc::new(MemoryStore::new()));
    let comments = vec![Comment {
        id: "1".to_string(),
        section_id: "vision".to_string(),
        author: "Collaborator".to_string(),
        text: "Sharper please".to_string(),
        timestamp: 1_700_000_000_000,
    }];
    let templates = vec![Template {
        id: "2".to_string(),
        name: "Starter".to_string(),
        data: FormInputs {
            name: "Acme".to_string(),
            ..Default::default()
        },
    }];

    state.save_comments(&comments).await.unwrap();
    state.save_templates(&templates).await.unwrap();

    assert_eq!(state.load_comments().await.unwrap(), comments);
    assert_eq!(state.load_templates().await.unwrap(), templates);
}

#[tokio::test]
async fn test_clearing_document_keeps_comments() {
    let memory = Arc::new(MemoryStore::new());
    let state = StateStore::new(memory.clone());
    state.save_document(&sample_document()).await.unwrap();
    state.save_comments(&[]).await.unwrap();

    state.clear_document().await.unwrap();

    assert_eq!(memory.get(DOCUMENT_KEY).await.unwrap(), None);
    assert_eq!(memory.get(COMMENTS_KEY).await.unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_corrupt_slot_surfaces_serialization_error() {
    let memory = Arc::new(MemoryStore::new());
    memory.set(DOCUMENT_KEY, "{not json").await.unwrap();
    let state = StateStore::new(memory);

    match state.load_document().await {
        Err(StorageError::Serialization { key, .. }) => assert_eq!(key, DOCUMENT_KEY),
        other => panic!("Expected serialization error, got {:?}", other.map(|_| ())),
    }
}
