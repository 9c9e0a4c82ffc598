// ABOUTME: Shared fixtures for studio integration tests
// ABOUTME: Scripted in-memory gateway and sample documents

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blueprint_ai::{
    CancellationToken, Gateway, GatewayError, GatewayResult, GeneratedImage, ImageAspectRatio,
    ImageQuality, MediaReference, VideoAspectRatio,
};
use blueprint_core::{
    generate_timestamp_id, Document, FormInputs, FunctionalRequirement, Priority, RoadmapPhase,
    SubTask,
};
use blueprint_storage::{MemoryStore, StateStore};
use tokio::sync::Notify;
use blueprint_studio::{DocumentController, SyncHub};

pub enum Scripted {
    Document(Document),
    Fail(fn() -> GatewayError),
}

/// Gateway that answers document requests from a queue and records prompts
pub struct MockGateway {
    responses: Mutex<Vec<Scripted>>,
    pub requests: Mutex<Vec<FormInputs>>,
    pub tip: Option<String>,
}

impl MockGateway {
    pub fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            tip: Some("Start with the smallest useful slice.".to_string()),
        }
    }

    pub fn requests(&self) -> Vec<FormInputs> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn generate_document(&self, inputs: &FormInputs) -> GatewayResult<Document> {
        self.requests.lock().unwrap().push(inputs.clone());
        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };
        match next {
            Some(Scripted::Document(mut doc)) => {
                doc.id = generate_timestamp_id();
                Ok(doc)
            }
            Some(Scripted::Fail(make)) => Err(make()),
            None => Err(GatewayError::EmptyResponse),
        }
    }

    async fn quick_tip(&self, _prompt: &str) -> GatewayResult<String> {
        self.tip.clone().ok_or(GatewayError::EmptyResponse)
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _aspect_ratio: ImageAspectRatio,
        _quality: ImageQuality,
    ) -> GatewayResult<Option<GeneratedImage>> {
        Ok(None)
    }

    async fn generate_video_with_cancel(
        &self,
        _prompt: &str,
        _aspect_ratio: VideoAspectRatio,
        _cancel: CancellationToken,
    ) -> GatewayResult<MediaReference> {
        Err(GatewayError::Cancelled)
    }
}

/// Gateway whose document and tip calls wait until the test releases them
pub struct GatedGateway {
    document: Document,
    pub entered: Notify,
    pub release: Notify,
    pub release_tip: Notify,
}

impl GatedGateway {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            entered: Notify::new(),
            release: Notify::new(),
            release_tip: Notify::new(),
        }
    }
}

#[async_trait]
impl Gateway for GatedGateway {
    async fn generate_document(&self, _inputs: &FormInputs) -> GatewayResult<Document> {
        self.entered.notify_one();
        self.release.notified().await;
        let mut doc = self.document.clone();
        doc.id = generate_timestamp_id();
        Ok(doc)
    }

    async fn quick_tip(&self, _prompt: &str) -> GatewayResult<String> {
        self.release_tip.notified().await;
        Ok("Ship the import flow first.".to_string())
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _aspect_ratio: ImageAspectRatio,
        _quality: ImageQuality,
    ) -> GatewayResult<Option<GeneratedImage>> {
        Ok(None)
    }

    async fn generate_video_with_cancel(
        &self,
        _prompt: &str,
        _aspect_ratio: VideoAspectRatio,
        _cancel: CancellationToken,
    ) -> GatewayResult<MediaReference> {
        Err(GatewayError::Cancelled)
    }
}

pub fn requirement(id: &str, priority: Priority) -> FunctionalRequirement {
    FunctionalRequirement {
        id: id.to_string(),
        title: format!("Requirement {}", id),
        description: "Track widgets".to_string(),
        priority,
        sub_tasks: vec![SubTask {
            title: "Implement".to_string(),
            description: "Write it".to_string(),
            acceptance_criteria: vec!["Works".to_string()],
        }],
    }
}

pub fn acme_document() -> Document {
    Document {
        id: String::new(),
        product_name: "Acme".to_string(),
        vision: "Never lose a widget".to_string(),
        problem_statement: "Widgets go missing".to_string(),
        market_context: "Manual spreadsheets".to_string(),
        target_audience: vec!["Operations teams".to_string()],
        goals: vec!["Find widgets fast".to_string()],
        user_stories: vec![],
        functional_requirements: vec![
            requirement("FR-1", Priority::High),
            requirement("FR-2", Priority::Medium),
            requirement("FR-3", Priority::Low),
        ],
        non_functional_requirements: vec![],
        success_metrics: vec![],
        risks: vec![],
        technical_constraints: vec![],
        roadmap: vec![RoadmapPhase {
            phase: "MVP".to_string(),
            duration: "4 weeks".to_string(),
            milestones: vec!["Beta".to_string()],
        }],
    }
}

pub fn acme_inputs() -> FormInputs {
    FormInputs {
        name: "Acme".to_string(),
        description: "a widget tracker".to_string(),
        ..Default::default()
    }
}

pub fn memory_store() -> StateStore {
    StateStore::new(Arc::new(MemoryStore::new()))
}

pub fn controller(
    gateway: Arc<dyn Gateway>,
    store: StateStore,
    hub: &SyncHub,
) -> DocumentController {
    DocumentController::new(gateway, store, hub.connect(blueprint_core::SYNC_CHANNEL_NAME))
}
