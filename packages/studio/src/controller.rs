// ABOUTME: Document state controller, the single source of truth for the active document
// ABOUTME: Mediates between the AI gateway, the local store and the sync channel

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use blueprint_ai::{CancellationToken, Gateway, GenerationError};
use blueprint_ai::prompts::quick_tip_prompt;
use blueprint_core::constants::DEFAULT_COMMENT_AUTHOR;
use blueprint_core::{
    current_timestamp_millis, generate_timestamp_id, Comment, Document, FormInputs, Priority,
};
use blueprint_storage::StateStore;
use serde::Serialize;
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::sync::{SyncMessage, SyncPort, SyncPublisher};

/// Everything a renderer needs to draw the current state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
    pub document: Option<Document>,
    pub comments: Vec<Comment>,
    pub is_loading: bool,
    pub error: Option<GenerationError>,
    pub quick_tip: Option<String>,
}

pub struct DocumentController {
    gateway: Arc<dyn Gateway>,
    store: StateStore,
    state: Arc<RwLock<ControllerState>>,
    publisher: SyncPublisher,
    port: Arc<Mutex<SyncPort>>,
    author: String,
    // Guards against a slow tip from an earlier submission landing late
    submissions: Arc<AtomicU64>,
    // Latest submission whose tip call has finished, and its wakeup
    tips_settled: Arc<AtomicU64>,
    tip_ready: Arc<Notify>,
    // Cancelled on drop so background listeners stop with the controller
    shutdown: CancellationToken,
}

impl DocumentController {
    pub fn new(gateway: Arc<dyn Gateway>, store: StateStore, port: SyncPort) -> Self {
        Self {
            gateway,
            store,
            state: Arc::new(RwLock::new(ControllerState::default())),
            publisher: port.publisher(),
            port: Arc::new(Mutex::new(port)),
            author: DEFAULT_COMMENT_AUTHOR.to_string(),
            submissions: Arc::new(AtomicU64::new(0)),
            tips_settled: Arc::new(AtomicU64::new(0)),
            tip_ready: Arc::new(Notify::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Override the author label stamped onto new comments
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        if !author.trim().is_empty() {
            self.author = author;
        }
        self
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Load the persisted document and comments into memory
    pub async fn hydrate(&self) -> Result<()> {
        let document = self.store.load_document().await?;
        let comments = self.store.load_comments().await?;
        debug!(
            "Hydrated controller: document={}, comments={}",
            document.is_some(),
            comments.len()
        );

        let mut state = self.state.write().await;
        state.document = document;
        state.comments = comments;
        Ok(())
    }

    pub async fn snapshot(&self) -> ControllerState {
        self.state.read().await.clone()
    }

    pub async fn document(&self) -> Option<Document> {
        self.state.read().await.document.clone()
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.state.read().await.comments.clone()
    }

    /// Generate a new document from form inputs.
    ///
    /// On success the document replaces the current one, comments are cleared,
    /// both are persisted and broadcast. On failure the error is recorded and
    /// the previous document is kept.
    pub async fn submit(&self, inputs: FormInputs) -> Result<Document> {
        let ticket = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
            state.quick_tip = None;
        }

        self.spawn_quick_tip(&inputs, ticket);

        info!("Submitting generation for '{}'", inputs.name);
        let outcome = self.gateway.generate_document(&inputs).await;

        let result = match outcome {
            Ok(document) => self.install_document(document).await,
            Err(e) => {
                error!("Document generation failed: {}", e);
                let mut state = self.state.write().await;
                state.error = Some(GenerationError::from(&e));
                Err(e.into())
            }
        };

        self.state.write().await.is_loading = false;
        result
    }

    async fn install_document(&self, document: Document) -> Result<Document> {
        {
            let mut state = self.state.write().await;
            state.document = Some(document.clone());
            state.comments.clear();
        }

        self.store.save_document(&document).await?;
        self.store.save_comments(&[]).await?;

        self.publisher
            .publish(SyncMessage::SyncDocument(Some(document.clone())));
        self.publisher.publish(SyncMessage::SyncComments(Vec::new()));

        info!(
            "Installed document {} with {} requirements",
            document.id,
            document.functional_requirements.len()
        );
        Ok(document)
    }

    fn spawn_quick_tip(&self, inputs: &FormInputs, ticket: u64) {
        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let submissions = Arc::clone(&self.submissions);
        let settled = Arc::clone(&self.tips_settled);
        let ready = Arc::clone(&self.tip_ready);
        let prompt = quick_tip_prompt(inputs);

        tokio::spawn(async move {
            match gateway.quick_tip(&prompt).await {
                Ok(tip) => {
                    if submissions.load(Ordering::SeqCst) == ticket {
                        state.write().await.quick_tip = Some(tip);
                    }
                }
                Err(e) => debug!("Quick tip unavailable: {}", e),
            }
            settled.fetch_max(ticket, Ordering::SeqCst);
            ready.notify_waiters();
        });
    }

    /// Wait up to `limit` for the latest submission's tip call to finish.
    ///
    /// Returns the tip, or `None` when it failed, was superseded or took too long.
    pub async fn wait_for_quick_tip(&self, limit: Duration) -> Option<String> {
        let settle = async {
            loop {
                let notified = self.tip_ready.notified();
                if self.tips_settled.load(Ordering::SeqCst)
                    >= self.submissions.load(Ordering::SeqCst)
                {
                    return;
                }
                notified.await;
            }
        };

        if tokio::time::timeout(limit, settle).await.is_err() {
            debug!("Quick tip not ready after {:?}", limit);
            return None;
        }
        self.state.read().await.quick_tip.clone()
    }

    /// Append a comment to a section. Blank text is ignored.
    pub async fn add_comment(&self, section_id: &str, text: &str) -> Result<Option<Comment>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let comment = Comment {
            id: generate_timestamp_id(),
            section_id: section_id.to_string(),
            author: self.author.clone(),
            text: text.to_string(),
            timestamp: current_timestamp_millis(),
        };

        let comments = {
            let mut state = self.state.write().await;
            state.comments.push(comment.clone());
            state.comments.clone()
        };

        self.store.save_comments(&comments).await?;
        self.publisher.publish(SyncMessage::SyncComments(comments));
        debug!("Added comment {} to section '{}'", comment.id, section_id);

        Ok(Some(comment))
    }

    /// Change one requirement's priority. Returns false when nothing matched.
    pub async fn update_priority(&self, requirement_id: &str, priority: Priority) -> Result<bool> {
        let updated = {
            let mut state = self.state.write().await;
            let Some(current) = state.document.as_ref() else {
                return Ok(false);
            };
            if current.requirement(requirement_id).is_none() {
                return Ok(false);
            }

            let mut document = current.clone();
            document.functional_requirements = document
                .functional_requirements
                .into_iter()
                .map(|mut req| {
                    if req.id == requirement_id {
                        req.priority = priority;
                    }
                    req
                })
                .collect();
            state.document = Some(document.clone());
            document
        };

        self.store.save_document(&updated).await?;
        self.publisher
            .publish(SyncMessage::SyncDocument(Some(updated)));
        info!("Requirement {} priority set to {}", requirement_id, priority);

        Ok(true)
    }

    /// Drop the active document. Persisted comments are left alone.
    pub async fn reset(&self) -> Result<()> {
        // Any tip still in flight belongs to the cleared document
        let ticket = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        self.tips_settled.fetch_max(ticket, Ordering::SeqCst);
        {
            let mut state = self.state.write().await;
            state.document = None;
            state.error = None;
            state.quick_tip = None;
        }

        self.store.clear_document().await?;
        self.publisher.publish(SyncMessage::SyncDocument(None));
        info!("Document reset");
        Ok(())
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.error = None;
    }

    /// Replace local state with a message received from another instance
    pub async fn apply_sync(&self, message: SyncMessage) {
        apply_to(&self.state, message).await;
    }

    /// Apply every foreign message already queued; returns how many were applied
    pub async fn drain_sync(&self) -> usize {
        let mut applied = 0;
        loop {
            let next = self.port.lock().await.try_recv();
            match next {
                Some(message) => {
                    self.apply_sync(message).await;
                    applied += 1;
                }
                None => return applied,
            }
        }
    }

    /// Wait for and apply one foreign message; false once the controller has shut down
    pub async fn next_sync(&self) -> bool {
        let next = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            next = async { self.port.lock().await.recv().await } => next,
        };
        match next {
            Some(message) => {
                self.apply_sync(message).await;
                true
            }
            None => false,
        }
    }

    /// Stop background sync listeners. Also happens when the controller is dropped.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Apply foreign messages in the background until the controller shuts down.
    ///
    /// The listener owns the port while it waits, so `drain_sync` and
    /// `next_sync` block while it runs.
    pub fn spawn_sync_listener(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let port = Arc::clone(&self.port);
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        debug!("Controller shut down, sync listener exiting");
                        break;
                    }
                    next = async { port.lock().await.recv().await } => next,
                };
                match next {
                    Some(message) => apply_to(&state, message).await,
                    None => {
                        debug!("Sync topic closed, listener exiting");
                        break;
                    }
                }
            }
        })
    }
}

impl Drop for DocumentController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn apply_to(state: &RwLock<ControllerState>, message: SyncMessage) {
    debug!("Applying {} from another instance", message.kind());
    let mut state = state.write().await;
    match message {
        SyncMessage::SyncDocument(document) => state.document = document,
        SyncMessage::SyncComments(comments) => state.comments = comments,
    }
}
