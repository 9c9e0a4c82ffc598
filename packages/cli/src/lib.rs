// ABOUTME: Library side of the Blueprint command-line driver
// ABOUTME: Configuration, logging setup, input building and session wiring

pub mod config;
pub mod inputs;

use std::sync::Arc;

use anyhow::{Context, Result};
use blueprint_ai::{Gateway, GeminiGateway};
use blueprint_core::SYNC_CHANNEL_NAME;
use blueprint_storage::{SqliteStore, StateStore};
use blueprint_studio::{DocumentController, SyncHub, TemplateManager};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use config::Config;

/// Install the global tracing subscriber, honouring RUST_LOG
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "blueprint=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Everything one command invocation works with
pub struct Session {
    pub config: Config,
    pub store: StateStore,
    pub gateway: Arc<dyn Gateway>,
    pub controller: DocumentController,
    pub templates: TemplateManager,
}

impl Session {
    /// Open the on-disk store, connect to the sync topic and hydrate state
    pub async fn open(config: Config) -> Result<Self> {
        let db_path = config.database_path();
        let sqlite = SqliteStore::open(&db_path)
            .await
            .with_context(|| format!("Failed to open local store at {}", db_path.display()))?;
        let store = StateStore::new(Arc::new(sqlite));
        debug!("Opened local store at {}", db_path.display());

        let gateway: Arc<dyn Gateway> = Arc::new(
            GeminiGateway::new(config.gateway.clone()).context("Failed to build AI gateway")?,
        );

        let hub = SyncHub::new();
        let controller = DocumentController::new(
            Arc::clone(&gateway),
            store.clone(),
            hub.connect(SYNC_CHANNEL_NAME),
        )
        .with_author(config.author.clone());
        controller
            .hydrate()
            .await
            .context("Failed to load saved document")?;

        let templates = TemplateManager::new(store.clone());
        debug!(
            "Session ready: author={}, document loaded={}",
            config.author,
            controller.document().await.is_some()
        );

        Ok(Self {
            config,
            store,
            gateway,
            controller,
            templates,
        })
    }
}
