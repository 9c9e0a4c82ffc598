// ABOUTME: Document studio for Blueprint
// ABOUTME: State controller, cross-instance sync, templates, media lab, views and export

pub mod controller;
pub mod error;
pub mod export_service;
pub mod media_lab;
pub mod sync;
pub mod templates;
pub mod views;

pub use controller::{ControllerState, DocumentController};
pub use error::{Result, StudioError};
pub use export_service::{ExportFormat, ExportOptions, ExportResult, ExportService};
pub use media_lab::{MediaAsset, MediaLab};
pub use sync::{SyncHub, SyncMessage, SyncPort, SyncPublisher};
pub use templates::TemplateManager;
pub use views::{comment_counts, comments_for_section, filter_requirements};
