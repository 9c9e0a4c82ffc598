// ABOUTME: Core types, traits, and utilities for Blueprint
// ABOUTME: Foundational package providing the document model shared across all Blueprint packages

pub mod constants;
pub mod files;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    Comment, ContextFile, Document, FormInputs, FunctionalRequirement, Priority, Risk,
    RoadmapPhase, RoadmapPhaseHint, SubTask, Template, UserStory,
};

// Re-export constants
pub use constants::{blueprint_dir, database_file, SYNC_CHANNEL_NAME};

// Re-export utilities
pub use files::{mime_type_for_path, read_context_file};
pub use utils::{current_timestamp_millis, generate_timestamp_id};

// Re-export validation
pub use validation::{validate_document, ValidationError};
