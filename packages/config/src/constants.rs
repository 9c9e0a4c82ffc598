// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Blueprint

// Credentials
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const API_KEY: &str = "API_KEY"; // Legacy

// AI Gateway
pub const BLUEPRINT_API_BASE_URL: &str = "BLUEPRINT_API_BASE_URL";
pub const BLUEPRINT_DOCUMENT_MODEL: &str = "BLUEPRINT_DOCUMENT_MODEL";
pub const BLUEPRINT_TIP_MODEL: &str = "BLUEPRINT_TIP_MODEL";
pub const BLUEPRINT_IMAGE_MODEL: &str = "BLUEPRINT_IMAGE_MODEL";
pub const BLUEPRINT_VIDEO_MODEL: &str = "BLUEPRINT_VIDEO_MODEL";
pub const BLUEPRINT_THINKING_BUDGET: &str = "BLUEPRINT_THINKING_BUDGET";
pub const BLUEPRINT_HTTP_TIMEOUT_SECS: &str = "BLUEPRINT_HTTP_TIMEOUT_SECS";

// Video job polling
pub const BLUEPRINT_VIDEO_POLL_INTERVAL_SECS: &str = "BLUEPRINT_VIDEO_POLL_INTERVAL_SECS";
pub const BLUEPRINT_VIDEO_TIMEOUT_SECS: &str = "BLUEPRINT_VIDEO_TIMEOUT_SECS";

// Local state
pub const BLUEPRINT_DATA_DIR: &str = "BLUEPRINT_DATA_DIR";
pub const BLUEPRINT_AUTHOR: &str = "BLUEPRINT_AUTHOR";

// System Environment Variables
pub const HOME: &str = "HOME";
pub const RUST_LOG: &str = "RUST_LOG";
