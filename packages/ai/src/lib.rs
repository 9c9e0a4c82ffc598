// ABOUTME: AI gateway integration for Blueprint
// ABOUTME: Gemini client, prompt and schema construction, response validation and media jobs

pub mod config;
pub mod error;
pub mod gateway;
pub mod media;
pub mod prompts;
pub mod schema;
pub mod service;

pub use config::{ConfigError, GatewayConfig};
pub use error::{ErrorStatus, GatewayError, GatewayResult, GenerationError};
pub use gateway::{Gateway, GeminiGateway};
pub use media::{GeneratedImage, ImageAspectRatio, ImageQuality, MediaReference, VideoAspectRatio};
pub use service::{GeminiService, UsageMetadata};

// Callers pass cancellation tokens to long-running media jobs
pub use tokio_util::sync::CancellationToken;
