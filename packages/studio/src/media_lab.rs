// ABOUTME: Visual asset generation for a product
// ABOUTME: Holds the working prompt and the most recent image or video

use std::sync::Arc;

use blueprint_ai::prompts::default_media_prompt;
use blueprint_ai::{
    CancellationToken, Gateway, GeneratedImage, ImageAspectRatio, ImageQuality, MediaReference,
    VideoAspectRatio,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, StudioError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaAsset {
    Image(GeneratedImage),
    Video(MediaReference),
}

pub struct MediaLab {
    gateway: Arc<dyn Gateway>,
    prompt: String,
    asset: Option<MediaAsset>,
}

impl MediaLab {
    pub fn new(gateway: Arc<dyn Gateway>, product_name: &str) -> Self {
        Self {
            gateway,
            prompt: default_media_prompt(product_name),
            asset: None,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the working prompt; blank prompts are rejected
    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> Result<()> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StudioError::InvalidInput("Prompt is required".to_string()));
        }
        self.prompt = prompt;
        Ok(())
    }

    pub fn asset(&self) -> Option<&MediaAsset> {
        self.asset.as_ref()
    }

    pub async fn generate_image(
        &mut self,
        aspect_ratio: ImageAspectRatio,
        quality: ImageQuality,
    ) -> Result<GeneratedImage> {
        let image = self
            .gateway
            .generate_image(&self.prompt, aspect_ratio, quality)
            .await?
            .ok_or_else(|| {
                warn!("Image generation returned no image");
                StudioError::NoMedia
            })?;

        info!("Generated {} image ({} base64 bytes)", quality, image.data.len());
        self.asset = Some(MediaAsset::Image(image.clone()));
        Ok(image)
    }

    pub async fn generate_video(&mut self, aspect_ratio: VideoAspectRatio) -> Result<MediaReference> {
        self.generate_video_with_cancel(aspect_ratio, CancellationToken::new())
            .await
    }

    pub async fn generate_video_with_cancel(
        &mut self,
        aspect_ratio: VideoAspectRatio,
        cancel: CancellationToken,
    ) -> Result<MediaReference> {
        let video = self
            .gateway
            .generate_video_with_cancel(&self.prompt, aspect_ratio, cancel)
            .await?;

        info!("Generated {} video", aspect_ratio);
        self.asset = Some(MediaAsset::Video(video.clone()));
        Ok(video)
    }
}
