use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use blueprint_ai::{CancellationToken, ImageAspectRatio, ImageQuality, VideoAspectRatio};
use blueprint_cli::Session;
use blueprint_studio::MediaLab;
use clap::Subcommand;
use colored::*;

#[derive(Subcommand)]
pub enum MediaCommands {
    /// Generate a product visual
    Image {
        /// Prompt; defaults to a dashboard shot of the current product
        #[arg(short, long)]
        prompt: Option<String>,
        /// 1:1, 3:4, 4:3, 9:16, 16:9 or 21:9
        #[arg(short, long, default_value = "16:9")]
        aspect_ratio: String,
        /// 1K, 2K or 4K
        #[arg(short, long, default_value = "1K")]
        quality: String,
        /// Where to write the image
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generate a short product video (takes several minutes)
    Video {
        #[arg(short, long)]
        prompt: Option<String>,
        /// 16:9 or 9:16
        #[arg(short, long, default_value = "16:9")]
        aspect_ratio: String,
    },
}

async fn lab(session: &Session, prompt: Option<String>) -> Result<MediaLab> {
    let product = session
        .controller
        .document()
        .await
        .map(|doc| doc.product_name)
        .unwrap_or_else(|| "a new product".to_string());

    let mut lab = MediaLab::new(Arc::clone(&session.gateway), &product);
    if let Some(prompt) = prompt {
        lab.set_prompt(prompt)?;
    }
    Ok(lab)
}

pub async fn handle_media_command(session: &Session, command: MediaCommands) -> Result<()> {
    match command {
        MediaCommands::Image {
            prompt,
            aspect_ratio,
            quality,
            out,
        } => {
            let aspect_ratio: ImageAspectRatio = aspect_ratio.parse().map_err(|e: String| anyhow!(e))?;
            let quality: ImageQuality = quality.parse().map_err(|e: String| anyhow!(e))?;
            let mut lab = lab(session, prompt).await?;

            println!("{} {}", "Rendering:".blue(), lab.prompt().dimmed());
            let image = lab.generate_image(aspect_ratio, quality).await?;

            let path = out.unwrap_or_else(|| {
                PathBuf::from(format!("blueprint-visual.{}", image.extension()))
            });
            let bytes = image.bytes()?;
            tokio::fs::write(&path, &bytes).await?;
            println!(
                "{} Saved {} ({} bytes) to {}",
                "✓".green(),
                image.mime_type,
                bytes.len(),
                path.display()
            );
            Ok(())
        }
        MediaCommands::Video {
            prompt,
            aspect_ratio,
        } => {
            let aspect_ratio: VideoAspectRatio = aspect_ratio.parse().map_err(|e: String| anyhow!(e))?;
            let mut lab = lab(session, prompt).await?;

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            println!(
                "{} {} (Ctrl-C to cancel)",
                "Rendering video:".blue(),
                lab.prompt().dimmed()
            );
            let video = lab.generate_video_with_cancel(aspect_ratio, cancel).await?;
            println!("{} Download: {}", "✓".green(), video.uri);
            Ok(())
        }
    }
}
