// ABOUTME: Context file ingestion for generation requests
// ABOUTME: Images become base64 data URLs, everything else is read as text

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io;
use std::path::Path;
use tokio::fs;

use crate::types::ContextFile;

/// Guess a MIME type from the file extension
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "md" | "markdown" => "text/markdown",
        "json" => "application/json",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        _ => "text/plain",
    }
}

/// Read a file from disk into a [`ContextFile`]
pub async fn read_context_file(path: impl AsRef<Path>) -> io::Result<ContextFile> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_type_for_path(path);
    let bytes = fs::read(path).await?;

    let data = if mime_type.starts_with("image/") {
        format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes))
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };

    Ok(ContextFile {
        name,
        mime_type: mime_type.to_string(),
        data,
    })
}
