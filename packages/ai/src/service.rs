// ABOUTME: Gemini REST client for content generation and long-running video jobs
// ABOUTME: Handles API requests, error classification, response text extraction and usage logging

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult, API_KEY_INVALID_MARKER};
use crate::media::GeneratedImage;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One part of a request or response message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing)]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
    pub image_size: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A single user turn made of the given parts
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: None,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    #[allow(dead_code)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
    }

    /// Concatenated answer text of the first candidate, skipping thought parts
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image of the first candidate
    pub fn first_image(&self) -> Option<GeneratedImage> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.mime_type.starts_with("image/") || d.mime_type.is_empty())
            .map(|d| GeneratedImage {
                mime_type: if d.mime_type.is_empty() {
                    "image/png".to_string()
                } else {
                    d.mime_type.clone()
                },
                data: d.data.clone(),
            })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    aspect_ratio: String,
    resolution: String,
    number_of_videos: u32,
}

#[derive(Debug, Serialize)]
struct PredictLongRunningRequest {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// A long-running job handle, as returned by start and poll calls
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationError>,
    pub response: Option<Value>,
}

impl Operation {
    /// URI of the first generated video in a finished job
    pub fn video_uri(&self) -> Option<String> {
        let response = self.response.as_ref()?;
        let samples = response
            .pointer("/generateVideoResponse/generatedSamples")
            .or_else(|| response.pointer("/generatedVideos"))?;
        samples
            .get(0)?
            .pointer("/video/uri")?
            .as_str()
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Low-level client for the Gemini REST API
pub struct GeminiService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiService {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn require_key(&self) -> GatewayResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            error!("No API key configured for the AI gateway");
            GatewayError::Auth("No API key configured.".to_string())
        })
    }

    /// POST models/{model}:generateContent
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GatewayResult<GenerateContentResponse> {
        let api_key = self.require_key()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        info!(
            "Making Gemini generateContent request: model={}, parts={}",
            model,
            request.contents.iter().map(|c| c.parts.len()).sum::<usize>()
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                GatewayError::from(e)
            })?;

        let response = Self::check_status(response).await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Unknown(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &parsed.usage_metadata {
            info!(
                "Gemini response received (tokens: prompt={}, candidates={}, total={})",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        Ok(parsed)
    }

    /// POST models/{model}:predictLongRunning
    pub async fn start_video_job(
        &self,
        model: &str,
        prompt: &str,
        aspect_ratio: &str,
    ) -> GatewayResult<Operation> {
        let api_key = self.require_key()?;
        let url = format!("{}/models/{}:predictLongRunning", self.base_url, model);
        let body = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: prompt.to_string(),
            }],
            parameters: VideoParameters {
                aspect_ratio: aspect_ratio.to_string(),
                resolution: "720p".to_string(),
                number_of_videos: 1,
            },
        };

        info!("Starting video job: model={}, aspect_ratio={}", model, aspect_ratio);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::Unknown(format!("Failed to parse operation: {}", e)))
    }

    /// GET {operation name}
    pub async fn get_operation(&self, name: &str) -> GatewayResult<Operation> {
        let api_key = self.require_key()?;
        let url = format!("{}/{}", self.base_url, name.trim_start_matches('/'));

        debug!("Polling operation {}", name);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::Unknown(format!("Failed to parse operation: {}", e)))
    }

    /// Turn non-success responses into classified errors
    async fn check_status(response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("Gemini API error: {} - {}", status, error_text);

        Err(Self::classify_error(status, &error_text))
    }

    fn classify_error(status: StatusCode, body: &str) -> GatewayError {
        if body.contains(API_KEY_INVALID_MARKER)
            || status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
        {
            return GatewayError::invalid_api_key();
        }

        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| {
                if b.error.status.is_empty() {
                    b.error.message
                } else {
                    format!("{}: {}", b.error.status, b.error.message)
                }
            })
            .unwrap_or_else(|_| body.to_string());

        GatewayError::Unknown(format!("API returned {}: {}", status, detail))
    }
}

/// Strip markdown code fences if present (```json ... ```)
pub fn strip_code_fences(text: &str) -> &str {
    let cleaned_text = text.trim();
    if cleaned_text.starts_with("```") {
        let start = cleaned_text.find('\n').map(|i| i + 1).unwrap_or(0);
        let end = cleaned_text[start..]
            .rfind("```")
            .map(|i| i + start)
            .unwrap_or(cleaned_text.len());
        cleaned_text[start..end].trim()
    } else {
        cleaned_text
    }
}
