// ABOUTME: Gateway trait and its Gemini-backed implementation
// ABOUTME: Document generation, quick tips, image generation and polled video jobs

use async_trait::async_trait;
use blueprint_core::{generate_timestamp_id, validate_document, Document, FormInputs};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::media::{GeneratedImage, ImageAspectRatio, ImageQuality, MediaReference, VideoAspectRatio};
use crate::prompts::document_prompt;
use crate::schema::document_response_schema;
use crate::service::{
    strip_code_fences, GeminiService, GenerateContentRequest, GenerationConfig, ImageConfig,
    Operation, Part, ThinkingConfig,
};

/// Integration boundary to the generative backend
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generate, validate and stamp a new document
    async fn generate_document(&self, inputs: &FormInputs) -> GatewayResult<Document>;

    /// One-shot plain text answer from the fast model
    async fn quick_tip(&self, prompt: &str) -> GatewayResult<String>;

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: ImageAspectRatio,
        quality: ImageQuality,
    ) -> GatewayResult<Option<GeneratedImage>>;

    async fn generate_video_with_cancel(
        &self,
        prompt: &str,
        aspect_ratio: VideoAspectRatio,
        cancel: CancellationToken,
    ) -> GatewayResult<MediaReference>;

    async fn generate_video(
        &self,
        prompt: &str,
        aspect_ratio: VideoAspectRatio,
    ) -> GatewayResult<MediaReference> {
        self.generate_video_with_cancel(prompt, aspect_ratio, CancellationToken::new())
            .await
    }
}

/// Build the request parts for a document: the prompt, then one part per context file
pub fn document_parts(inputs: &FormInputs) -> Vec<Part> {
    let mut parts = vec![Part::text(document_prompt(inputs))];
    for file in &inputs.context_files {
        if file.is_image() {
            parts.push(Part::inline(file.mime_type.clone(), file.base64_payload()));
        } else {
            parts.push(Part::text(format!(
                "Content of file \"{}\":\n{}",
                file.name, file.data
            )));
        }
    }
    parts
}

pub struct GeminiGateway {
    service: GeminiService,
    config: GatewayConfig,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let service = GeminiService::new(&config)?;
        Ok(Self { service, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn parse_document(text: &str) -> GatewayResult<Document> {
        let json = strip_code_fences(text);
        let mut document: Document = serde_json::from_str(json).map_err(|e| {
            error!("Failed to parse generated document: {}", e);
            GatewayError::Unknown(format!("Failed to parse generated document: {}", e))
        })?;

        if let Err(e) = validate_document(&document) {
            warn!("Generated document failed validation: {}", e);
            return Err(GatewayError::Unknown(format!(
                "Generated document is invalid: {}",
                e
            )));
        }

        document.id = generate_timestamp_id();
        Ok(document)
    }

    async fn wait_for_video(
        &self,
        mut operation: Operation,
        api_key: &str,
    ) -> GatewayResult<MediaReference> {
        let mut polls = 0u32;
        loop {
            if operation.done {
                if let Some(err) = operation.error {
                    error!("Video job {} failed: {}", operation.name, err.message);
                    return Err(GatewayError::from_message(err.message));
                }
                let uri = operation.video_uri().ok_or_else(|| {
                    GatewayError::Unknown("Video job finished without a video.".to_string())
                })?;
                info!("Video job {} finished after {} polls", operation.name, polls);
                return Ok(MediaReference::with_api_key(&uri, api_key));
            }

            tokio::time::sleep(self.config.video_poll_interval).await;
            polls += 1;
            debug!("Video job {} not done, poll #{}", operation.name, polls);
            operation = self.service.get_operation(&operation.name).await?;
        }
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn generate_document(&self, inputs: &FormInputs) -> GatewayResult<Document> {
        info!(
            "Generating document for '{}' with {} context files",
            inputs.name,
            inputs.context_files.len()
        );

        let request = GenerateContentRequest::user(document_parts(inputs)).with_config(
            GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(document_response_schema()),
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: self.config.thinking_budget,
                }),
                image_config: None,
            },
        );

        let response = self
            .service
            .generate_content(&self.config.document_model, &request)
            .await?;
        let text = response.text().ok_or(GatewayError::EmptyResponse)?;
        debug!("Document response is {} bytes", text.len());

        Self::parse_document(&text)
    }

    async fn quick_tip(&self, prompt: &str) -> GatewayResult<String> {
        let request = GenerateContentRequest::user(vec![Part::text(prompt)]);
        let response = self
            .service
            .generate_content(&self.config.tip_model, &request)
            .await?;
        response
            .text()
            .map(|tip| tip.trim().to_string())
            .ok_or(GatewayError::EmptyResponse)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: ImageAspectRatio,
        quality: ImageQuality,
    ) -> GatewayResult<Option<GeneratedImage>> {
        info!(
            "Generating image: aspect_ratio={}, quality={}",
            aspect_ratio, quality
        );

        let request = GenerateContentRequest::user(vec![Part::text(prompt)]).with_config(
            GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: aspect_ratio.to_string(),
                    image_size: quality.to_string(),
                }),
                ..Default::default()
            },
        );

        let response = self
            .service
            .generate_content(&self.config.image_model, &request)
            .await?;
        let image = response.first_image();
        if image.is_none() {
            warn!("Image response contained no inline image");
        }
        Ok(image)
    }

    async fn generate_video_with_cancel(
        &self,
        prompt: &str,
        aspect_ratio: VideoAspectRatio,
        cancel: CancellationToken,
    ) -> GatewayResult<MediaReference> {
        let api_key = self
            .service
            .api_key()
            .ok_or_else(|| GatewayError::Auth("No API key configured.".to_string()))?
            .to_string();

        let timeout = self.config.video_timeout;
        let job = async {
            let operation = self
                .service
                .start_video_job(&self.config.video_model, prompt, aspect_ratio.as_str())
                .await?;
            info!("Video job started: {}", operation.name);
            self.wait_for_video(operation, &api_key).await
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Video generation cancelled");
                Err(GatewayError::Cancelled)
            }
            result = tokio::time::timeout(timeout, job) => match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!("Video generation timed out after {:?}", timeout);
                    Err(GatewayError::Timeout(timeout))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorStatus;
    use blueprint_core::{ContextFile, Priority};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOC_PATH: &str = "/models/gemini-3-pro-preview:generateContent";

    fn config(server: &MockServer) -> GatewayConfig {
        let mut config = GatewayConfig::default()
            .with_api_key("test-key")
            .with_base_url(server.uri());
        config.video_poll_interval = Duration::from_millis(10);
        config.video_timeout = Duration::from_secs(5);
        config
    }

    fn acme_inputs() -> FormInputs {
        FormInputs {
            name: "Acme".to_string(),
            description: "a widget tracker".to_string(),
            ..Default::default()
        }
    }

    fn document_json() -> Value {
        json!({
            "productName": "Acme",
            "vision": "Track every widget",
            "problemStatement": "Widgets get lost",
            "marketContext": "Crowded",
            "targetAudience": ["Warehouse staff"],
            "goals": ["Find widgets"],
            "userStories": [{"role": "manager", "action": "see stock", "benefit": "plan"}],
            "functionalRequirements": [{
                "id": "FR-1",
                "title": "Widget list",
                "description": "List widgets",
                "priority": "High",
                "subTasks": [{"title": "Table", "description": "Render", "acceptanceCriteria": ["Shows rows"]}]
            }],
            "nonFunctionalRequirements": ["Fast"],
            "successMetrics": ["DAU"],
            "risks": [{"title": "Adoption", "impact": "Medium", "mitigation": "Training"}],
            "technicalConstraints": ["Web only"],
            "roadmap": [{"phase": "MVP", "duration": "4 weeks", "milestones": ["Launch"]}]
        })
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 20, "totalTokenCount": 30}
        }))
    }

    #[tokio::test]
    async fn test_generate_document_sends_prompt_and_stamps_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOC_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(text_response(&document_json().to_string()))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let doc = gateway.generate_document(&acme_inputs()).await.unwrap();

        assert!(!doc.id.is_empty());
        assert_eq!(doc.product_name, "Acme");
        assert_eq!(doc.functional_requirements[0].priority, Priority::High);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        let prompt = parts[0]["text"].as_str().unwrap();
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("a widget tracker"));
        assert!(parts.iter().all(|p| p.get("inlineData").is_none()));

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["thinkingConfig"]["thinkingBudget"], 32768);
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_document_parts_for_context_files() {
        let mut inputs = acme_inputs();
        inputs.context_files = vec![
            ContextFile {
                name: "logo.png".to_string(),
                mime_type: "image/png".to_string(),
                data: "data:image/png;base64,QUJD".to_string(),
            },
            ContextFile {
                name: "notes.md".to_string(),
                mime_type: "text/markdown".to_string(),
                data: "# Notes".to_string(),
            },
        ];

        let parts = document_parts(&inputs);
        assert_eq!(parts.len(), 3);
        let inline = parts[1].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "QUJD");
        assert_eq!(
            parts[2].text.as_deref(),
            Some("Content of file \"notes.md\":\n# Notes")
        );
    }

    #[tokio::test]
    async fn test_invalid_key_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOC_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{"reason": "API_KEY_INVALID"}]
                }
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let err = gateway.generate_document(&acme_inputs()).await.unwrap_err();
        assert_eq!(err.status(), ErrorStatus::AuthError);
        assert_eq!(err.to_string(), "Invalid API Key.");
    }

    #[tokio::test]
    async fn test_missing_key_is_auth_error() {
        let server = MockServer::start().await;
        let mut config = config(&server);
        config.api_key = None;

        let gateway = GeminiGateway::new(config).unwrap();
        let err = gateway.generate_document(&acme_inputs()).await.unwrap_err();
        assert_eq!(err.status(), ErrorStatus::AuthError);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOC_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": []}, "finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let err = gateway.generate_document(&acme_inputs()).await.unwrap_err();
        assert_eq!(err.status(), ErrorStatus::EmptyResponse);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected() {
        let server = MockServer::start().await;
        let mut payload = document_json();
        payload["functionalRequirements"][0]["subTasks"] = json!([]);
        Mock::given(method("POST"))
            .and(path(DOC_PATH))
            .respond_with(text_response(&payload.to_string()))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let err = gateway.generate_document(&acme_inputs()).await.unwrap_err();
        assert_eq!(err.status(), ErrorStatus::Unknown);
        assert!(err.to_string().contains("invalid"));
    }

    #[tokio::test]
    async fn test_server_error_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOC_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let err = gateway.generate_document(&acme_inputs()).await.unwrap_err();
        assert_eq!(err.status(), ErrorStatus::Unknown);
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_quick_tip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash-lite-latest:generateContent"))
            .respond_with(text_response("  Ship small.\n"))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        assert_eq!(gateway.quick_tip("tip please").await.unwrap(), "Ship small.");
    }

    #[tokio::test]
    async fn test_generate_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-pro-image-preview:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "QUJD"}}
                ]}}]
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let image = gateway
            .generate_image("a dashboard", ImageAspectRatio::Ultrawide, ImageQuality::High)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image.data_url(), "data:image/png;base64,QUJD");

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body["generationConfig"]["imageConfig"],
            json!({"aspectRatio": "21:9", "imageSize": "2K"})
        );
    }

    #[tokio::test]
    async fn test_generate_image_without_inline_part() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-pro-image-preview:generateContent"))
            .respond_with(text_response("I cannot draw that."))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let image = gateway
            .generate_image("a dashboard", ImageAspectRatio::Square, ImageQuality::Standard)
            .await
            .unwrap();
        assert!(image.is_none());
    }

    async fn mount_video_start(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/models/veo-3.1-fast-generate-preview:predictLongRunning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "models/veo-3.1-fast-generate-preview/operations/op1"
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_video_polls_until_done() {
        let server = MockServer::start().await;
        mount_video_start(&server).await;

        let op_path = "/models/veo-3.1-fast-generate-preview/operations/op1";
        Mock::given(method("GET"))
            .and(path(op_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "models/veo-3.1-fast-generate-preview/operations/op1",
                "done": false
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(op_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "models/veo-3.1-fast-generate-preview/operations/op1",
                "done": true,
                "response": {"generateVideoResponse": {"generatedSamples": [
                    {"video": {"uri": "https://files.example/v1/video:download?alt=media"}}
                ]}}
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let video = gateway
            .generate_video("a teaser", VideoAspectRatio::Portrait)
            .await
            .unwrap();
        assert_eq!(
            video.uri,
            "https://files.example/v1/video:download?alt=media&key=test-key"
        );

        let requests = server.received_requests().await.unwrap();
        let start: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(start["instances"][0]["prompt"], "a teaser");
        assert_eq!(start["parameters"]["aspectRatio"], "9:16");
        assert_eq!(start["parameters"]["resolution"], "720p");
        // one start plus three polls
        assert_eq!(requests.len(), 4);
    }

    #[tokio::test]
    async fn test_video_failed_job_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/veo-3.1-fast-generate-preview:predictLongRunning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op2",
                "done": true,
                "error": {"code": 3, "message": "prompt rejected"}
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let err = gateway
            .generate_video("a teaser", VideoAspectRatio::Landscape)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "prompt rejected");
    }

    #[tokio::test]
    async fn test_video_times_out() {
        let server = MockServer::start().await;
        mount_video_start(&server).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "models/veo-3.1-fast-generate-preview/operations/op1",
                "done": false
            })))
            .mount(&server)
            .await;

        let mut config = config(&server);
        config.video_timeout = Duration::from_millis(100);
        let gateway = GeminiGateway::new(config).unwrap();
        let err = gateway
            .generate_video("a teaser", VideoAspectRatio::Landscape)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_video_honours_cancellation() {
        let server = MockServer::start().await;
        mount_video_start(&server).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "models/veo-3.1-fast-generate-preview/operations/op1",
                "done": false
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(config(&server)).unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let canceller = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        };

        let (result, _) = tokio::join!(
            gateway.generate_video_with_cancel("a teaser", VideoAspectRatio::Landscape, cancel),
            canceller
        );
        assert!(matches!(result, Err(GatewayError::Cancelled)));
    }

    #[tokio::test]
    async fn test_video_requires_key_before_any_request() {
        let server = MockServer::start().await;
        let mut config = config(&server);
        config.api_key = None;

        let gateway = GeminiGateway::new(config).unwrap();
        let err = gateway
            .generate_video("a teaser", VideoAspectRatio::Landscape)
            .await
            .unwrap_err();
        assert_eq!(err.status(), ErrorStatus::AuthError);
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
