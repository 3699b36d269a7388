// src/gateway/http.rs

//! Production gateway client.
//!
//! Talks to a Gemini-style `generateContent` endpoint: the source image (and
//! optional mask) are sent as base64 inline parts together with the
//! instruction text, and the first inline image part of the first candidate
//! is the transformed result.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GatewayError;
use crate::gateway::client::{ImageGateway, TransformRequest};
use crate::types::ImageData;

/// Mime type assumed for transformed images when the response omits one.
const DEFAULT_OUTPUT_MIME: &str = "image/png";

/// HTTP gateway backed by `reqwest`.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpGateway {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn transform_inner(&self, request: TransformRequest) -> Result<ImageData, GatewayError> {
        let mut parts = vec![Part::inline(&request.source)];
        if let Some(mask) = &request.mask {
            parts.push(Part::inline(mask));
        }
        parts.push(Part::text(&request.instruction));

        let body = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".into(), "TEXT".into()],
            },
        };

        debug!(
            instruction = %request.instruction,
            masked = request.mask.is_some(),
            "sending transformation request"
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(GatewayError::BlockedByPolicy {
                reason: reason.to_string(),
            });
        }

        let image_part = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .find_map(|p| p.inline_data);

        let Some(inline) = image_part else {
            return Err(GatewayError::NoImageReturned);
        };

        let bytes = BASE64
            .decode(inline.data.as_bytes())
            .map_err(|e| GatewayError::Transport(format!("invalid base64 in response: {e}")))?;

        let mime = inline
            .mime_type
            .unwrap_or_else(|| DEFAULT_OUTPUT_MIME.to_string());

        Ok(ImageData::new(bytes, mime))
    }
}

impl ImageGateway for HttpGateway {
    fn transform(
        &self,
        request: TransformRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ImageData, GatewayError>> + Send + '_>> {
        Box::pin(self.transform_inner(request))
    }
}

// Wire format. Field names follow the remote API's camelCase convention.

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
}

impl Part {
    fn inline(image: &ImageData) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: Some(image.mime.clone()),
                data: BASE64.encode(&image.bytes),
            }),
            text: None,
        }
    }

    fn text(text: &str) -> Self {
        Self {
            inline_data: None,
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none", default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason", default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
