use super::{RecognitionError, Recognizer};
use crate::models::config::RecognitionConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for the Gemini generateContent endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_image_size: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Error body returned by Google APIs
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiClient {
    /// Create a new client from recognition settings
    pub fn new(api_key: impl Into<String>, config: &RecognitionConfig) -> Result<Self, String> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err("API key is empty".to_string());
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_image_size: config.max_image_size,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Shrink the image to fit the upload bound, keeping the aspect ratio
    fn prepare_image(image: &DynamicImage, max_size: u32) -> DynamicImage {
        if image.width() > max_size || image.height() > max_size {
            image.thumbnail(max_size, max_size)
        } else {
            image.clone()
        }
    }

    /// Encode image to base64 PNG
    fn encode_image(image: &DynamicImage) -> Result<String, String> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|e| format!("Failed to encode image: {}", e))?;
        Ok(general_purpose::STANDARD.encode(&buffer))
    }

    /// Map a non-success response to quota or generic failure
    fn classify_error(status: StatusCode, body: &str) -> RecognitionError {
        let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

        let message = parsed
            .as_ref()
            .map(|e| e.error.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.trim().to_string());

        let exhausted = status == StatusCode::TOO_MANY_REQUESTS
            || parsed
                .as_ref()
                .is_some_and(|e| e.error.status == "RESOURCE_EXHAUSTED");

        if exhausted {
            RecognitionError::QuotaExhausted(message)
        } else {
            RecognitionError::Failed(format!("Server error ({}): {}", status.as_u16(), message))
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: GenerateResponse) -> Result<String, RecognitionError> {
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            return Err(RecognitionError::Failed(
                "Response contained no text".to_string(),
            ));
        }

        Ok(texts.concat().trim().to_string())
    }
}

#[async_trait]
impl Recognizer for GeminiClient {
    async fn recognize(
        &self,
        prompt: &str,
        image: &DynamicImage,
    ) -> Result<String, RecognitionError> {
        let prepared = Self::prepare_image(image, self.max_image_size);
        let data = Self::encode_image(&prepared).map_err(RecognitionError::Failed)?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::Image {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data,
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::Failed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::classify_error(status, &body));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Failed(format!("Failed to parse response: {}", e)))?;

        Self::extract_text(data)
    }
}
