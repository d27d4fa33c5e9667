use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ai_service::AIService;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate joined together, if there are any.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct GeminiService {
    api_key: String,
    model: String,
    api_base: String,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(api_key: String, model: String, api_base: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Gemini HTTP client")?;

        Ok(Self {
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request(prompt: &str, jpeg: &[u8]) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: general_purpose::STANDARD.encode(jpeg),
                        },
                    },
                ],
            }],
        }
    }
}

fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode_image(image)
        .context("failed to encode image as JPEG")?;
    Ok(buf)
}

#[async_trait::async_trait]
impl AIService for GeminiService {
    async fn describe_food_image(&self, prompt: &str, image: &RgbImage) -> Result<String> {
        let jpeg = encode_jpeg(image)?;
        log::debug!(
            "📸 Encoded {}x{} image as JPEG: {} bytes",
            image.width(),
            image.height(),
            jpeg.len()
        );

        let request = Self::build_request(prompt, &jpeg);

        log::info!("🤖 Sending request to Gemini with model: {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Gemini API error response: {}", error_text);
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let response_text = response.text().await?;
        log::debug!("📄 Raw Gemini response size: {} bytes", response_text.len());

        let parsed: GenerateResponse =
            serde_json::from_str(&response_text).context("unexpected Gemini response body")?;

        let description = parsed
            .into_text()
            .context("Gemini returned no text candidate")?;
        log::debug!("💬 Gemini description: {}", description);

        Ok(description)
    }
}
