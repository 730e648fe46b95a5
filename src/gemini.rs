use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("request to the image model failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("the image model returned no image")]
    NoImage,
    #[error("the image model returned undecodable image data: {0}")]
    BadImageData(#[from] base64::DecodeError),
}

/// Client for the generative image model. One instance is shared for the
/// process lifetime; `reqwest::Client` pools connections internally.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Sends the image plus the filter prompt, returning the bytes of the
    /// first image part in the response.
    pub async fn edit_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<Vec<u8>, GeminiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(prompt),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type,
                            data: BASE64.encode(image),
                        }),
                    },
                ],
            }],
        };

        let response = self.generate_with_retry(&request).await?;

        let image_part = response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .filter_map(|part| part.inline_data)
            .find(|data| {
                data.mime_type
                    .as_deref()
                    .unwrap_or_default()
                    .starts_with("image/")
            })
            .ok_or(GeminiError::NoImage)?;

        Ok(BASE64.decode(image_part.data)?)
    }

    /// Up to three attempts with a linearly increasing delay between them.
    async fn generate_with_retry(
        &self,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, GeminiError> {
        let url = format!("{BASE_URL}/models/{}:generateContent", self.model);

        let mut attempt = 1;
        loop {
            match self.generate(&url, request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    let delay = RETRY_DELAY * attempt;
                    warn!("Image model attempt {attempt} failed: {e}, retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn generate(
        &self,
        url: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, GeminiError> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        Ok(response)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    mime_type: Option<String>,
    data: String,
}
