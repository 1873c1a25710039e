use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{InpaintBackend, InpaintRequest, InpaintResponse, MISSING_IMAGE_MESSAGE};
use crate::config::StudioConfig;
use crate::error::{EditorError, EditorResult};
use crate::image_buffer::InlineImage;

// Wire types for the `generateContent` REST call

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl From<InlineImage> for Part {
    fn from(image: InlineImage) -> Self {
        Part {
            text: None,
            inline_data: Some(Blob {
                mime_type: image.mime_type,
                data: image.data,
            }),
        }
    }
}

impl GenerateContentRequest {
    fn from_inpaint(request: InpaintRequest) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::from(request.image),
                    Part::from(request.mask),
                    Part {
                        text: Some(request.instruction),
                        inline_data: None,
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        }
    }
}

impl GenerateContentResponse {
    /// First image part of the first candidate; failing that, its first text part.
    /// An inline part that is not an image is rejected.
    fn into_inpaint(self) -> EditorResult<InpaintResponse> {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .map(|candidate| candidate.content.parts)
            .unwrap_or_default();

        let mut explanation = None;
        for part in parts {
            if let Some(blob) = part.inline_data {
                return InlineImage::new(blob.mime_type, blob.data).map(InpaintResponse::Image);
            }
            if explanation.is_none() {
                explanation = part.text.filter(|text| !text.trim().is_empty());
            }
        }

        Ok(InpaintResponse::Refusal(
            explanation.unwrap_or_else(|| MISSING_IMAGE_MESSAGE.to_string()),
        ))
    }
}

/// Inpainting through Google's Gemini image model over HTTPS
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(config: &StudioConfig) -> EditorResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| EditorError::Remote("no API key configured".to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl InpaintBackend for GeminiBackend {
    fn inpaint(&self, request: InpaintRequest) -> BoxFuture<'static, EditorResult<InpaintResponse>> {
        let client = self.client.clone();
        let url = self.url();
        let api_key = self.api_key.clone();
        let body = GenerateContentRequest::from_inpaint(request);

        async move {
            log::info!("POST {}", url);
            let response = client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| EditorError::Remote(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                log::error!("Inpainting service returned HTTP {}: {}", status, detail);
                return Err(EditorError::Remote(format!("HTTP {}", status)));
            }

            let parsed: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| EditorError::Remote(format!("malformed response: {}", e)))?;
            parsed.into_inpaint()
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> InpaintResponse {
        serde_json::from_str::<GenerateContentResponse>(json)
            .unwrap()
            .into_inpaint()
            .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let request = InpaintRequest {
            image: InlineImage { mime_type: "image/jpeg".into(), data: "AAA".into() },
            mask: InlineImage { mime_type: "image/png".into(), data: "BBB".into() },
            instruction: "do it".into(),
        };
        let body = serde_json::to_value(GenerateContentRequest::from_inpaint(request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AAA");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[2]["text"], "do it");
        assert!(parts[2].get("inlineData").is_none());
        assert_eq!(body["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_image_part_wins_over_text() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here you go"},
                {"inlineData":{"mimeType":"image/png","data":"iVBOR"}}
            ]}}]}"#,
        );
        assert_eq!(
            response,
            InpaintResponse::Image(InlineImage { mime_type: "image/png".into(), data: "iVBOR".into() })
        );
    }

    #[test]
    fn test_text_only_is_refusal() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"I can't edit that."}]}}]}"#);
        assert_eq!(response, InpaintResponse::Refusal("I can't edit that.".into()));
    }

    #[test]
    fn test_empty_response_is_generic_refusal() {
        assert_eq!(parse("{}"), InpaintResponse::Refusal(MISSING_IMAGE_MESSAGE.into()));
        assert_eq!(
            parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            InpaintResponse::Refusal(MISSING_IMAGE_MESSAGE.into())
        );
    }

    #[test]
    fn test_non_image_inline_data_is_rejected() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"inlineData":{"mimeType":"application/pdf","data":"JVBERi0"}}
            ]}}]}"#,
        )
        .unwrap();
        assert!(matches!(response.into_inpaint(), Err(EditorError::InvalidPayload(_))));
    }

    #[test]
    fn test_backend_requires_api_key() {
        let config = StudioConfig { api_key: None, ..StudioConfig::default() };
        assert!(GeminiBackend::new(&config).is_err());

        let config = StudioConfig { api_key: Some("k".into()), ..StudioConfig::default() };
        let backend = GeminiBackend::new(&config).unwrap();
        assert!(backend.url().ends_with(":generateContent"));
    }
}
