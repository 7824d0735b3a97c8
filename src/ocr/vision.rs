//! Image-to-text through a vision-capable chat model.
//!
//! The image is inlined as a base64 `data:` URL inside an `image_url`
//! content part, next to a fixed transcription instruction, and sent to an
//! OpenAI-compatible `/v1/chat/completions` endpoint (Ollama, OpenAI, …).

use async_trait::async_trait;
use base64::Engine;

use crate::chat::client::first_choice_content;
use crate::config::OcrConfig;

use super::{OcrEngine, OcrError};

/// OCR backend that asks a vision model to transcribe the image.
pub struct VisionOcr {
    client: reqwest::Client,
    config: OcrConfig,
}

impl VisionOcr {
    /// Build from config; the HTTP client is created once and reused.
    pub fn from_config(config: &OcrConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn request_body(&self, image: &[u8], mime: &str) -> serde_json::Value {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        serde_json::json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": self.config.prompt },
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:{mime};base64,{encoded}") }
                    }
                ]
            }],
            "stream": false
        })
    }
}

#[async_trait]
impl OcrEngine for VisionOcr {
    async fn extract_text(&self, image: &[u8], mime: &str) -> Result<String, OcrError> {
        if image.is_empty() {
            return Err(OcrError::EmptyImage);
        }

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        log::debug!(
            "ocr: {} byte {mime} image → {url} (model={})",
            image.len(),
            self.config.model
        );

        let mut req = self.client.post(&url).json(&self.request_body(image, mime));
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::Parse(e.to_string()))?;

        let text = first_choice_content(&json).map_err(|_| OcrError::NoText)?;
        if text.trim().is_empty() {
            return Err(OcrError::NoText);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(base_url: &str) -> OcrConfig {
        OcrConfig {
            base_url: base_url.into(),
            timeout_secs: 5,
            ..OcrConfig::default()
        }
    }

    #[test]
    fn body_inlines_image_as_data_url() {
        let ocr = VisionOcr::from_config(&make_config("http://x"));
        let body = ocr.request_body(b"abc", "image/png");
        let parts = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn returns_transcribed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({ "model": "llava" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "INVOICE 42" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ocr = VisionOcr::from_config(&make_config(&server.uri()));
        let text = ocr.extract_text(b"\x89PNG", "image/png").await.unwrap();
        assert_eq!(text, "INVOICE 42");
    }

    #[tokio::test]
    async fn empty_content_is_no_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "   " } }]
            })))
            .mount(&server)
            .await;

        let ocr = VisionOcr::from_config(&make_config(&server.uri()));
        assert!(matches!(
            ocr.extract_text(b"img", "image/png").await,
            Err(OcrError::NoText)
        ));
    }

    #[tokio::test]
    async fn server_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let ocr = VisionOcr::from_config(&make_config(&server.uri()));
        let err = ocr.extract_text(b"img", "image/png").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn slow_server_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "choices": [{ "message": { "content": "too late" } }]
                    }))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = make_config(&server.uri());
        config.timeout_secs = 1;
        let err = VisionOcr::from_config(&config)
            .extract_text(b"img", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_image_is_rejected_without_a_request() {
        let ocr = VisionOcr::from_config(&make_config("http://127.0.0.1:9"));
        assert!(matches!(
            ocr.extract_text(&[], "image/png").await,
            Err(OcrError::EmptyImage)
        ));
    }
}
