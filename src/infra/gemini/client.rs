// Responsible for all communication with the Gemini `generateContent` REST API.

use crate::domain::rotation::CallOutcome;
use crate::infra::config;
use crate::infra::gemini::{GenerateRequest, Generation, LanguageModel};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

/// Header carrying the credential, so keys stay out of URLs and access logs.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Builds a client from `GEMINI_BASE_URL`, `GEMINI_MODEL` and the attempt timeout.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(config::gemini_base_url(), config::gemini_model(), config::attempt_timeout())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

fn request_body(request: &GenerateRequest) -> JsonValue {
    let mut parts = vec![json!({ "text": request.prompt })];
    if let Some(image) = &request.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": BASE64.encode(&image.data),
            }
        }));
    }

    let mut body = json!({ "contents": [{ "parts": parts }] });
    if request.web_search {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
struct WebSource {
    #[serde(default)]
    uri: Option<String>,
}

fn into_generation(response: GenerateContentResponse) -> Result<Generation, String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "response has no candidates".to_string())?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err("candidate has no text".to_string());
    }

    let sources = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|c| c.web.and_then(|w| w.uri))
                .collect()
        })
        .unwrap_or_default();

    Ok(Generation { text, sources })
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> CallOutcome<Generation> {
        let response = match self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&request_body(request))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return CallOutcome::Transient("request timed out".to_string()),
            Err(e) => return CallOutcome::Transient(format!("request failed: {e}")),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return CallOutcome::RateLimited;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return CallOutcome::Transient(format!("API error {}: {}", status.as_u16(), body.trim()));
        }

        match response.json::<GenerateContentResponse>().await {
            Ok(parsed) => match into_generation(parsed) {
                Ok(generation) => CallOutcome::Success(generation),
                Err(e) => CallOutcome::ParseFault(e),
            },
            Err(e) => CallOutcome::ParseFault(format!("undecodable response body: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::gemini::InlineImage;

    #[test]
    fn body_carries_image_and_search_tool() {
        let req = GenerateRequest::text("grade this")
            .with_image(InlineImage {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            })
            .with_web_search();
        let body = request_body(&req);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "grade this");
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "AQID");
        assert!(body["tools"][0].get("google_search").is_some());
    }

    #[test]
    fn plain_body_has_no_tools() {
        let body = request_body(&GenerateRequest::text("hi"));
        assert!(body.get("tools").is_none());
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn generation_collects_text_and_sources() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "farmer" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://agmarknet.gov.in" } },
                    { "retrievedContext": {} }
                ]}
            }]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let generation = into_generation(parsed).unwrap();
        assert_eq!(generation.text, "Hello farmer");
        assert_eq!(generation.sources, vec!["https://agmarknet.gov.in"]);
    }

    #[test]
    fn missing_candidate_text_is_an_error() {
        let parsed: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(into_generation(parsed).is_err());

        let parsed: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [{ "content": { "parts": [] } }] }))
                .unwrap();
        assert!(into_generation(parsed).is_err());
    }
}
