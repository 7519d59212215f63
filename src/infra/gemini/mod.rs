//! Generative-language provider boundary.

pub mod client;

pub use client::GeminiClient;

use crate::domain::rotation::CallOutcome;
use async_trait::async_trait;

/// Binary image sent alongside a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One generation request: a prompt, optionally an image, optionally web-search grounding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub web_search: bool,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Generated text plus any grounding sources the provider cited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub text: String,
    pub sources: Vec<String>,
}

/// A single remote invocation with one credential. Implementations classify
/// every failure; they never retry on their own.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> CallOutcome<Generation>;
}
