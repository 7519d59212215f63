//! Provider-backed advisory operations.
//!
//! Every operation builds a prompt, runs it through the [`Dispatcher`] (key rotation +
//! bounded retries) and interprets the reply. Whatever happens upstream, callers get a
//! well-typed payload: when the provider cannot deliver, each operation substitutes its
//! own degraded answer.

use crate::domain::advisory::{ChatAnswer, PriceQuote, QualityReport, TrendPoint};
use crate::domain::matching::{self, MatchProfile};
use crate::domain::prompts;
use crate::domain::reply::{parse_json_array_reply, parse_json_reply, strip_code_fences};
use crate::domain::rotation::{CallOutcome, Degraded, Dispatcher, KeyPool};
use crate::infra::config;
use crate::infra::gemini::{GeminiClient, GenerateRequest, Generation, InlineImage, LanguageModel};
use std::sync::Arc;
use tracing::warn;

pub struct AiService {
    model: Arc<dyn LanguageModel>,
    dispatcher: Dispatcher,
}

impl AiService {
    pub fn new(model: Arc<dyn LanguageModel>, dispatcher: Dispatcher) -> Self {
        Self { model, dispatcher }
    }

    /// Wires the Gemini client and the key pool from environment configuration.
    pub fn from_env() -> anyhow::Result<Self> {
        let client = GeminiClient::from_env()?;
        let pool = Arc::new(KeyPool::new(config::gemini_api_keys()));
        let dispatcher = Dispatcher::new(pool, config::attempt_timeout());
        Ok(Self::new(Arc::new(client), dispatcher))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    async fn run<T, I>(&self, request: GenerateRequest, interpret: I) -> Result<T, Degraded>
    where
        I: Fn(Generation) -> CallOutcome<T>,
    {
        let model = self.model.as_ref();
        let request = &request;
        let interpret = &interpret;
        self.dispatcher
            .dispatch(move |key| async move { model.generate(&key, request).await.and_then(interpret) })
            .await
    }

    pub async fn chat(&self, query: &str, context: Option<&str>) -> ChatAnswer {
        if prompts::is_greeting(query) {
            return ChatAnswer::plain(prompts::GREETING_ANSWER);
        }

        let result = if prompts::needs_web_search(query) {
            let request = GenerateRequest::text(prompts::grounded_chat(query)).with_web_search();
            self.run(request, |g| {
                let clean = strip_code_fences(&g.text);
                let mut answer = serde_json::from_str::<ChatAnswer>(&clean)
                    .unwrap_or_else(|_| ChatAnswer::plain(clean));
                if answer.sources.is_empty() {
                    answer.sources = g.sources;
                }
                CallOutcome::Success(answer)
            })
            .await
        } else {
            let request = GenerateRequest::text(prompts::quick_chat(query, context));
            self.run(request, |g| CallOutcome::Success(ChatAnswer::plain(g.text.trim())))
                .await
        };

        result.unwrap_or_else(|d| {
            log_degraded("chat", &d);
            ChatAnswer::plain(match d {
                Degraded::Unconfigured => "No API keys configured.".to_string(),
                Degraded::ParseFault(_) => "Could not parse response".to_string(),
                Degraded::Exhausted { last_error, .. } => format!(
                    "Error generating response after retries: {}",
                    last_error.as_deref().unwrap_or("unknown error")
                ),
            })
        })
    }

    pub async fn translate(&self, text: &str, target_language: &str) -> String {
        let request = GenerateRequest::text(prompts::translation(text, target_language));
        self.run(request, |g| CallOutcome::Success(g.text.trim().to_string()))
            .await
            .unwrap_or_else(|d| {
                log_degraded("translate", &d);
                match d {
                    Degraded::Unconfigured => "Error translating text (No API keys configured)".to_string(),
                    _ => "Error translating text (Rate Limit)".to_string(),
                }
            })
    }

    pub async fn market_price(&self, millet_type: &str, quality_grade: &str, location: &str) -> PriceQuote {
        let request =
            GenerateRequest::text(prompts::market_price(millet_type, quality_grade, location)).with_web_search();
        self.run(request, |g| match parse_json_reply::<PriceQuote>(&g.text) {
            Ok(quote) => CallOutcome::Success(quote),
            Err(e) => CallOutcome::ParseFault(e),
        })
        .await
        .unwrap_or_else(|d| {
            log_degraded("market_price", &d);
            PriceQuote::degraded(match d {
                Degraded::Unconfigured => "No API keys configured",
                Degraded::ParseFault(_) => "Parse Error",
                Degraded::Exhausted { .. } => "Failed to fetch price (All keys exhausted)",
            })
        })
    }

    pub async fn match_users(
        &self,
        user_type: &str,
        millet_type: &str,
        quantity: f64,
        location: &str,
    ) -> Vec<MatchProfile> {
        let candidates = matching::counterparts_for(user_type);

        let prompt = match prompts::matching(user_type, millet_type, quantity, location, &candidates) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Could not serialize match candidates, using offline matching");
                return matching::filter_by_commodity(candidates, millet_type);
            }
        };

        match self
            .run(GenerateRequest::text(prompt), |g| {
                match parse_json_array_reply::<MatchProfile>(&g.text) {
                    Ok(matches) => CallOutcome::Success(matches),
                    Err(e) => CallOutcome::ParseFault(e),
                }
            })
            .await
        {
            Ok(matches) => matches,
            Err(d) => {
                log_degraded("match_users", &d);
                matching::filter_by_commodity(candidates, millet_type)
            }
        }
    }

    pub async fn analyze_quality(
        &self,
        millet_type: &str,
        description: &str,
        impurities: Option<&str>,
    ) -> QualityReport {
        let request = GenerateRequest::text(prompts::quality_from_description(
            millet_type,
            description,
            impurities,
        ));
        self.run(request, interpret_quality).await.unwrap_or_else(|d| {
            log_degraded("analyze_quality", &d);
            QualityReport::degraded(Vec::new(), "Error: Service Unavailable")
        })
    }

    pub async fn analyze_quality_image(&self, millet_type: &str, image: InlineImage) -> QualityReport {
        let request = GenerateRequest::text(prompts::quality_from_image(millet_type)).with_image(image);
        self.run(request, interpret_quality).await.unwrap_or_else(|d| {
            log_degraded("analyze_quality_image", &d);
            QualityReport::degraded(vec!["Error processing image".to_string()], "Service Unavailable")
        })
    }

    pub async fn market_trends(&self, millet_type: &str) -> Vec<TrendPoint> {
        let request = GenerateRequest::text(prompts::market_trends(millet_type)).with_web_search();
        self.run(request, |g| match parse_json_array_reply::<TrendPoint>(&g.text) {
            Ok(points) => CallOutcome::Success(points),
            Err(e) => CallOutcome::ParseFault(e),
        })
        .await
        .unwrap_or_else(|d| {
            log_degraded("market_trends", &d);
            Vec::new()
        })
    }
}

fn interpret_quality(g: Generation) -> CallOutcome<QualityReport> {
    match parse_json_reply::<QualityReport>(&g.text) {
        Ok(report) => CallOutcome::Success(report),
        Err(e) => CallOutcome::ParseFault(e),
    }
}

fn log_degraded(operation: &str, reason: &Degraded) {
    warn!(operation, reason = %reason, "Returning degraded response");
}
