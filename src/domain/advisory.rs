//! Payloads produced by the provider-backed advisory operations.
//!
//! Each type has a degraded constructor used when no real answer could be obtained.

use crate::domain::reply::{lenient_f64, lenient_string};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatAnswer {
    #[serde(deserialize_with = "lenient_string")]
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ChatAnswer {
    pub fn plain(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceQuote {
    #[serde(deserialize_with = "lenient_f64")]
    pub market_price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub recommended_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reasoning: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl PriceQuote {
    pub fn degraded(reasoning: impl Into<String>) -> Self {
        Self {
            market_price: 0.0,
            recommended_price: 0.0,
            currency: default_currency(),
            reasoning: reasoning.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    #[serde(default = "unknown", deserialize_with = "lenient_string_or_unknown")]
    pub quality_grade: String,
    #[serde(default = "unknown", deserialize_with = "lenient_string_or_unknown")]
    pub moisture_estimate: String,
    #[serde(default = "unknown", deserialize_with = "lenient_string_or_unknown")]
    pub cleanliness: String,
    #[serde(default = "unknown", deserialize_with = "lenient_string_or_unknown")]
    pub adulteration_risk: String,
    #[serde(default)]
    pub observed_issues: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recommendation: String,
}

fn unknown() -> String {
    "Unknown".to_string()
}

/// Like [`lenient_string`], but `null` or blank text reads as "Unknown".
fn lenient_string_or_unknown<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_string(de)?;
    Ok(if text.trim().is_empty() { unknown() } else { text })
}

impl QualityReport {
    pub fn degraded(observed_issues: Vec<String>, recommendation: impl Into<String>) -> Self {
        Self {
            quality_grade: unknown(),
            moisture_estimate: unknown(),
            cleanliness: unknown(),
            adulteration_risk: unknown(),
            observed_issues,
            recommendation: recommendation.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price_per_quintal: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub market_name: String,
}
