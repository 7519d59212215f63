//! Prompt construction and intent detection for the advisory operations.

use crate::domain::matching::MatchProfile;

const SEARCH_KEYWORDS: &[&str] = &[
    "shree anna",
    "millet mission",
    "official scheme",
    "government benefits",
    "msp",
    "pmmsy",
    "subsidy",
    "policy",
    "yojana",
    "price",
    "rate",
    "market",
    "today",
    "latest",
    "news",
    "current",
];

pub const GREETING_ANSWER: &str = "Namaste! I am your Millet Assistant. Ask me anything.";

/// Greetings are answered locally without a provider call.
pub fn is_greeting(query: &str) -> bool {
    let q = query.to_lowercase();
    q.contains("namaste") || q.contains("hello") || q.split_whitespace().any(|w| w == "hi")
}

/// Queries about schemes, prices or news need fresh web results.
pub fn needs_web_search(query: &str) -> bool {
    let q = query.to_lowercase();
    SEARCH_KEYWORDS.iter().any(|k| q.contains(k))
}

pub fn grounded_chat(query: &str) -> String {
    format!(
        "You are an assistant for Indian millet farmers.\n\
         User query: {query}\n\n\
         Look up official government sources or reputable news for this query, \
         extract verified and current information, and answer in simple, farmer-friendly English.\n\
         Return a JSON object with:\n\
         - answer: the explanation\n\
         - sources: list of URLs or source names used"
    )
}

pub fn quick_chat(query: &str, context: Option<&str>) -> String {
    format!(
        "You are a helpful Millet Assistant. Answer the question quickly and concisely.\n\
         Context: {}\n\
         User: {query}\n\
         Assistant:",
        context.unwrap_or_default()
    )
}

pub fn translation(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {target_language}. \
         Return ONLY the translated text, no explanations.\n\nText: {text}"
    )
}

pub fn market_price(millet_type: &str, quality_grade: &str, location: &str) -> String {
    format!(
        "Act as an agricultural market expert in India.\n\
         1. Find the current (last 7 days) mandi price of {millet_type} in {location} or nearby Indian markets.\n\
         2. Establish a realistic base price per quintal (100 kg).\n\
         Recommended price rules:\n\
         - Quality A (premium): base price + 10%\n\
         - Quality B (standard): base price\n\
         - Quality C (fair): base price - 10%\n\
         Current quality: {quality_grade}\n\n\
         Return ONLY a JSON object with:\n\
         - market_price (number, base price per quintal)\n\
         - recommended_price (number, adjusted price per quintal)\n\
         - currency (string, e.g. \"INR\")\n\
         - reasoning (string, short explanation naming the source market if possible)"
    )
}

pub fn matching(
    user_type: &str,
    millet_type: &str,
    quantity: f64,
    location: &str,
    candidates: &[MatchProfile],
) -> serde_json::Result<String> {
    let candidates_json = serde_json::to_string(candidates)?;
    Ok(format!(
        "Act as a B2B agricultural matching engine.\n\
         My profile: {user_type}, {millet_type}, {quantity} kg, {location}\n\
         Potential matches: {candidates_json}\n\
         Score each match from 0 to 100 based on millet type, location and quantity. \
         Return ONLY the candidates scoring above 50, as a JSON array of the same objects."
    ))
}

pub fn quality_from_description(millet_type: &str, description: &str, impurities: Option<&str>) -> String {
    format!(
        "Analyze the quality of this millet sample from its description.\n\
         Millet type: {millet_type}\n\
         Description: {description}\n\
         Impurities: {}\n\
         Return ONLY a JSON object with: qualityGrade (A, B or C), moistureEstimate, \
         cleanliness (High/Medium/Low), adulterationRisk (Low/Medium/High), \
         observedIssues (list of strings), recommendation.",
        impurities.unwrap_or("None reported")
    )
}

pub fn quality_from_image(millet_type: &str) -> String {
    format!(
        "Analyze the quality of this {millet_type} sample from the image.\n\
         Return ONLY a JSON object with:\n\
         - qualityGrade (A, B, or C)\n\
         - moistureEstimate (e.g. \"10-12%\")\n\
         - cleanliness (High/Medium/Low)\n\
         - adulterationRisk (Low/Medium/High)\n\
         - observedIssues (list of specific visual defects)\n\
         - recommendation (specific advice)"
    )
}

pub fn market_trends(millet_type: &str) -> String {
    format!(
        "Search daily wholesale market prices of {millet_type} in major Indian mandis \
         for the last 15-30 days. Return a JSON array of objects with date, \
         price_per_quintal and market_name."
    )
}
