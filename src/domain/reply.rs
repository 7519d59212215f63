//! Helpers for interpreting free-form model replies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Removes Markdown code fences (```` ```json ```` / ```` ``` ````) and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Narrows a reply down to the outermost JSON array, if brackets are present.
pub fn extract_json_array(text: &str) -> &str {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parses a fenced or bare JSON reply into `T`.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    let clean = strip_code_fences(text);
    serde_json::from_str(&clean).map_err(|e| format!("{e} in reply {:?}", truncate(&clean, 200)))
}

/// Parses the JSON array embedded in a reply into `Vec<T>`.
pub fn parse_json_array_reply<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, String> {
    let clean = strip_code_fences(text);
    let slice = extract_json_array(&clean);
    serde_json::from_str(slice).map_err(|e| format!("{e} in reply {:?}", truncate(slice, 200)))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Accepts `2500`, `2500.5` or `"2,500"` for numeric fields models like to quote.
pub fn lenient_f64<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(f64),
        Text(String),
    }

    match NumOrText::deserialize(de)? {
        NumOrText::Num(n) => Ok(n),
        NumOrText::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("not a number: {s:?}")))
        }
    }
}

/// Accepts a string or a bare number/bool and keeps it as text (e.g. `"moistureEstimate": 11`).
pub fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
