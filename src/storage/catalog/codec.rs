//! Text encoding for set-valued columns (`certifications`, `images`).
//!
//! Sets are stored as JSON arrays of strings. An empty set is stored as NULL.

use tracing::warn;

pub fn encode_set(items: &[String]) -> anyhow::Result<Option<String>> {
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(items)?))
}

/// Decodes a stored set. Missing, blank or malformed text yields an empty set.
pub fn decode_set(column: &str, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(column, error = %e, "Stored set is not a JSON string array, reading as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_stored_as_null() {
        assert_eq!(encode_set(&[]).unwrap(), None);
    }

    #[test]
    fn order_survives_encoding() {
        let items = vec!["Organic-India".to_string(), "ISO-22000".to_string()];
        let raw = encode_set(&items).unwrap();
        assert_eq!(decode_set("certifications", raw.as_deref()), items);
    }

    #[test]
    fn malformed_text_reads_as_empty() {
        assert!(decode_set("certifications", Some("[\"unterminated")).is_empty());
        assert!(decode_set("certifications", Some("{\"a\":1}")).is_empty());
        assert!(decode_set("images", Some("   ")).is_empty());
        assert!(decode_set("images", None).is_empty());
    }
}
