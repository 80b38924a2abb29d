//! JSON Canonicalization Scheme (RFC 8785) implementation.
//!
//! Provides deterministic JSON serialization for mandate signing.
//! Uses `serde_jcs` which guarantees:
//!
//! - Lexicographic key ordering
//! - No insignificant whitespace
//! - UTF-8 encoding
//! - IEEE 754 number normalization (1.0 → 1)

use serde::Serialize;

/// Serialize a value to JCS (RFC 8785) canonical JSON bytes.
///
/// # Example
///
/// ```
/// use mulberry_mandate::crypto::jcs;
/// use serde_json::json;
///
/// let value = json!({"b": 2, "a": 1});
/// let bytes = jcs::to_vec(&value).unwrap();
/// assert_eq!(bytes, br#"{"a":1,"b":2}"#);
/// ```
pub fn to_vec<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    serde_jcs::to_vec(value)
}

/// Serialize to a JCS canonical JSON string.
pub fn to_string<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_jcs::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jcs_key_ordering() {
        let input = json!({
            "max_amount": 50000,
            "currency": "KRW",
            "allowed_categories": ["API_FEE"]
        });

        let canonical = to_string(&input).unwrap();
        assert_eq!(
            canonical,
            r#"{"allowed_categories":["API_FEE"],"currency":"KRW","max_amount":50000}"#
        );
    }

    #[test]
    fn test_jcs_float_normalization() {
        let input = json!({
            "auto_donation_rate": 0.1,
            "min_spirit_score": 70.0
        });

        let canonical = to_string(&input).unwrap();
        assert!(canonical.contains(r#""auto_donation_rate":0.1"#));
        assert!(canonical.contains(r#""min_spirit_score":70"#));
    }

    #[test]
    fn test_jcs_array_order_preserved() {
        let input = json!({ "allowed_categories": ["5411", "API_FEE", "4111"] });

        let canonical = to_string(&input).unwrap();
        assert_eq!(canonical, r#"{"allowed_categories":["5411","API_FEE","4111"]}"#);
    }

    #[test]
    fn test_jcs_determinism() {
        let input1 = json!({"a": 1, "b": {"y": 2, "x": 1}});
        let input2 = json!({"b": {"x": 1, "y": 2}, "a": 1});

        assert_eq!(to_vec(&input1).unwrap(), to_vec(&input2).unwrap());
    }

    #[test]
    fn test_jcs_unicode_kept_verbatim() {
        let input = json!({ "intent_scope": "식료품" });

        let s = to_string(&input).unwrap();
        assert_eq!(s, r#"{"intent_scope":"식료품"}"#);
    }
}
