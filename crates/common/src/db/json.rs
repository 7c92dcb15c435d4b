//! Symmetric codec for JSON substructures stored as text columns
//!
//! Invariant: `decode(encode(x)) == x` for every persisted value, and a
//! NULL column decodes to `None` rather than erroring.

use crate::errors::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode an optional substructure to its stored text form.
pub fn encode_json<T: Serialize>(value: Option<&T>) -> Result<Option<String>> {
    value
        .map(|v| serde_json::to_string(v))
        .transpose()
        .map_err(Into::into)
}

/// Decode an optional stored text column back to its structured form.
pub fn decode_json<T: DeserializeOwned>(stored: Option<String>) -> Result<Option<T>> {
    stored
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Acl {
        user_ids: Vec<String>,
    }

    #[test]
    fn test_round_trip() {
        let acl = Acl {
            user_ids: vec!["u1".into(), "u2".into()],
        };
        let stored = encode_json(Some(&acl)).unwrap();
        let decoded: Option<Acl> = decode_json(stored).unwrap();
        assert_eq!(decoded, Some(acl));
    }

    #[test]
    fn test_null_round_trip() {
        let stored = encode_json::<Acl>(None).unwrap();
        assert_eq!(stored, None);
        let decoded: Option<Acl> = decode_json(None).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_opaque_value_round_trip() {
        let blob = serde_json::json!({"state": {"nested": [1, 2, 3]}, "n": null});
        let stored = encode_json(Some(&blob)).unwrap();
        let decoded: Option<serde_json::Value> = decode_json(stored).unwrap();
        assert_eq!(decoded, Some(blob));
    }
}
