//! JSON encoding for stored mandates.
//!
//! Deserialization goes through [`MandateRecord`] and a structural check,
//! so a parsed [`Mandate`] always has a well-formed identifier, non-empty
//! identities, structurally valid constraints and a decodable signature.
//! Whether the signature actually matches is the authorizer's job.

use crate::mandate::signing::decode_signature;
use crate::mandate::types::{Constraints, Mandate, MandateStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// A stored mandate could not be turned back into a [`Mandate`].
#[derive(Debug, thiserror::Error)]
pub enum DeserializationError {
    #[error("invalid mandate JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid mandate field {field}: {reason}")]
    Structure { field: &'static str, reason: String },
}

impl DeserializationError {
    fn structure(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Structure {
            field,
            reason: reason.into(),
        }
    }
}

/// Wire shape of a mandate before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MandateRecord {
    mandate_id: String,
    principal_id: String,
    agent_id: String,
    constraints: Constraints,
    status: MandateStatus,
    issued_at: DateTime<Utc>,
    signature: String,
}

impl TryFrom<MandateRecord> for Mandate {
    type Error = DeserializationError;

    fn try_from(record: MandateRecord) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&record.mandate_id)
            .map_err(|e| DeserializationError::structure("mandate_id", e.to_string()))?;

        if record.principal_id.trim().is_empty() {
            return Err(DeserializationError::structure(
                "principal_id",
                "must not be empty",
            ));
        }
        if record.agent_id.trim().is_empty() {
            return Err(DeserializationError::structure("agent_id", "must not be empty"));
        }
        if let Some(v) = record.constraints.structural_violation() {
            return Err(DeserializationError::Structure {
                field: v.field,
                reason: v.reason,
            });
        }
        decode_signature(&record.signature)
            .map_err(|e| DeserializationError::structure("signature", e.to_string()))?;

        Ok(Mandate {
            id,
            principal_id: record.principal_id,
            agent_id: record.agent_id,
            constraints: record.constraints,
            status: record.status,
            issued_at: record.issued_at,
            signature: record.signature,
        })
    }
}

impl Mandate {
    /// Parse a mandate from its JSON form.
    ///
    /// Unlike going through `serde_json::from_str::<Mandate>` directly,
    /// structural failures come back as [`DeserializationError::Structure`].
    pub fn from_json(json: &str) -> Result<Self, DeserializationError> {
        let record: MandateRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }

    /// Parse a mandate from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DeserializationError> {
        let record: MandateRecord = serde_json::from_value(value)?;
        Self::try_from(record)
    }

    /// Pretty-printed JSON form, suitable for storage.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mandate::signing::{MandateSigner, SigningSecret};
    use chrono::TimeZone;

    fn sample() -> Mandate {
        let signer = MandateSigner::new(SigningSecret::new(b"codec-test".to_vec()).unwrap());
        let id = Uuid::parse_str("6f1c2a4e-3b5d-4c7e-9f10-2a3b4c5d6e7f").unwrap();
        let constraints = Constraints::new(
            50_000,
            "KRW",
            ["API_FEE"],
            Utc.with_ymd_and_hms(2026, 1, 28, 11, 0, 0).unwrap(),
        )
        .with_intent_scope("groceries");
        let signature = signer.sign_fields(&id, "user-123", &constraints).unwrap();
        Mandate {
            id,
            principal_id: "user-123".into(),
            agent_id: "mulberry-kp".into(),
            constraints,
            status: MandateStatus::Active,
            issued_at: Utc.with_ymd_and_hms(2026, 1, 28, 10, 0, 0).unwrap(),
            signature,
        }
    }

    fn sample_value() -> serde_json::Value {
        serde_json::to_value(sample()).unwrap()
    }

    #[test]
    fn test_json_roundtrip_preserves_mandate() {
        let mandate = sample();
        let json = mandate.to_json_pretty().unwrap();
        assert!(json.contains("\"mandate_id\""));
        assert!(json.contains("\"status\": \"active\""));

        let parsed = Mandate::from_json(&json).unwrap();
        assert_eq!(parsed, mandate);
    }

    #[test]
    fn test_rejects_unknown_top_level_field() {
        let mut value = sample_value();
        value["approved_by"] = serde_json::json!("admin");
        assert!(matches!(
            Mandate::from_value(value),
            Err(DeserializationError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_missing_field() {
        let mut value = sample_value();
        value.as_object_mut().unwrap().remove("signature");
        assert!(Mandate::from_value(value).is_err());
    }

    #[test]
    fn test_rejects_unknown_status() {
        let mut value = sample_value();
        value["status"] = serde_json::json!("suspended");
        assert!(Mandate::from_value(value).is_err());
    }

    fn structure_field(value: serde_json::Value) -> &'static str {
        match Mandate::from_value(value) {
            Err(DeserializationError::Structure { field, .. }) => field,
            other => panic!("expected a structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_identifier() {
        let mut value = sample_value();
        value["mandate_id"] = serde_json::json!("not-a-uuid");
        let err = Mandate::from_value(value).unwrap_err();
        assert!(
            matches!(err, DeserializationError::Structure { field: "mandate_id", .. }),
            "{:?}",
            err
        );
        assert!(err.to_string().contains("mandate_id"), "{}", err);
    }

    #[test]
    fn test_rejects_empty_identity() {
        let mut value = sample_value();
        value["agent_id"] = serde_json::json!("");
        assert_eq!(structure_field(value), "agent_id");

        let mut value = sample_value();
        value["principal_id"] = serde_json::json!("   ");
        assert_eq!(structure_field(value), "principal_id");
    }

    #[test]
    fn test_rejects_bad_currency_and_signature() {
        let mut value = sample_value();
        value["constraints"]["currency"] = serde_json::json!("WON!");
        assert_eq!(structure_field(value), "currency");

        let mut value = sample_value();
        value["signature"] = serde_json::json!("hmac-sha256:nothex");
        assert_eq!(structure_field(value), "signature");
    }

    #[test]
    fn test_from_json_reports_structure_errors() {
        let mut value = sample_value();
        value["constraints"]["allowed_categories"] = serde_json::json!([]);
        let json = serde_json::to_string(&value).unwrap();
        assert!(matches!(
            Mandate::from_json(&json),
            Err(DeserializationError::Structure {
                field: "allowed_categories",
                ..
            })
        ));
    }

    #[test]
    fn test_serde_path_still_validates() {
        let mut value = sample_value();
        value["mandate_id"] = serde_json::json!("not-a-uuid");
        let err = serde_json::from_value::<Mandate>(value).unwrap_err();
        assert!(err.to_string().contains("mandate_id"), "{}", err);
    }

    #[test]
    fn test_accepts_tampered_but_well_formed_amount() {
        let mut value = sample_value();
        value["constraints"]["max_amount"] = serde_json::json!(1_000_000);
        let parsed = Mandate::from_value(value).unwrap();
        assert_eq!(parsed.constraints().max_amount, 1_000_000);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let mut value = sample_value();
        value["constraints"]["max_amount"] = serde_json::json!(-5);
        assert!(matches!(
            Mandate::from_value(value),
            Err(DeserializationError::Json(_))
        ));
    }
}
