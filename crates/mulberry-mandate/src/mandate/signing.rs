//! Mandate Signing and Verification
//!
//! Keyed signature over a mandate's identifier, principal and constraints.
//!
//! # Signing Process
//!
//! ```text
//! 1. Build signable = {mandate_id, principal_id, constraints}
//! 2. Compute canonical = JCS(signable)
//! 3. Compute PAE = DSSEv1_PAE(payload_type, canonical)
//! 4. signature = "hmac-sha256:" + hex(HMAC-SHA256(secret, PAE))
//! ```
//!
//! Verification repeats steps 1-4 over the mandate's current fields and
//! compares against the stored value in constant time. The agent id, status
//! and `issued_at` are not part of the signed payload.

use crate::config::ConfigError;
use crate::crypto::jcs;
use crate::mandate::types::{Constraints, Mandate, MANDATE_PAYLOAD_TYPE};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::fmt;
use std::path::Path;
use subtle::ConstantTimeEq;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Prefix of every encoded signature.
pub const SIGNATURE_PREFIX: &str = "hmac-sha256:";

/// HMAC-SHA256 output length in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// Process-wide signing secret.
///
/// Never printed; zeroed on drop. Rotating it invalidates every mandate
/// signed with the previous value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self { bytes })
    }

    /// Read the secret from an environment variable.
    ///
    /// Intended for process entry points only; the engine itself never reads
    /// the environment.
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        let value = std::env::var(var).map_err(|_| ConfigError::MissingSecret {
            var: var.to_string(),
        })?;
        Self::new(value.into_bytes())
    }

    /// Read the secret from a file. A single trailing newline is stripped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }
        Self::new(bytes)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret").finish_non_exhaustive()
    }
}

/// Signing errors.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("failed to canonicalize mandate payload: {0}")]
    Canonicalize(#[from] serde_json::Error),
}

/// Verification errors. All of them mean "do not trust this mandate".
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed signature: {reason}")]
    Malformed { reason: String },

    #[error("failed to canonicalize mandate payload: {0}")]
    Canonicalize(#[from] serde_json::Error),

    #[error("signature does not match mandate content")]
    Mismatch,
}

/// Signable payload (identifier, principal, constraints).
#[derive(Serialize)]
struct SignablePayload<'a> {
    mandate_id: &'a Uuid,
    principal_id: &'a str,
    constraints: &'a Constraints,
}

/// Build DSSE Pre-Authentication Encoding (PAE).
///
/// ```text
/// PAE(type, payload) = "DSSEv1" SP LEN(type) SP type SP LEN(payload) SP payload
/// ```
fn build_pae(payload_type: &str, payload: &[u8]) -> Vec<u8> {
    let type_len = payload_type.len().to_string();
    let payload_len = payload.len().to_string();

    let mut pae = Vec::with_capacity(payload.len() + payload_type.len() + 32);
    pae.extend_from_slice(b"DSSEv1 ");
    pae.extend_from_slice(type_len.as_bytes());
    pae.push(b' ');
    pae.extend_from_slice(payload_type.as_bytes());
    pae.push(b' ');
    pae.extend_from_slice(payload_len.as_bytes());
    pae.push(b' ');
    pae.extend_from_slice(payload);
    pae
}

/// Canonical signing input for the given fields (PAE-wrapped JCS).
pub fn signing_input(
    mandate_id: &Uuid,
    principal_id: &str,
    constraints: &Constraints,
) -> Result<Vec<u8>, serde_json::Error> {
    let canonical = jcs::to_vec(&SignablePayload {
        mandate_id,
        principal_id,
        constraints,
    })?;
    Ok(build_pae(MANDATE_PAYLOAD_TYPE, &canonical))
}

/// Decode a stored `hmac-sha256:<hex>` signature into raw bytes.
pub fn decode_signature(encoded: &str) -> Result<[u8; SIGNATURE_LEN], VerifyError> {
    let hex_part = encoded
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| VerifyError::Malformed {
            reason: format!("expected '{}' prefix", SIGNATURE_PREFIX),
        })?;

    let raw = hex::decode(hex_part).map_err(|e| VerifyError::Malformed {
        reason: format!("invalid hex: {}", e),
    })?;

    raw.try_into().map_err(|raw: Vec<u8>| VerifyError::Malformed {
        reason: format!("expected {} bytes, got {}", SIGNATURE_LEN, raw.len()),
    })
}

/// Keyed signer/verifier for mandates.
#[derive(Clone, Debug)]
pub struct MandateSigner {
    secret: SigningSecret,
}

impl MandateSigner {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    fn mac(&self, input: &[u8]) -> [u8; SIGNATURE_LEN] {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(input);
        let mut out = [0u8; SIGNATURE_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }

    /// Sign the given fields, returning the encoded signature.
    pub fn sign_fields(
        &self,
        mandate_id: &Uuid,
        principal_id: &str,
        constraints: &Constraints,
    ) -> Result<String, SigningError> {
        let input = signing_input(mandate_id, principal_id, constraints)?;
        Ok(format!(
            "{}{}",
            SIGNATURE_PREFIX,
            hex::encode(self.mac(&input))
        ))
    }

    /// Recompute the signature over a mandate's current fields.
    pub fn sign(&self, mandate: &Mandate) -> Result<String, SigningError> {
        self.sign_fields(&mandate.id, &mandate.principal_id, &mandate.constraints)
    }

    /// Verify a mandate's stored signature against its current fields.
    pub fn verify(&self, mandate: &Mandate) -> Result<(), VerifyError> {
        let claimed = decode_signature(&mandate.signature)?;
        let input = signing_input(&mandate.id, &mandate.principal_id, &mandate.constraints)?;
        let computed = self.mac(&input);

        if computed[..].ct_eq(&claimed[..]).into() {
            Ok(())
        } else {
            Err(VerifyError::Mismatch)
        }
    }
}
