//! Canonical encoding primitives shared by the signer.

pub mod jcs;
