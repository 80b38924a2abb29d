//! Shared loading and persistence helpers.

use anyhow::{Context, Result};
use mulberry_mandate::{Authorizer, AuthzConfig, Mandate, MandateSigner, SigningSecret};
use std::fs;
use std::path::Path;

use crate::cli::args::{GlobalArgs, SECRET_ENV_VAR};

pub fn load_secret(global: &GlobalArgs) -> Result<SigningSecret> {
    match &global.secret_file {
        Some(path) => SigningSecret::from_file(path)
            .with_context(|| format!("failed to load signing secret from {}", path.display())),
        None => SigningSecret::from_env(SECRET_ENV_VAR).with_context(|| {
            format!("no signing secret: pass --secret-file or set {SECRET_ENV_VAR}")
        }),
    }
}

pub fn load_config(global: &GlobalArgs) -> Result<AuthzConfig> {
    match &global.config {
        Some(path) => AuthzConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(AuthzConfig::default()),
    }
}

pub fn build_authorizer(global: &GlobalArgs) -> Result<Authorizer> {
    let signer = MandateSigner::new(load_secret(global)?);
    Ok(Authorizer::new(signer, load_config(global)?))
}

pub fn read_mandate(path: &Path) -> Result<Mandate> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read mandate file: {}", path.display()))?;
    Mandate::from_json(&json).with_context(|| format!("invalid mandate: {}", path.display()))
}

pub fn write_mandate(path: &Path, mandate: &Mandate) -> Result<()> {
    let mut json = mandate.to_json_pretty()?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write mandate: {}", path.display()))
}

/// Parse a document as JSON when the extension says so, YAML otherwise.
pub fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).with_context(|| format!("invalid JSON: {}", path.display()))
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("invalid YAML: {}", path.display()))
    }
}
