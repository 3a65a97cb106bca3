//! Credential resolution for the Open Supply Hub API.
//!
//! A credential is resolved exactly once, when the client is constructed,
//! from three possible sources with strict precedence:
//!
//! 1. An explicit token passed by the caller, if non-empty.
//! 2. A `token:` entry in a YAML settings file at a caller-supplied path.
//! 3. The process environment variable named by the caller (default
//!    [`TOKEN_ENV_VAR`]).
//!
//! The first source that yields a non-empty string wins. Resolution only
//! reads; it never writes, caches to disk, or logs a token value. Callers
//! needing a different token construct a new client.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use osh_types::Error;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default environment variable consulted for the API token.
pub const TOKEN_ENV_VAR: &str = "OSH_TOKEN";

/// An opaque, validated API token.
///
/// The only structure inspected is non-emptiness. The token value is kept
/// out of `Debug` output; use [`Credential::reveal`] at the point the value
/// is actually needed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    fn from_candidate(candidate: &str) -> Option<Self> {
        if candidate.is_empty() {
            None
        } else {
            Some(Self(candidate.to_string()))
        }
    }

    /// The raw token value, for building the `Authorization` header.
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Recognized shape of the YAML settings file.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    /// The API token entry.
    #[serde(default)]
    token: Option<String>,
}

/// Resolves a credential from the three precedence sources.
///
/// `env_var` overrides the environment variable name; `None` means
/// [`TOKEN_ENV_VAR`]. A settings file that is absent, unreadable, not valid
/// YAML, or missing a non-empty `token:` entry falls through to the next
/// source rather than aborting resolution; the final error still names every
/// source that was attempted.
pub fn resolve(explicit: Option<&str>, settings_path: Option<&Path>, env_var: Option<&str>) -> Result<Credential, Error> {
    if let Some(token) = explicit
        && let Some(credential) = Credential::from_candidate(token)
    {
        debug!("credential resolved from explicit token");
        return Ok(credential);
    }

    if let Some(path) = settings_path
        && let Some(credential) = read_settings_token(path)
    {
        debug!(path = %path.display(), "credential resolved from settings file");
        return Ok(credential);
    }

    let env_name = env_var.unwrap_or(TOKEN_ENV_VAR);
    if let Ok(token) = env::var(env_name)
        && let Some(credential) = Credential::from_candidate(&token)
    {
        debug!(variable = env_name, "credential resolved from environment");
        return Ok(credential);
    }

    Err(Error::Authentication {
        sources: describe_sources(explicit, settings_path, env_name),
    })
}

/// Reads the token entry from a settings file, returning `None` on any
/// failure so resolution can fall through to the next source.
fn read_settings_token(path: &Path) -> Option<Credential> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            debug!(path = %path.display(), %error, "settings file not readable; falling through");
            return None;
        }
    };
    let settings: SettingsFile = match serde_yaml::from_str(&content) {
        Ok(settings) => settings,
        Err(_) => {
            warn!(path = %path.display(), "settings file is not valid YAML; falling through");
            return None;
        }
    };
    settings.token.as_deref().and_then(Credential::from_candidate)
}

/// Names the sources that resolution attempted, without their values.
fn describe_sources(explicit: Option<&str>, settings_path: Option<&Path>, env_name: &str) -> String {
    let mut sources = Vec::new();
    if explicit.is_some() {
        sources.push("explicit token".to_string());
    }
    if let Some(path) = settings_path {
        sources.push(format!("settings file '{}'", path.display()));
    }
    sources.push(format!("environment variable '{env_name}'"));
    sources.join(", ")
}
