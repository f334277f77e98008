//! Schema registry client
//!
//! Looks up the compatibility mode configured for a subject. This is the
//! only blocking operation in the whole pipeline: it runs with a bounded
//! timeout and, on any failure (network error, non-success status on both
//! endpoints, malformed payload), falls back to the configured default mode.
//! The comparison core only ever sees an ordinary [`CompatibilityMode`]
//! value, indifferent to how it was obtained.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::compatibility::CompatibilityMode;
use crate::config::RegistryConfig;
use crate::error::{CompatError, Result};

/// Response body of the registry's `/config` endpoints.
#[derive(Debug, Deserialize)]
struct ConfigResponse {
    #[serde(rename = "compatibilityLevel")]
    compatibility_level: Option<String>,
}

/// Blocking client for a Confluent-style schema registry.
pub struct RegistryClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl RegistryClient {
    /// Build a client from configuration. The timeout applies to every
    /// request the client makes.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Resolve the compatibility mode for a subject, falling back to
    /// `default` if the registry cannot answer. Never propagates a failure.
    pub fn subject_mode(&self, subject: &str, default: CompatibilityMode) -> CompatibilityMode {
        match self.fetch_subject_mode(subject) {
            Ok(mode) => {
                debug!(%subject, %mode, "resolved compatibility mode from registry");
                mode
            }
            Err(e) => {
                warn!(
                    %subject,
                    error = %e,
                    fallback = %default,
                    "registry lookup failed, using configured default mode"
                );
                default
            }
        }
    }

    /// Subject-level config first, then the registry's global config.
    fn fetch_subject_mode(&self, subject: &str) -> Result<CompatibilityMode> {
        let subject_url = format!("{}/config/{}", self.base_url, subject);
        if let Some(level) = self.fetch_level(&subject_url)? {
            return Ok(CompatibilityMode::parse(&level));
        }

        let global_url = format!("{}/config", self.base_url);
        if let Some(level) = self.fetch_level(&global_url)? {
            return Ok(CompatibilityMode::parse(&level));
        }

        Err(CompatError::MissingCompatibilityLevel)
    }

    /// One GET; a non-success status means "not configured here", letting
    /// the caller fall through to the next endpoint.
    fn fetch_level(&self, url: &str) -> Result<Option<String>> {
        let response = self.http.get(url).send()?;
        if !response.status().is_success() {
            return Ok(None);
        }

        let body: ConfigResponse = response.json()?;
        Ok(body.compatibility_level)
    }
}
