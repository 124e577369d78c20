//! Configuration for retrieval and answer composition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Which vector strategy backs semantic retrieval.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum VectorBackend {
    /// Score the query against every stored embedding on each request.
    #[default]
    BruteForce,
    /// Search a normalised flat index built once at startup.
    Index,
}

impl fmt::Display for VectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorBackend::BruteForce => f.write_str("brute-force"),
            VectorBackend::Index => f.write_str("index"),
        }
    }
}

impl FromStr for VectorBackend {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brute-force" | "bruteforce" | "brute_force" => Ok(VectorBackend::BruteForce),
            "index" => Ok(VectorBackend::Index),
            other => Err(RagError::ConfigError(format!(
                "unknown vector backend '{other}' (expected 'brute-force' or 'index')"
            ))),
        }
    }
}

/// Configuration parameters for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagConfig {
    /// Number of documents returned by semantic retrieval.
    pub semantic_top_k: usize,
    /// Number of documents returned by keyword retrieval, including fallback.
    pub keyword_top_k: usize,
    /// Strategy used when semantic retrieval is available.
    pub vector_backend: VectorBackend,
    /// Hospital named in the assistant persona.
    pub hospital_name: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            semantic_top_k: 5,
            keyword_top_k: 10,
            vector_backend: VectorBackend::default(),
            hospital_name: "Sunrise Hospital".to_string(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Check the invariants enforced by [`RagConfigBuilder::build`].
    ///
    /// Useful for configs produced through `serde` rather than the builder.
    pub fn validate(&self) -> Result<()> {
        if self.semantic_top_k == 0 {
            return Err(RagError::ConfigError(
                "semantic_top_k must be greater than zero".to_string(),
            ));
        }
        if self.keyword_top_k == 0 {
            return Err(RagError::ConfigError(
                "keyword_top_k must be greater than zero".to_string(),
            ));
        }
        if self.hospital_name.trim().is_empty() {
            return Err(RagError::ConfigError("hospital_name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of results returned by semantic retrieval.
    pub fn semantic_top_k(mut self, k: usize) -> Self {
        self.config.semantic_top_k = k;
        self
    }

    /// Set the number of results returned by keyword retrieval.
    pub fn keyword_top_k(mut self, k: usize) -> Self {
        self.config.keyword_top_k = k;
        self
    }

    /// Select the vector strategy used in semantic mode.
    pub fn vector_backend(mut self, backend: VectorBackend) -> Self {
        self.config.vector_backend = backend;
        self
    }

    /// Set the hospital named in the prompt persona.
    pub fn hospital_name(mut self, name: impl Into<String>) -> Self {
        self.config.hospital_name = name.into();
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `semantic_top_k == 0` or `keyword_top_k == 0`
    /// - `hospital_name` is blank
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_zero_k_and_blank_name() {
        assert!(RagConfig::builder().semantic_top_k(0).build().is_err());
        assert!(RagConfig::builder().keyword_top_k(0).build().is_err());
        assert!(RagConfig::builder().hospital_name("  ").build().is_err());
        assert_eq!(RagConfig::builder().build().unwrap(), RagConfig::default());
    }

    #[test]
    fn backend_parses_and_displays() {
        assert_eq!("brute-force".parse::<VectorBackend>().unwrap(), VectorBackend::BruteForce);
        assert_eq!(" Index ".parse::<VectorBackend>().unwrap(), VectorBackend::Index);
        assert!("hnsw".parse::<VectorBackend>().is_err());
        assert_eq!(VectorBackend::BruteForce.to_string(), "brute-force");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: RagConfig =
            serde_json::from_str(r#"{"vector_backend": "index", "keyword_top_k": 3}"#).unwrap();
        assert_eq!(config.vector_backend, VectorBackend::Index);
        assert_eq!(config.keyword_top_k, 3);
        assert_eq!(config.semantic_top_k, 5);
        assert_eq!(config.hospital_name, "Sunrise Hospital");
    }
}
