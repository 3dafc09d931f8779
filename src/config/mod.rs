//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SEMCACHE_*` environment variables.

pub mod build;
pub mod error;


pub use build::{ConfiguredBackend, ConfiguredCache, ConfiguredEmbedder};
pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::cache::CacheConfig;
use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, DEFAULT_SIMILARITY_THRESHOLD};
use crate::embedding::HttpEmbedderConfig;

/// Cache configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SEMCACHE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Minimum cosine similarity for a hit. Default: `0.85`.
    pub similarity_threshold: f32,

    /// Directory for the file backend. `None` keeps records in memory
    /// (see [`Config::build_cache`]).
    pub storage_path: Option<PathBuf>,

    /// OpenAI-compatible embeddings endpoint. `None` uses the stub embedder.
    pub embedding_url: Option<String>,

    /// Embedding model name. Default: `text-embedding-3-small`.
    pub embedding_model: String,

    /// Bearer token for the embeddings endpoint.
    pub embedding_api_key: Option<String>,

    /// Embedding vector length. Default: `1536`.
    pub embedding_dim: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            storage_path: None,
            embedding_url: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl Config {
    const ENV_SIMILARITY_THRESHOLD: &'static str = "SEMCACHE_SIMILARITY_THRESHOLD";
    const ENV_STORAGE_PATH: &'static str = "SEMCACHE_STORAGE_PATH";
    const ENV_EMBEDDING_URL: &'static str = "SEMCACHE_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "SEMCACHE_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "SEMCACHE_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_DIM: &'static str = "SEMCACHE_EMBEDDING_DIM";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let similarity_threshold = Self::parse_threshold_from_env(defaults.similarity_threshold)?;
        let storage_path = Self::parse_optional_from_env(Self::ENV_STORAGE_PATH).map(PathBuf::from);
        let embedding_url = Self::parse_optional_from_env(Self::ENV_EMBEDDING_URL);
        let embedding_model =
            Self::parse_optional_from_env(Self::ENV_EMBEDDING_MODEL).unwrap_or(defaults.embedding_model);
        let embedding_api_key = Self::parse_optional_from_env(Self::ENV_EMBEDDING_API_KEY);
        let embedding_dim = Self::parse_dim_from_env(defaults.embedding_dim)?;

        Ok(Self {
            similarity_threshold,
            storage_path,
            embedding_url,
            embedding_model,
            embedding_api_key,
            embedding_dim,
        })
    }

    /// Validates ranges, the storage path and the embedding URL (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.similarity_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(ConfigError::InvalidThreshold { value: t });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroDimension);
        }

        if let Some(ref path) = self.storage_path
            && path.exists()
            && !path.is_dir()
        {
            return Err(ConfigError::NotADirectory { path: path.clone() });
        }

        if let Some(ref url) = self.embedding_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEmbeddingUrl { value: url.clone() });
        }

        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::with_threshold(self.similarity_threshold)
    }

    /// HTTP embedder settings, `None` when no endpoint is configured.
    pub fn http_embedder_config(&self) -> Option<HttpEmbedderConfig> {
        let url = self.embedding_url.as_ref()?;
        let mut config = HttpEmbedderConfig::new(url.as_str())
            .model(&self.embedding_model)
            .dimensions(self.embedding_dim);
        if let Some(ref key) = self.embedding_api_key {
            config = config.api_key(key);
        }
        Some(config)
    }

    fn parse_threshold_from_env(default: f32) -> Result<f32, ConfigError> {
        match env::var(Self::ENV_SIMILARITY_THRESHOLD) {
            Ok(value) => {
                let threshold: f32 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::ThresholdParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                    return Err(ConfigError::InvalidThreshold { value: threshold });
                }

                Ok(threshold)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_dim_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_EMBEDDING_DIM) {
            Ok(value) => {
                let dim: usize =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::DimensionParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if dim == 0 {
                    return Err(ConfigError::ZeroDimension);
                }

                Ok(dim)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
