//! Configuration loader and path helpers.
//!
//! Uses Figment to merge compiled defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (nested keys split on `__`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    pub retrieval: RetrievalSettings,
    pub chunking: ChunkingSettings,
    pub store: StoreSettings,
    pub embedding: EmbeddingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalSettings {
    /// Candidates requested from vector search when the caller passes none.
    pub default_top_k: usize,
    /// Joins the chunk texts of one document into its context block.
    pub context_separator: String,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { default_top_k: 5, context_separator: "\n".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkingSettings {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { size: 1000, overlap: 200 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    pub path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { path: "data/famdocs-store.json".to_string() }
    }
}

impl StoreSettings {
    pub fn resolved_path(&self) -> PathBuf {
        expand_path(&self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingSettings {
    pub dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { dim: 256 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.chunking.size == 0 {
            return Err(Error::InvalidConfig("chunking.size must be > 0".into()));
        }
        if self.chunking.overlap >= self.chunking.size {
            return Err(Error::InvalidConfig(format!(
                "chunking.overlap ({}) must be smaller than chunking.size ({})",
                self.chunking.overlap, self.chunking.size
            )));
        }
        if self.embedding.dim == 0 {
            return Err(Error::InvalidConfig("embedding.dim must be > 0".into()));
        }
        if self.retrieval.default_top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.default_top_k must be > 0".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
