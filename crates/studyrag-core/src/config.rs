//! Configuration loader and retrieval settings.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars, and exposes the typed retrieval knobs (chunk size/overlap, Top-K,
//! ranking method) with their documented defaults and ranges.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::Error;
use crate::types::RetrievalMethod;

pub const DEFAULT_CHUNK_SIZE: usize = 1200;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_TOP_K: usize = 5;

/// Tunable retrieval knobs, read from the `retrieval.*` config keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetrievalSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub method: RetrievalMethod,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            method: RetrievalMethod::LexicalOverlap,
        }
    }
}

impl RetrievalSettings {
    /// Check the documented ranges: chunk size 400–2400 chars, overlap
    /// 0–800 chars, Top-K 1–10.
    pub fn validate(&self) -> Result<(), Error> {
        if !(400..=2400).contains(&self.chunk_size) {
            return Err(Error::InvalidConfig(format!(
                "chunk_size {} outside 400..=2400",
                self.chunk_size
            )));
        }
        if self.chunk_overlap > 800 {
            return Err(Error::InvalidConfig(format!(
                "chunk_overlap {} outside 0..=800",
                self.chunk_overlap
            )));
        }
        if !(1..=10).contains(&self.top_k) {
            return Err(Error::InvalidConfig(format!(
                "top_k {} outside 1..=10",
                self.top_k
            )));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Retrieval settings with per-key fallbacks to the documented defaults,
    /// validated against their ranges.
    pub fn retrieval(&self) -> anyhow::Result<RetrievalSettings> {
        let defaults = RetrievalSettings::default();
        let method = match self.get::<String>("retrieval.method") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.method,
        };
        let settings = RetrievalSettings {
            chunk_size: self
                .get("retrieval.chunk_size")
                .unwrap_or(defaults.chunk_size),
            chunk_overlap: self
                .get("retrieval.chunk_overlap")
                .unwrap_or(defaults.chunk_overlap),
            top_k: self.get("retrieval.top_k").unwrap_or(defaults.top_k),
            method,
        };
        settings.validate()?;
        Ok(settings)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_within_range() {
        let settings = RetrievalSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.chunk_size, 1200);
        assert_eq!(settings.chunk_overlap, 200);
        assert_eq!(settings.top_k, 5);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut settings = RetrievalSettings::default();
        settings.chunk_size = 100;
        assert!(settings.validate().is_err());

        let mut settings = RetrievalSettings::default();
        settings.top_k = 0;
        assert!(settings.validate().is_err());

        let mut settings = RetrievalSettings::default();
        settings.chunk_overlap = 1000;
        assert!(settings.validate().is_err());
    }
}
