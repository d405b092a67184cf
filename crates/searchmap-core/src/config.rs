//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys come from `__` in env names (`APP_PAGINATION__PER_PAGE=50`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::types::PaginationDefaults;

pub struct Config {
    figment: Figment,
}

/// Typed view over the whole configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub index: IndexSettings,
    pub pagination: PaginationDefaults,
    pub text: TextSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Overrides the model storage name as the index name.
    pub name: Option<String>,
    /// Attributes mapped when the model has no fixed property list.
    pub attributes: Vec<String>,
}

/// Settings for the tantivy-backed transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// On-disk location; indexes live in RAM when unset.
    pub index_dir: Option<String>,
    /// Attributes fed to the fulltext body. Empty means every text attribute.
    pub fields: Vec<String>,
    pub writer_heap_bytes: usize,
}

impl Default for TextSettings {
    fn default() -> Self { Self { index_dir: None, fields: Vec::new(), writer_heap_bytes: 50_000_000 } }
}

impl TextSettings {
    pub fn resolved_index_dir(&self, base: &Path) -> Option<PathBuf> {
        self.index_dir.as_deref().map(|dir| resolve_with_base(base, dir))
    }
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
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    /// Builds a config from a TOML literal, without touching files or env.
    pub fn from_toml_str(toml: &str) -> Self {
        Self { figment: Figment::new().merge(Toml::string(toml)) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> crate::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| crate::Error::InvalidConfig(e.to_string()))?;
        if settings.pagination.per_page == 0 {
            return Err(crate::Error::InvalidConfig("pagination.per_page must be positive".into()));
        }
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if matches!(env, "prod" | "production") && settings.text.index_dir.is_none() {
            anyhow::bail!("text.index_dir is required in production");
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
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
