use crate::api::DEFAULT_API_BASE;
use std::env;
use std::path::PathBuf;
use tracing::info;

pub const API_BASE_VAR: &str = "CINELIST_API_BASE";
pub const STORAGE_PATH_VAR: &str = "CINELIST_STORAGE_PATH";
pub const DEFAULT_STORAGE_PATH: &str = ".cinelist/storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub storage_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let config = Self {
            api_base: read(API_BASE_VAR).unwrap_or(defaults.api_base),
            storage_path: read(STORAGE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
        };
        info!(
            "Using API {} with storage {:?}",
            config.api_base, config.storage_path
        );
        config
    }
}
