//! Configuration file loading helpers
//!
//! Services deserialize their own config structs from a TOML file; a missing
//! file falls back to the struct's defaults so a bare checkout still starts.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load a TOML config file into `T`, failing if the file is absent or invalid
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load a TOML config file into `T`, using `T::default()` when the file is absent
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.exists() {
        load_toml(path)
    } else {
        tracing::info!("Config file {} not found, using defaults", path.display());
        Ok(T::default())
    }
}
