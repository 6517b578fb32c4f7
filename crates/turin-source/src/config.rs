use std::path::Path;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Name of the configuration file looked up in a package root.
pub const CONFIG_FILE_NAME: &str = "turin.toml";

/// Configuration of one compilation batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Package information
    #[serde(default)]
    pub package: PackageInfo,

    /// How the symbol resolver chain behaves
    #[serde(default)]
    pub resolver: ResolverOptions,

    /// How the validation pass runs
    #[serde(default)]
    pub validation: ValidationOptions,

    /// Platform libraries made visible to the batch, by name and version
    #[serde(default)]
    pub libraries: FxHashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Name of the package
    pub name: String,

    /// Version of the package (semver)
    #[serde(default = "default_version")]
    pub version: String,

    /// Authors of the package
    #[serde(default)]
    pub authors: Vec<String>,

    /// Package description
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for PackageInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: default_version(),
            authors: vec![],
            description: None,
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Let package existence checks fall through to the outer resolver.
    ///
    /// Off by default: imports are checked against the packages declared in
    /// the batch only.
    #[serde(default)]
    pub delegate_package_lookup: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Validate the files of a batch on separate threads.
    #[serde(default)]
    pub parallel: bool,
}

impl CompilerConfig {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration from a file, or from `turin.toml` inside a directory.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let file = if path.is_dir() {
            path.join(CONFIG_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        if !file.exists() {
            return Err(ConfigError::NotFound(file));
        }
        let text = std::fs::read_to_string(&file)?;
        log::debug!("loading configuration from {}", file.display());
        Self::from_toml_str(&text)
    }
}
