use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use xmlseed_core::QName;
use xmlseed_generate::GenerateOptions;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Defaults read from a TOML settings file.
///
/// ```toml
/// run_dir = "runs"
///
/// [generate]
/// repetition_cap = 3
/// root_element = { name = "order", namespace = "urn:shop" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub run_dir: Option<PathBuf>,
    pub generate: GenerateOptions,
}

pub fn load_settings(path: &Path) -> SettingsResult<Settings> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

/// Flag values that override the settings file.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub root: Option<String>,
    pub root_namespace: Option<String>,
    pub repetition_cap: Option<u64>,
    pub list_length: Option<usize>,
}

impl Settings {
    /// Merge flag overrides into the configured generation options.
    pub fn resolve_options(&self, overrides: &OptionOverrides) -> SettingsResult<GenerateOptions> {
        let mut options = self.generate.clone();
        if let Some(cap) = overrides.repetition_cap {
            options.repetition_cap = cap;
        }
        if let Some(length) = overrides.list_length {
            options.list_length = length;
        }

        match (&overrides.root, &overrides.root_namespace) {
            (Some(name), namespace) => {
                let namespace = namespace.clone().unwrap_or_default();
                options.root_element = Some(QName::new(name.clone(), namespace));
            }
            (None, Some(_)) => {
                return Err(SettingsError::Invalid(
                    "--root-namespace requires --root".to_string(),
                ));
            }
            (None, None) => {}
        }

        if options.list_length == 0 {
            return Err(SettingsError::Invalid(
                "list_length must be at least 1".to_string(),
            ));
        }
        Ok(options)
    }
}
