//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/markup-builder/markup-builder.toml`
//! 3. Local config: an explicitly given TOML file
//! 4. Environment variables: `MARKUP_BUILDER_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::backends::{DomBackend, MarkupBackend};

const APP_NAME: &str = "markup-builder";
const ENV_PREFIX: &str = "MARKUP_BUILDER";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment overrides: {0}")]
    Env(#[from] config::ConfigError),
}

/// Result type for settings loading.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Options of the markup string backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkupSettings {
    /// Render childless elements as `<name/>`
    pub self_close_empty: bool,
    /// Reject element and attribute names that are not XML names
    pub validate_names: bool,
    /// Prefix documents with an XML declaration
    pub xml_declaration: bool,
}

impl Default for MarkupSettings {
    fn default() -> Self {
        Self {
            self_close_empty: true,
            validate_names: true,
            xml_declaration: false,
        }
    }
}

/// Options of the DOM backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DomSettings {
    /// Serialize childless elements as `<name/>`
    pub self_close_empty: bool,
    /// Reject element and attribute names that are not XML names
    pub validate_names: bool,
}

impl Default for DomSettings {
    fn default() -> Self {
        Self {
            self_close_empty: true,
            validate_names: true,
        }
    }
}

/// Raw markup settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMarkupSettings {
    pub self_close_empty: Option<bool>,
    pub validate_names: Option<bool>,
    pub xml_declaration: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDomSettings {
    pub self_close_empty: Option<bool>,
    pub validate_names: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub markup: RawMarkupSettings,
    pub dom: RawDomSettings,
}

/// Unified configuration for the bundled backends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub markup: MarkupSettings,
    pub dom: DomSettings,
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{}.toml", APP_NAME)))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> SettingsResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `local` is an optional config file applied over the global one; it must
    /// exist when given.
    pub fn load(local: Option<&Path>) -> SettingsResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!("load: local config {}", local_path.display());
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Parse settings from a TOML string over compiled defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let raw: RawSettings = toml::from_str(content)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            markup: MarkupSettings {
                self_close_empty: overlay
                    .markup
                    .self_close_empty
                    .unwrap_or(self.markup.self_close_empty),
                validate_names: overlay
                    .markup
                    .validate_names
                    .unwrap_or(self.markup.validate_names),
                xml_declaration: overlay
                    .markup
                    .xml_declaration
                    .unwrap_or(self.markup.xml_declaration),
            },
            dom: DomSettings {
                self_close_empty: overlay
                    .dom
                    .self_close_empty
                    .unwrap_or(self.dom.self_close_empty),
                validate_names: overlay
                    .dom
                    .validate_names
                    .unwrap_or(self.dom.validate_names),
            },
        }
    }

    /// Apply `MARKUP_BUILDER_*` environment variables as explicit overrides,
    /// e.g. `MARKUP_BUILDER_MARKUP__XML_DECLARATION=true`.
    fn apply_env_overrides(mut settings: Self) -> SettingsResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        if let Ok(val) = config.get_bool("markup.self_close_empty") {
            settings.markup.self_close_empty = val;
        }
        if let Ok(val) = config.get_bool("markup.validate_names") {
            settings.markup.validate_names = val;
        }
        if let Ok(val) = config.get_bool("markup.xml_declaration") {
            settings.markup.xml_declaration = val;
        }
        if let Ok(val) = config.get_bool("dom.self_close_empty") {
            settings.dom.self_close_empty = val;
        }
        if let Ok(val) = config.get_bool("dom.validate_names") {
            settings.dom.validate_names = val;
        }

        Ok(settings)
    }

    pub fn markup_backend(&self) -> MarkupBackend {
        MarkupBackend::from_settings(&self.markup)
    }

    pub fn dom_backend(&self) -> DomBackend {
        DomBackend::from_settings(&self.dom)
    }
}
