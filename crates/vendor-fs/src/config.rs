//! Serde persistence for config-like files
//!
//! `vendor.yml` and `vendor.lock` are YAML and the checksum cache is JSON.
//! TOML is accepted as well. Saves always go through [`io::write_atomic`].

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Format for a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Format implied by the extension of `path`.
    pub fn for_path(path: &NormalizedPath) -> Result<Self> {
        Self::from_extension(path.extension().unwrap_or_default())
    }

    fn decode<T: DeserializeOwned>(self, text: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    fn encode<T: Serialize>(self, value: &T) -> std::result::Result<String, String> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        })
    }
}

/// Loads and saves serde values, choosing the format by extension unless
/// one is given.
#[derive(Debug, Default)]
pub struct ConfigStore {
    robustness: io::RobustnessConfig,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_robustness(robustness: io::RobustnessConfig) -> Self {
        Self { robustness }
    }

    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        self.load_as(path, Format::for_path(path)?)
    }

    pub fn load_as<T: DeserializeOwned>(&self, path: &NormalizedPath, format: Format) -> Result<T> {
        let text = io::read_text(path)?;
        format.decode(&text).map_err(|message| Error::Parse {
            path: path.to_native(),
            format,
            message,
        })
    }

    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        self.save_as(path, value, Format::for_path(path)?)
    }

    /// Encode `value` and write it atomically. Nothing is written if
    /// encoding fails.
    pub fn save_as<T: Serialize>(
        &self,
        path: &NormalizedPath,
        value: &T,
        format: Format,
    ) -> Result<()> {
        let text = format.encode(value).map_err(|message| Error::Encode {
            path: path.to_native(),
            format,
            message,
        })?;
        io::write_atomic(path, text.as_bytes(), self.robustness)
    }
}
