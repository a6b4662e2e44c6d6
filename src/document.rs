//! TOML or JSON documents read from disk: simulation config and recorded
//! build data share the same loader.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Picked from the file extension; anything else is unsupported.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some(other) => Err(Error::UnsupportedConfigFormat(other.to_string())),
            None => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    fn parse<T: DeserializeOwned>(self, contents: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|err| err.to_string()),
            Self::Json => serde_json::from_str(contents).map_err(|err| err.to_string()),
        }
    }
}

/// Reads and deserializes `path`. `what` names the document in error messages.
pub fn read<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read {} '{}': {}",
            what,
            path.display(),
            err
        ))
    })?;
    format.parse(&contents).map_err(|err| {
        Error::ConfigParse(format!(
            "failed to parse {} {}: {}",
            what,
            format.name(),
            err
        ))
    })
}
