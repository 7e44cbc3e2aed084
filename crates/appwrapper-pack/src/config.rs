//! Layered configuration for the AppWrapper header.
//!
//! Resolution order: built-in defaults → `.awpack.toml` in the working
//! directory → explicit override file. Command-line flags are applied on top
//! by the caller.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::header::AppWrapperHeader;

pub const CONFIG_FILE_NAME: &str = ".awpack.toml";

/// Resolved configuration plus the files that contributed to it.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub header: AppWrapperHeader,
    pub sources: Vec<ConfigSource>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: PathBuf,
}

/// Kinds of configuration files, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory: {source}")]
    WorkingDirectory { source: io::Error },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    appwrapper: RawAppWrapper,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAppWrapper {
    api_version: Option<String>,
    name: Option<String>,
    queue_label: Option<String>,
    queue_name: Option<String>,
    item_indent: Option<String>,
}

impl RawAppWrapper {
    fn apply(self, header: &mut AppWrapperHeader) {
        if let Some(value) = self.api_version {
            header.api_version = value;
        }
        if let Some(value) = self.name {
            header.name = value;
        }
        if let Some(value) = self.queue_label {
            header.queue_label = value;
        }
        if let Some(value) = self.queue_name {
            header.queue_name = value;
        }
        if let Some(value) = self.item_indent {
            header.item_indent = value;
        }
    }
}

impl Config {
    /// Resolves the file layers. The merged header is not validated here
    /// because command-line flags may still replace any of its values.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = match options.working_dir {
            Some(dir) => dir,
            None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory { source })?,
        };

        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let mut config = Config::default();

        let local_path = working_dir.join(CONFIG_FILE_NAME);
        if local_path.is_file() && Some(&local_path) != override_path.as_ref() {
            config.apply_layer(ConfigSourceKind::Local, local_path)?;
        }

        if let Some(path) = override_path {
            config.apply_layer(ConfigSourceKind::Override, path)?;
        }

        Ok(config)
    }

    fn apply_layer(&mut self, kind: ConfigSourceKind, path: PathBuf) -> Result<(), ConfigError> {
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let raw = parse_layer(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("applying {kind} from {}", path.display());
        raw.appwrapper.apply(&mut self.header);
        self.sources.push(ConfigSource { kind, path });
        Ok(())
    }
}

fn parse_layer(contents: &str) -> Result<RawConfig, toml::de::Error> {
    toml::from_str(contents)
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DEFAULT_NAME;

    fn header_from(contents: &str) -> AppWrapperHeader {
        let mut header = AppWrapperHeader::default();
        parse_layer(contents).unwrap().appwrapper.apply(&mut header);
        header
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(header_from(""), AppWrapperHeader::default());
    }

    #[test]
    fn partial_section_overrides_only_named_keys() {
        let header = header_from(
            r#"
            [appwrapper]
            queue_name = "team-a"
            "#,
        );
        assert_eq!(header.queue_name, "team-a");
        assert_eq!(header.name, DEFAULT_NAME);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_layer(
            r#"
            [appwrapper]
            queue = "team-a"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }
}
