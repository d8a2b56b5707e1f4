use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading configuration file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error during YAML file decoding of {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Services to resolve and ranges to pass through, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub services: Vec<String>,
    pub ranges: Vec<String>,
}

/// On-disk shape. Both keys may be missing or explicitly `null`.
#[derive(Deserialize, Default)]
struct RawServiceConfig {
    #[serde(default)]
    services: Option<Vec<String>>,
    #[serde(default)]
    ranges: Option<Vec<String>>,
}

impl ServiceConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&contents).map_err(|source| ConfigError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        if is_blank_document(contents) {
            return Ok(Self::default());
        }

        // Only the first document counts; anything after a `---` is ignored.
        let Some(document) = serde_yaml::Deserializer::from_str(contents).next() else {
            return Ok(Self::default());
        };
        let raw = Option::<RawServiceConfig>::deserialize(document)?.unwrap_or_default();

        Ok(Self {
            services: raw.services.unwrap_or_default(),
            ranges: raw.ranges.unwrap_or_default(),
        })
    }
}

/// An empty file, or one holding only comments, has no YAML document.
fn is_blank_document(contents: &str) -> bool {
    contents
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}
