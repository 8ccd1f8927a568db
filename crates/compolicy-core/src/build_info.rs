use semver::Version;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::version::{VersionParseError, package_version, parse_browser_version};

#[derive(Debug, Error)]
pub enum BuildInfoError {
    #[error("invalid browser version: {0}")]
    Version(#[from] VersionParseError),
    #[error("failed to parse build info: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Build-time facts the base policy reports upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    #[serde(
        default = "package_version",
        deserialize_with = "deserialize_browser_version"
    )]
    pub version: Version,

    #[serde(default = "default_os_long_name")]
    pub os_long_name: String,
}

fn default_os_long_name() -> String {
    compolicy_platform::os_long_name().to_string()
}

fn deserialize_browser_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_browser_version(&raw).map_err(serde::de::Error::custom)
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: package_version(),
            os_long_name: default_os_long_name(),
        }
    }
}

impl BuildInfo {
    /// Build info for `version` on the current OS.
    ///
    /// # Errors
    /// Returns an error if `version` is not a parseable product version.
    pub fn new(version: &str) -> Result<Self, BuildInfoError> {
        Ok(Self {
            version: parse_browser_version(version)?,
            os_long_name: default_os_long_name(),
        })
    }

    #[must_use]
    pub fn with_os_long_name(mut self, os_long_name: impl Into<String>) -> Self {
        self.os_long_name = os_long_name.into();
        self
    }

    /// Load build info from a JSON document; missing fields take defaults.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or the version is invalid.
    pub fn from_json(json: &str) -> Result<Self, BuildInfoError> {
        serde_json::from_str(json).map_err(BuildInfoError::Parse)
    }
}
