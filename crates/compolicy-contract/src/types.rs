use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::ContractError;

/// Which backend a provider talks to. Chosen once when the provider is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentMode {
    /// The vendor runs its own update service.
    VendorServer,
    /// The platform's default component store.
    UpstreamStore,
}

impl DeploymentMode {
    #[must_use]
    pub const fn from_vendor_flag(use_vendor_server: bool) -> Self {
        if use_vendor_server {
            Self::VendorServer
        } else {
            Self::UpstreamStore
        }
    }

    #[must_use]
    pub const fn is_vendor_server(self) -> bool {
        matches!(self, Self::VendorServer)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VendorServer => "vendor-server",
            Self::UpstreamStore => "upstream-store",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vendor-server" => Some(Self::VendorServer),
            "upstream-store" => Some(Self::UpstreamStore),
            _ => None,
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, non-empty list of endpoints. Earlier entries are tried first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Url>", into = "Vec<Url>")]
pub struct EndpointSet {
    urls: Vec<Url>,
}

impl EndpointSet {
    /// Returns `None` when `urls` is empty.
    #[must_use]
    pub fn new(urls: Vec<Url>) -> Option<Self> {
        if urls.is_empty() {
            None
        } else {
            Some(Self { urls })
        }
    }

    #[must_use]
    pub fn single(url: Url) -> Self {
        Self { urls: vec![url] }
    }

    /// Endpoints from URL literals compiled into the binary.
    ///
    /// # Panics
    /// Panics if a literal is not an absolute `http`/`https` URL. Only
    /// constants are passed here and each one is parsed in a unit test.
    #[must_use]
    pub fn from_static(urls: &'static [&'static str]) -> Self {
        match Self::parse(urls.iter().copied()) {
            Ok(set) => set,
            Err(e) => panic!("built-in endpoint list is invalid: {e}"),
        }
    }

    /// Parse absolute http(s) URLs, keeping their order.
    ///
    /// # Errors
    /// Returns an error if any entry is not an absolute `http`/`https` URL or
    /// if no entries are given.
    pub fn parse<I, S>(urls: I) -> Result<Self, ContractError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls = urls
            .into_iter()
            .map(|raw| parse_endpoint(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(urls).ok_or(ContractError::EmptyEndpointSet)
    }

    #[must_use]
    pub fn primary(&self) -> &Url {
        &self.urls[0]
    }

    #[must_use]
    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Url> {
        self.urls.iter()
    }

    /// Drop every non-`https` endpoint. `None` if nothing secure is left.
    #[must_use]
    pub fn secure_only(&self) -> Option<Self> {
        Self::new(
            self.urls
                .iter()
                .filter(|url| url.scheme() == "https")
                .cloned()
                .collect(),
        )
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ContractError> {
    let url = Url::parse(raw).map_err(|e| ContractError::invalid_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ContractError::UnsupportedScheme {
            url: raw.to_string(),
        }),
    }
}

impl TryFrom<Vec<Url>> for EndpointSet {
    type Error = ContractError;

    fn try_from(urls: Vec<Url>) -> Result<Self, Self::Error> {
        Self::new(urls).ok_or(ContractError::EmptyEndpointSet)
    }
}

impl From<EndpointSet> for Vec<Url> {
    fn from(set: EndpointSet) -> Self {
        set.urls
    }
}

impl<'a> IntoIterator for &'a EndpointSet {
    type Item = &'a Url;
    type IntoIter = std::slice::Iter<'a, Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Advisory timing for the engine's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySchedule {
    /// Wait before the first check after startup.
    pub initial: Duration,
    /// Interval between periodic checks.
    pub next_check: Duration,
    /// Minimum spacing between on-demand checks.
    pub on_demand: Duration,
    /// Wait before applying an update that is already downloaded.
    pub update: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecurityFlags {
    pub require_signed_responses: bool,
    pub allow_delta_patches: bool,
    pub require_encryption: bool,
}

/// Everything a provider reports about the running product.
///
/// Only `browser_version` is guaranteed to carry a value; the string fields
/// may be intentionally empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDescriptor {
    pub prod_id: String,
    pub browser_version: Version,
    pub channel: String,
    pub brand: String,
    pub lang: String,
    pub os_long_name: String,
    pub app_guid: String,
    pub extra_request_params: String,
    pub download_preference: String,
}
