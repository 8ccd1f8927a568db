use std::sync::LazyLock;

use compolicy_contract::{DeploymentMode, EndpointSet};
use compolicy_core::BaseConfigPolicy;

/// The vendor's dedicated component update service.
pub const VENDOR_UPDATE_URL: &str = "https://laptop-updates.brave.com/extensions";

static VENDOR_UPDATE_URLS: LazyLock<EndpointSet> =
    LazyLock::new(|| EndpointSet::from_static(&[VENDOR_UPDATE_URL]));

/// Chooses between the vendor service and the upstream store.
#[derive(Debug, Clone)]
pub struct EndpointSelector {
    mode: DeploymentMode,
}

impl EndpointSelector {
    #[must_use]
    pub const fn new(mode: DeploymentMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn update_urls(&self, base: &BaseConfigPolicy) -> EndpointSet {
        match self.mode {
            DeploymentMode::VendorServer => VENDOR_UPDATE_URLS.clone(),
            DeploymentMode::UpstreamStore => base.update_urls(),
        }
    }

    /// Pings always go to the update endpoints.
    #[must_use]
    pub fn ping_urls(&self, base: &BaseConfigPolicy) -> EndpointSet {
        self.update_urls(base)
    }
}
