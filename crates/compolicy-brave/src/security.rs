use compolicy_contract::DeploymentMode;
use compolicy_core::BaseConfigPolicy;
use serde::{Deserialize, Serialize};

/// Whether delta patches may be offered to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeltaPolicy {
    /// Deltas stay off regardless of the base policy.
    #[default]
    Disabled,
    /// Report whatever the base policy decides.
    FollowBase,
}

/// Signing and transport requirements per deployment mode.
///
/// The vendor service authenticates responses with its own message-signing
/// protocol at the transport layer, so CUP signing is only required on the
/// upstream path. Neither path requires HTTPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityPolicy {
    mode: DeploymentMode,
    deltas: DeltaPolicy,
}

impl SecurityPolicy {
    #[must_use]
    pub const fn new(mode: DeploymentMode) -> Self {
        Self {
            mode,
            deltas: DeltaPolicy::Disabled,
        }
    }

    #[must_use]
    pub const fn with_delta_policy(mut self, deltas: DeltaPolicy) -> Self {
        self.deltas = deltas;
        self
    }

    #[must_use]
    pub const fn delta_policy(&self) -> DeltaPolicy {
        self.deltas
    }

    #[must_use]
    pub const fn requires_encryption(&self) -> bool {
        false
    }

    #[must_use]
    pub fn enabled_cup_signing(&self, base: &BaseConfigPolicy) -> bool {
        match self.mode {
            DeploymentMode::VendorServer => false,
            DeploymentMode::UpstreamStore => base.enabled_cup_signing(),
        }
    }

    #[must_use]
    pub fn enabled_deltas(&self, base: &BaseConfigPolicy) -> bool {
        match self.deltas {
            DeltaPolicy::Disabled => false,
            DeltaPolicy::FollowBase => base.enabled_deltas(),
        }
    }
}
