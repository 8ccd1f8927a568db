use std::sync::LazyLock;
use std::time::Duration;

use compolicy_contract::EndpointSet;
use log::debug;
use semver::Version;

use crate::build_info::BuildInfo;
use crate::command_line::CommandLineConfigPolicy;

pub const DEFAULT_UPDATE_URL: &str = "https://clients2.google.com/service/update2/json";
pub const FALLBACK_UPDATE_URL: &str = "http://clients2.google.com/service/update2/json";

const ONE_MINUTE: Duration = Duration::from_secs(60);
const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

// SHA-256 of the SubjectPublicKeyInfo allowed to sign run actions.
const RUN_ACTION_KEY_HASH: [u8; 32] = [
    0x5f, 0x94, 0xe0, 0x3c, 0x64, 0x30, 0x9f, 0xbc, 0xfe, 0x00, 0x9a, 0x27, 0x3e, 0x52, 0xbf,
    0xa5, 0x84, 0xb9, 0xb3, 0x75, 0x07, 0x29, 0xde, 0xfa, 0x32, 0x76, 0xd9, 0x93, 0xb5, 0xa3,
    0xce, 0x02,
];

static BUILTIN_UPDATE_URLS: LazyLock<EndpointSet> =
    LazyLock::new(|| EndpointSet::from_static(&[DEFAULT_UPDATE_URL, FALLBACK_UPDATE_URL]));

/// Generic updater policy derived from command-line and build configuration.
///
/// Vendor providers wrap this and override the values they care about.
#[derive(Debug, Clone)]
pub struct BaseConfigPolicy {
    config: CommandLineConfigPolicy,
    build: BuildInfo,
    require_encryption: bool,
    default_update_urls: EndpointSet,
    extra_info: String,
}

impl BaseConfigPolicy {
    #[must_use]
    pub fn new(config: CommandLineConfigPolicy, build: BuildInfo, require_encryption: bool) -> Self {
        let extra_info = if config.test_request() {
            "testrequest=\"1\"".to_string()
        } else {
            String::new()
        };
        let policy = Self {
            config,
            build,
            require_encryption,
            default_update_urls: BUILTIN_UPDATE_URLS.clone(),
            extra_info,
        };
        debug!(
            "Base updater policy: fast_update={}, pings={}, deltas={}, require_encryption={}",
            policy.config.fast_update(),
            policy.config.pings_enabled(),
            policy.config.deltas_enabled(),
            policy.require_encryption
        );
        policy
    }

    /// Replace the built-in endpoints used when no `url-source` is given.
    #[must_use]
    pub fn with_default_update_urls(mut self, urls: EndpointSet) -> Self {
        self.default_update_urls = urls;
        self
    }

    #[must_use]
    pub fn config(&self) -> &CommandLineConfigPolicy {
        &self.config
    }

    #[must_use]
    pub fn build_info(&self) -> &BuildInfo {
        &self.build
    }

    #[must_use]
    pub fn require_encryption(&self) -> bool {
        self.require_encryption
    }

    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        if let Some(delay) = self.config.initial_delay() {
            return delay;
        }
        if self.config.fast_update() {
            Duration::from_secs(10)
        } else {
            6 * ONE_MINUTE
        }
    }

    #[must_use]
    pub fn next_check_delay(&self) -> Duration {
        5 * ONE_HOUR
    }

    #[must_use]
    pub fn on_demand_delay(&self) -> Duration {
        if self.config.fast_update() {
            Duration::from_secs(2)
        } else {
            30 * ONE_MINUTE
        }
    }

    #[must_use]
    pub fn update_delay(&self) -> Duration {
        if self.config.fast_update() {
            Duration::from_secs(10)
        } else {
            15 * ONE_MINUTE
        }
    }

    /// The `url-source` override if present, else the default endpoints.
    /// Plain-http defaults are dropped when encryption is required.
    #[must_use]
    pub fn update_urls(&self) -> EndpointSet {
        if let Some(url) = self.config.url_source_override() {
            return EndpointSet::single(url.clone());
        }
        if self.require_encryption
            && let Some(secure) = self.default_update_urls.secure_only()
        {
            return secure;
        }
        self.default_update_urls.clone()
    }

    /// `None` when pings are disabled.
    #[must_use]
    pub fn ping_urls(&self) -> Option<EndpointSet> {
        self.config.pings_enabled().then(|| self.update_urls())
    }

    #[must_use]
    pub fn browser_version(&self) -> &Version {
        &self.build.version
    }

    #[must_use]
    pub fn os_long_name(&self) -> &str {
        &self.build.os_long_name
    }

    #[must_use]
    pub fn extra_request_params(&self) -> &str {
        &self.extra_info
    }

    #[must_use]
    pub fn enabled_deltas(&self) -> bool {
        self.config.deltas_enabled()
    }

    #[must_use]
    pub fn enabled_component_updates(&self) -> bool {
        true
    }

    #[must_use]
    pub fn enabled_background_downloader(&self) -> bool {
        self.config.background_downloads_enabled()
    }

    #[must_use]
    pub fn enabled_cup_signing(&self) -> bool {
        true
    }

    #[must_use]
    pub fn run_action_key_hash(&self) -> Vec<u8> {
        RUN_ACTION_KEY_HASH.to_vec()
    }

    #[must_use]
    pub fn app_guid(&self) -> &str {
        ""
    }
}
