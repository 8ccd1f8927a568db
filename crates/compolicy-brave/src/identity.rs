use std::fmt;
use std::sync::Arc;

use compolicy_core::BaseConfigPolicy;
use compolicy_platform::InstallerIdentity;
use semver::Version;

/// Channel reported regardless of the build's actual release channel.
pub const STABLE_CHANNEL: &str = "stable";

/// Identity strings sent with every request. Product id, brand, language and
/// download preference are withheld.
#[derive(Clone)]
pub struct IdentityReporter {
    installer: Arc<dyn InstallerIdentity>,
}

impl fmt::Debug for IdentityReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityReporter").finish_non_exhaustive()
    }
}

impl IdentityReporter {
    #[must_use]
    pub fn new(installer: Arc<dyn InstallerIdentity>) -> Self {
        Self { installer }
    }

    #[must_use]
    pub fn prod_id(&self) -> String {
        String::new()
    }

    #[must_use]
    pub fn channel(&self) -> String {
        STABLE_CHANNEL.to_string()
    }

    #[must_use]
    pub fn brand(&self) -> String {
        String::new()
    }

    #[must_use]
    pub fn lang(&self) -> String {
        String::new()
    }

    #[must_use]
    pub fn download_preference(&self) -> String {
        String::new()
    }

    #[must_use]
    pub fn browser_version(&self, base: &BaseConfigPolicy) -> Version {
        base.browser_version().clone()
    }

    #[must_use]
    pub fn os_long_name(&self, base: &BaseConfigPolicy) -> String {
        base.os_long_name().to_string()
    }

    #[must_use]
    pub fn extra_request_params(&self, base: &BaseConfigPolicy) -> String {
        base.extra_request_params().to_string()
    }

    /// The installer registry's GUID where one exists, else the base value.
    #[must_use]
    pub fn app_guid(&self, base: &BaseConfigPolicy) -> String {
        self.installer
            .app_guid()
            .unwrap_or_else(|| base.app_guid().to_string())
    }
}

#[cfg(test)]
mod tests {
    use compolicy_core::{BuildInfo, CommandLine, CommandLineConfigPolicy};
    use compolicy_platform::NoInstallerIdentity;

    use super::*;

    struct FixedIdentity(&'static str);

    impl InstallerIdentity for FixedIdentity {
        fn app_guid(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn base() -> BaseConfigPolicy {
        let config = CommandLineConfigPolicy::new(&CommandLine::from_args([
            "--component-updater=test-request",
        ]));
        let build = BuildInfo::new("1.60.114")
            .expect("valid version")
            .with_os_long_name("Windows");
        BaseConfigPolicy::new(config, build, false)
    }

    #[test]
    fn withheld_fields_are_empty() {
        let reporter = IdentityReporter::new(Arc::new(NoInstallerIdentity));

        assert_eq!(reporter.prod_id(), "");
        assert_eq!(reporter.brand(), "");
        assert_eq!(reporter.lang(), "");
        assert_eq!(reporter.download_preference(), "");
    }

    #[test]
    fn channel_is_always_stable() {
        let reporter = IdentityReporter::new(Arc::new(NoInstallerIdentity));

        assert_eq!(reporter.channel(), STABLE_CHANNEL);
    }

    #[test]
    fn build_derived_fields_come_from_base() {
        let reporter = IdentityReporter::new(Arc::new(NoInstallerIdentity));
        let base = base();

        assert_eq!(reporter.browser_version(&base), Version::new(1, 60, 114));
        assert_eq!(reporter.os_long_name(&base), "Windows");
        assert_eq!(reporter.extra_request_params(&base), "testrequest=\"1\"");
    }

    #[test]
    fn app_guid_prefers_installer_registry() {
        let reporter = IdentityReporter::new(Arc::new(FixedIdentity(
            "{AFE6A462-C574-4B8A-AF43-4CC60DF4563B}",
        )));

        assert_eq!(
            reporter.app_guid(&base()),
            "{AFE6A462-C574-4B8A-AF43-4CC60DF4563B}"
        );
    }

    #[test]
    fn app_guid_falls_back_to_base_without_registry() {
        let reporter = IdentityReporter::new(Arc::new(NoInstallerIdentity));

        assert_eq!(reporter.app_guid(&base()), base().app_guid());
    }
}
