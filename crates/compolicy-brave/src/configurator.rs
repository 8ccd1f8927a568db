use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use compolicy_contract::{
    ActivityDataService, Configurator, Connector, DeploymentMode, EndpointSet,
    IdentityDescriptor, MainThread, MainThreadToken, NetworkContextManager, PrefService,
    RequestContext, SecurityFlags, ServiceManager, UrlLoaderFactory,
};
use compolicy_core::{BaseConfigPolicy, BuildInfo, CommandLine, CommandLineConfigPolicy};
use compolicy_platform::{InstallerIdentity, native_installer_identity};
use log::{debug, info, log_enabled};
use semver::Version;
use serde::Serialize;

use crate::endpoints::EndpointSelector;
use crate::identity::IdentityReporter;
use crate::security::{DeltaPolicy, SecurityPolicy};

/// Handles owned by the embedding application.
#[derive(Clone)]
pub struct Collaborators {
    /// `None` until the application's network context manager exists.
    network: Option<Arc<dyn NetworkContextManager>>,
    service: Option<ServiceHandle>,
    installer_identity: Arc<dyn InstallerIdentity>,
}

/// A service manager is only reachable together with the thread it serves.
#[derive(Clone)]
struct ServiceHandle {
    manager: Arc<dyn ServiceManager>,
    main_thread: MainThread,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            network: None,
            service: None,
            installer_identity: native_installer_identity(),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("network", &self.network.is_some())
            .field("service_manager", &self.service.is_some())
            .field(
                "main_thread",
                &self.service.as_ref().map(|service| service.main_thread),
            )
            .finish_non_exhaustive()
    }
}

impl Collaborators {
    #[must_use]
    pub fn with_network(mut self, network: Arc<dyn NetworkContextManager>) -> Self {
        self.network = Some(network);
        self
    }

    /// Connectors are handed out only on `main_thread`.
    #[must_use]
    pub fn with_service_manager(
        mut self,
        service_manager: Arc<dyn ServiceManager>,
        main_thread: MainThread,
    ) -> Self {
        self.service = Some(ServiceHandle {
            manager: service_manager,
            main_thread,
        });
        self
    }

    #[must_use]
    pub fn with_installer_identity(mut self, installer_identity: Arc<dyn InstallerIdentity>) -> Self {
        self.installer_identity = installer_identity;
        self
    }
}

/// Every value query of a provider, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySnapshot {
    pub deployment_mode: DeploymentMode,
    pub initial_delay_secs: u64,
    pub next_check_delay_secs: u64,
    pub on_demand_delay_secs: u64,
    pub update_delay_secs: u64,
    pub update_urls: EndpointSet,
    pub ping_urls: EndpointSet,
    pub security: SecurityFlags,
    pub delta_policy: DeltaPolicy,
    pub identity: IdentityDescriptor,
    pub enabled_component_updates: bool,
    pub enabled_background_downloader: bool,
    pub is_per_user_install: bool,
    pub run_action_key_hash: Vec<u8>,
}

/// Component updater policy for the browser.
///
/// | query | source |
/// |---|---|
/// | delays, component updates, background downloader, key hash | base policy |
/// | update/ping URLs | [`EndpointSelector`], mode-dependent |
/// | CUP signing | [`SecurityPolicy`], mode-dependent |
/// | deltas | [`SecurityPolicy`], off |
/// | product id, brand, lang, download preference | empty |
/// | channel | `"stable"` |
/// | version, OS name, extra params, app GUID | [`IdentityReporter`] |
/// | pref service, activity data | none |
/// | per-user install | false |
pub struct BraveConfigurator {
    mode: DeploymentMode,
    base: BaseConfigPolicy,
    endpoints: EndpointSelector,
    security: SecurityPolicy,
    identity: IdentityReporter,
    network: Option<Arc<dyn NetworkContextManager>>,
    service: Option<ServiceHandle>,
}

impl fmt::Debug for BraveConfigurator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraveConfigurator")
            .field("mode", &self.mode)
            .field("base", &self.base)
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

impl BraveConfigurator {
    #[must_use]
    pub fn new(
        command_line: &CommandLine,
        build: BuildInfo,
        mode: DeploymentMode,
        collaborators: Collaborators,
    ) -> Self {
        let security = SecurityPolicy::new(mode);
        let base = BaseConfigPolicy::new(
            CommandLineConfigPolicy::new(command_line),
            build,
            security.requires_encryption(),
        );
        Self::from_base(base, mode, collaborators)
    }

    /// Wrap an already configured base policy.
    #[must_use]
    pub fn from_base(
        base: BaseConfigPolicy,
        mode: DeploymentMode,
        collaborators: Collaborators,
    ) -> Self {
        let Collaborators {
            network,
            service,
            installer_identity,
        } = collaborators;

        let configurator = Self {
            mode,
            base,
            endpoints: EndpointSelector::new(mode),
            security: SecurityPolicy::new(mode),
            identity: IdentityReporter::new(installer_identity),
            network,
            service,
        };
        configurator.log_resolved();
        configurator
    }

    /// Override the delta policy. Deltas are disabled unless this is called.
    #[must_use]
    pub fn with_delta_policy(mut self, deltas: DeltaPolicy) -> Self {
        self.security = self.security.with_delta_policy(deltas);
        debug!("Component updater delta policy set to {deltas:?}");
        self
    }

    #[must_use]
    pub fn deployment_mode(&self) -> DeploymentMode {
        self.mode
    }

    #[must_use]
    pub fn base(&self) -> &BaseConfigPolicy {
        &self.base
    }

    #[must_use]
    pub fn snapshot(&self) -> PolicySnapshot {
        let delays = self.delay_schedule();
        PolicySnapshot {
            deployment_mode: self.mode,
            initial_delay_secs: delays.initial.as_secs(),
            next_check_delay_secs: delays.next_check.as_secs(),
            on_demand_delay_secs: delays.on_demand.as_secs(),
            update_delay_secs: delays.update.as_secs(),
            update_urls: self.update_urls(),
            ping_urls: self.ping_urls(),
            security: self.security_flags(),
            delta_policy: self.security.delta_policy(),
            identity: self.identity(),
            enabled_component_updates: self.enabled_component_updates(),
            enabled_background_downloader: self.enabled_background_downloader(),
            is_per_user_install: self.is_per_user_install(),
            run_action_key_hash: self.run_action_key_hash(),
        }
    }

    fn log_resolved(&self) {
        info!(
            "Component updater policy uses {} endpoint {}",
            self.mode,
            self.update_urls().primary()
        );
        if log_enabled!(log::Level::Debug) {
            match serde_json::to_string(&self.snapshot()) {
                Ok(json) => debug!("Component updater policy: {json}"),
                Err(e) => debug!("Could not serialize component updater policy: {e}"),
            }
        }
    }
}

impl Configurator for BraveConfigurator {
    fn initial_delay(&self) -> Duration {
        self.base.initial_delay()
    }

    fn next_check_delay(&self) -> Duration {
        self.base.next_check_delay()
    }

    fn on_demand_delay(&self) -> Duration {
        self.base.on_demand_delay()
    }

    fn update_delay(&self) -> Duration {
        self.base.update_delay()
    }

    fn update_urls(&self) -> EndpointSet {
        self.endpoints.update_urls(&self.base)
    }

    fn ping_urls(&self) -> EndpointSet {
        self.endpoints.ping_urls(&self.base)
    }

    fn prod_id(&self) -> String {
        self.identity.prod_id()
    }

    fn browser_version(&self) -> Version {
        self.identity.browser_version(&self.base)
    }

    fn channel(&self) -> String {
        self.identity.channel()
    }

    fn brand(&self) -> String {
        self.identity.brand()
    }

    fn lang(&self) -> String {
        self.identity.lang()
    }

    fn os_long_name(&self) -> String {
        self.identity.os_long_name(&self.base)
    }

    fn extra_request_params(&self) -> String {
        self.identity.extra_request_params(&self.base)
    }

    fn download_preference(&self) -> String {
        self.identity.download_preference()
    }

    fn request_context(&self) -> Option<Arc<dyn RequestContext>> {
        self.network.as_ref().map(|network| network.request_context())
    }

    fn url_loader_factory(&self) -> Option<Arc<dyn UrlLoaderFactory>> {
        // Absent when built from a test harness before networking starts.
        self.network
            .as_ref()
            .map(|network| network.shared_url_loader_factory())
    }

    fn create_service_connector(&self, token: &MainThreadToken) -> Option<Box<dyn Connector>> {
        let service = self.service.as_ref()?;
        debug_assert!(
            token.belongs_to(&service.main_thread) && service.main_thread.is_current(),
            "service connector requested off the main thread"
        );
        Some(service.manager.connector().clone_box())
    }

    fn enabled_deltas(&self) -> bool {
        self.security.enabled_deltas(&self.base)
    }

    fn enabled_component_updates(&self) -> bool {
        self.base.enabled_component_updates()
    }

    fn enabled_background_downloader(&self) -> bool {
        self.base.enabled_background_downloader()
    }

    fn enabled_cup_signing(&self) -> bool {
        self.security.enabled_cup_signing(&self.base)
    }

    fn requires_encryption(&self) -> bool {
        self.base.require_encryption()
    }

    fn pref_service(&self) -> Option<&dyn PrefService> {
        None
    }

    fn activity_data_service(&self) -> Option<&dyn ActivityDataService> {
        None
    }

    fn is_per_user_install(&self) -> bool {
        false
    }

    fn run_action_key_hash(&self) -> Vec<u8> {
        self.base.run_action_key_hash()
    }

    fn app_guid(&self) -> String {
        self.identity.app_guid(&self.base)
    }
}

/// Build the browser's component updater policy.
///
/// `network` may be `None` when the network context manager has not been
/// created yet; loader factory queries then return `None`.
#[must_use]
pub fn make_configurator(
    command_line: &CommandLine,
    network: Option<Arc<dyn NetworkContextManager>>,
    use_vendor_server: bool,
) -> Arc<dyn Configurator> {
    let mut collaborators = Collaborators::default();
    if let Some(network) = network {
        collaborators = collaborators.with_network(network);
    }
    Arc::new(BraveConfigurator::new(
        command_line,
        BuildInfo::default(),
        DeploymentMode::from_vendor_flag(use_vendor_server),
        collaborators,
    ))
}
