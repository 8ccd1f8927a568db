use std::sync::Arc;

use compolicy_brave::{
    BraveConfigurator, Collaborators, STABLE_CHANNEL, VENDOR_UPDATE_URL, make_configurator,
};
use compolicy_contract::{
    Configurator, Connector, DeploymentMode, EndpointSet, MainThread, NetworkContextManager,
    RequestContext, ServiceManager, UrlLoaderFactory,
};
use compolicy_core::{BaseConfigPolicy, BuildInfo, CommandLine, CommandLineConfigPolicy};
use compolicy_platform::{InstallerIdentity, NoInstallerIdentity};

const DEFAULT_URL: &str = "https://default.example/update";

#[derive(Debug)]
struct NamedHandle(&'static str);

impl RequestContext for NamedHandle {
    fn name(&self) -> &str {
        self.0
    }
}

impl UrlLoaderFactory for NamedHandle {
    fn name(&self) -> &str {
        self.0
    }
}

struct MockNetwork {
    context: Arc<NamedHandle>,
    factory: Arc<NamedHandle>,
}

impl MockNetwork {
    fn new() -> Self {
        Self {
            context: Arc::new(NamedHandle("system-context")),
            factory: Arc::new(NamedHandle("shared-loader")),
        }
    }
}

impl NetworkContextManager for MockNetwork {
    fn request_context(&self) -> Arc<dyn RequestContext> {
        self.context.clone()
    }

    fn shared_url_loader_factory(&self) -> Arc<dyn UrlLoaderFactory> {
        self.factory.clone()
    }
}

#[derive(Clone)]
struct MockConnector;

impl Connector for MockConnector {
    fn identity(&self) -> &str {
        "browser"
    }
}

struct MockServiceManager {
    connector: MockConnector,
}

impl ServiceManager for MockServiceManager {
    fn connector(&self) -> &dyn Connector {
        &self.connector
    }
}

struct FixedIdentity;

impl InstallerIdentity for FixedIdentity {
    fn app_guid(&self) -> Option<String> {
        Some("{00000000-0000-0000-0000-000000000001}".to_string())
    }
}

fn base_with_default_url(args: &[&str]) -> BaseConfigPolicy {
    let config = CommandLineConfigPolicy::new(&CommandLine::from_args(args.iter().copied()));
    let build = BuildInfo::new("1.60.114")
        .expect("valid version")
        .with_os_long_name("Linux");
    BaseConfigPolicy::new(config, build, false).with_default_update_urls(
        EndpointSet::parse([DEFAULT_URL]).expect("valid default endpoint"),
    )
}

fn provider(mode: DeploymentMode) -> BraveConfigurator {
    provider_with(mode, &[], Collaborators::default())
}

fn provider_with(
    mode: DeploymentMode,
    args: &[&str],
    collaborators: Collaborators,
) -> BraveConfigurator {
    let collaborators = collaborators.with_installer_identity(Arc::new(NoInstallerIdentity));
    BraveConfigurator::from_base(base_with_default_url(args), mode, collaborators)
}

const BOTH_MODES: [DeploymentMode; 2] = [DeploymentMode::VendorServer, DeploymentMode::UpstreamStore];

#[test]
fn vendor_mode_uses_fixed_vendor_endpoint_for_updates_and_pings() {
    let configurator = provider(DeploymentMode::VendorServer);

    let update_urls = configurator.update_urls();

    assert_eq!(update_urls.len(), 1);
    assert_eq!(update_urls.primary().as_str(), VENDOR_UPDATE_URL);
    assert_eq!(configurator.ping_urls(), update_urls);
    assert!(!configurator.enabled_cup_signing());
}

#[test]
fn upstream_mode_uses_base_endpoints_and_flags() {
    let base = base_with_default_url(&[]);
    let configurator = provider(DeploymentMode::UpstreamStore);

    assert_eq!(configurator.update_urls(), base.update_urls());
    assert_eq!(configurator.update_urls().primary().as_str(), DEFAULT_URL);
    assert_eq!(configurator.ping_urls(), configurator.update_urls());
    assert_eq!(
        configurator.enabled_component_updates(),
        base.enabled_component_updates()
    );
    assert_eq!(
        configurator.enabled_background_downloader(),
        base.enabled_background_downloader()
    );
    assert!(base.enabled_deltas());
    assert!(!configurator.enabled_deltas());
}

#[test]
fn upstream_mode_keeps_base_cup_signing() {
    let base = base_with_default_url(&[]);
    let configurator = provider(DeploymentMode::UpstreamStore);

    assert!(base.enabled_cup_signing());
    assert!(configurator.enabled_cup_signing());
}

#[test]
fn delays_delegate_to_base_in_both_modes() {
    let base = base_with_default_url(&["--component-updater=fast-update"]);

    for mode in BOTH_MODES {
        let configurator =
            provider_with(mode, &["--component-updater=fast-update"], Collaborators::default());
        assert_eq!(configurator.initial_delay(), base.initial_delay());
        assert_eq!(configurator.next_check_delay(), base.next_check_delay());
        assert_eq!(configurator.on_demand_delay(), base.on_demand_delay());
        assert_eq!(configurator.update_delay(), base.update_delay());
    }
}

#[test]
fn withheld_identity_fields_are_empty_in_both_modes() {
    for mode in BOTH_MODES {
        let configurator = provider(mode);

        assert_eq!(configurator.prod_id(), "");
        assert_eq!(configurator.brand(), "");
        assert_eq!(configurator.lang(), "");
        assert_eq!(configurator.download_preference(), "");
        assert_eq!(configurator.channel(), STABLE_CHANNEL);
    }
}

#[test]
fn reported_identity_uses_base_build_information() {
    let configurator = provider_with(
        DeploymentMode::UpstreamStore,
        &["--component-updater=test-request"],
        Collaborators::default(),
    );

    let identity = configurator.identity();

    assert_eq!(identity.browser_version, semver::Version::new(1, 60, 114));
    assert_eq!(identity.os_long_name, "Linux");
    assert_eq!(identity.extra_request_params, "testrequest=\"1\"");
    assert_eq!(identity.channel, "stable");
}

#[test]
fn absent_services_and_system_install() {
    for mode in BOTH_MODES {
        let configurator = provider(mode);

        assert!(configurator.pref_service().is_none());
        assert!(configurator.activity_data_service().is_none());
        assert!(!configurator.is_per_user_install());
        assert_eq!(
            configurator.run_action_key_hash(),
            base_with_default_url(&[]).run_action_key_hash()
        );
    }
}

#[test]
fn loader_factory_is_none_before_network_initialization() {
    let configurator = provider(DeploymentMode::VendorServer);

    assert!(configurator.url_loader_factory().is_none());
    assert!(configurator.request_context().is_none());
}

#[test]
fn network_handles_are_vended_unchanged() {
    let network = Arc::new(MockNetwork::new());
    let configurator = provider_with(
        DeploymentMode::UpstreamStore,
        &[],
        Collaborators::default().with_network(network.clone()),
    );

    let factory = configurator
        .url_loader_factory()
        .expect("loader factory is available once networking exists");
    let context = configurator
        .request_context()
        .expect("request context is available once networking exists");

    assert_eq!(factory.name(), "shared-loader");
    assert_eq!(context.name(), "system-context");
    let expected: Arc<dyn UrlLoaderFactory> = network.factory.clone();
    assert!(Arc::ptr_eq(&factory, &expected));
}

#[test]
fn service_connector_is_cloned_on_main_thread() {
    let main = MainThread::capture();
    let manager = Arc::new(MockServiceManager {
        connector: MockConnector,
    });
    let configurator = provider_with(
        DeploymentMode::VendorServer,
        &[],
        Collaborators::default().with_service_manager(manager, main),
    );
    let token = main.token().expect("test thread was captured as main");

    let connector = configurator
        .create_service_connector(&token)
        .expect("service manager is wired");

    assert_eq!(connector.identity(), "browser");
}

#[test]
fn service_connector_is_none_without_service_manager() {
    let main = MainThread::capture();
    let configurator = provider(DeploymentMode::UpstreamStore);
    let token = main.token().expect("test thread was captured as main");

    assert!(configurator.create_service_connector(&token).is_none());
}

#[test]
fn app_guid_reads_installer_identity_when_available() {
    let configurator = BraveConfigurator::from_base(
        base_with_default_url(&[]),
        DeploymentMode::VendorServer,
        Collaborators::default().with_installer_identity(Arc::new(FixedIdentity)),
    );

    assert_eq!(
        configurator.app_guid(),
        "{00000000-0000-0000-0000-000000000001}"
    );
    assert_eq!(provider(DeploymentMode::VendorServer).app_guid(), "");
}

#[test]
fn repeated_queries_return_identical_values() {
    for mode in BOTH_MODES {
        let configurator = provider(mode);

        let first = configurator.snapshot();
        let second = configurator.snapshot();

        assert_eq!(first, second);
        assert_eq!(configurator.update_urls(), configurator.update_urls());
        assert_eq!(configurator.app_guid(), configurator.app_guid());
    }
}

#[test]
fn provider_is_shareable_across_threads() {
    let configurator = make_configurator(
        &CommandLine::from_args(["--component-updater=fast-update"]),
        None,
        true,
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let configurator = Arc::clone(&configurator);
            std::thread::spawn(move || configurator.update_urls())
        })
        .collect();

    for handle in handles {
        let urls = handle.join().expect("reader thread joins");
        assert_eq!(urls.primary().as_str(), VENDOR_UPDATE_URL);
    }
}

#[test]
fn four_part_browser_version_is_reported_in_full() {
    let build = BuildInfo::new("119.1.60.114").expect("browser version parses");
    let base = BaseConfigPolicy::new(CommandLineConfigPolicy::default(), build, false);
    let configurator = BraveConfigurator::from_base(
        base,
        DeploymentMode::VendorServer,
        Collaborators::default().with_installer_identity(Arc::new(NoInstallerIdentity)),
    );

    assert_eq!(configurator.browser_version().to_string(), "119.1.60+114");
    assert_eq!(
        configurator.identity().browser_version,
        configurator.browser_version()
    );
}
