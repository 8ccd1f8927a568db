use semver::Version;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::thread::MainThreadToken;
use crate::types::{DelaySchedule, EndpointSet, IdentityDescriptor, SecurityFlags};

/// Shared network context owned by the embedding application.
pub trait RequestContext: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
}

/// Shared URL loader factory owned by the embedding application.
pub trait UrlLoaderFactory: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
}

/// Process-wide network context manager.
pub trait NetworkContextManager: Send + Sync {
    fn request_context(&self) -> Arc<dyn RequestContext>;

    fn shared_url_loader_factory(&self) -> Arc<dyn UrlLoaderFactory>;
}

/// Connection to the embedding application's service manager.
pub trait Connector: Send + ConnectorClone {
    /// Identity of the process this connector speaks for.
    fn identity(&self) -> &str;
}

pub trait ConnectorClone: Send {
    fn clone_box(&self) -> Box<dyn Connector>;
}

impl<T> ConnectorClone for T
where
    T: 'static + Connector + Clone,
{
    fn clone_box(&self) -> Box<dyn Connector> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Connector> {
    fn clone(&self) -> Box<dyn Connector> {
        self.clone_box()
    }
}

/// Service manager owned by the embedding application. Only touched from the
/// main thread.
pub trait ServiceManager: Send + Sync {
    fn connector(&self) -> &dyn Connector;
}

/// Persistent preference store.
pub trait PrefService: Send + Sync {
    fn has_pref_path(&self, path: &str) -> bool;
}

/// Per-component usage activity used for active-user pings.
pub trait ActivityDataService: Send + Sync {
    fn active_bit(&self, id: &str) -> bool;

    fn days_since_last_active(&self, id: &str) -> Option<u32>;

    fn days_since_last_roll_call(&self, id: &str) -> Option<u32>;
}

/// The policy surface a component-update engine queries.
///
/// Every query is total and side-effect free. Absent collaborators are
/// reported as `None` and must be treated as "try again later".
pub trait Configurator: Send + Sync {
    fn initial_delay(&self) -> Duration;

    fn next_check_delay(&self) -> Duration;

    fn on_demand_delay(&self) -> Duration;

    fn update_delay(&self) -> Duration;

    fn update_urls(&self) -> EndpointSet;

    fn ping_urls(&self) -> EndpointSet;

    fn prod_id(&self) -> String;

    fn browser_version(&self) -> Version;

    fn channel(&self) -> String;

    fn brand(&self) -> String;

    fn lang(&self) -> String;

    fn os_long_name(&self) -> String;

    fn extra_request_params(&self) -> String;

    fn download_preference(&self) -> String;

    fn request_context(&self) -> Option<Arc<dyn RequestContext>>;

    /// `None` until the network context manager has been initialized.
    fn url_loader_factory(&self) -> Option<Arc<dyn UrlLoaderFactory>>;

    /// Must be called on the main thread; the token enforces that statically.
    fn create_service_connector(&self, token: &MainThreadToken) -> Option<Box<dyn Connector>>;

    fn enabled_deltas(&self) -> bool;

    fn enabled_component_updates(&self) -> bool;

    fn enabled_background_downloader(&self) -> bool;

    fn enabled_cup_signing(&self) -> bool;

    /// Whether plain-http endpoints are refused at the transport level.
    fn requires_encryption(&self) -> bool;

    fn pref_service(&self) -> Option<&dyn PrefService>;

    fn activity_data_service(&self) -> Option<&dyn ActivityDataService>;

    fn is_per_user_install(&self) -> bool;

    fn run_action_key_hash(&self) -> Vec<u8>;

    fn app_guid(&self) -> String;

    fn delay_schedule(&self) -> DelaySchedule {
        DelaySchedule {
            initial: self.initial_delay(),
            next_check: self.next_check_delay(),
            on_demand: self.on_demand_delay(),
            update: self.update_delay(),
        }
    }

    fn security_flags(&self) -> SecurityFlags {
        SecurityFlags {
            require_signed_responses: self.enabled_cup_signing(),
            allow_delta_patches: self.enabled_deltas(),
            require_encryption: self.requires_encryption(),
        }
    }

    fn identity(&self) -> IdentityDescriptor {
        IdentityDescriptor {
            prod_id: self.prod_id(),
            browser_version: self.browser_version(),
            channel: self.channel(),
            brand: self.brand(),
            lang: self.lang(),
            os_long_name: self.os_long_name(),
            app_guid: self.app_guid(),
            extra_request_params: self.extra_request_params(),
            download_preference: self.download_preference(),
        }
    }
}
