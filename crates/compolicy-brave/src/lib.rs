mod configurator;
mod endpoints;
mod identity;
pub mod logging;
mod security;

pub use configurator::{BraveConfigurator, Collaborators, PolicySnapshot, make_configurator};
pub use endpoints::{EndpointSelector, VENDOR_UPDATE_URL};
pub use identity::{IdentityReporter, STABLE_CHANNEL};
pub use security::{DeltaPolicy, SecurityPolicy};
