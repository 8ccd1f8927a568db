//! The query contract a component-update engine expects from its policy
//! provider, plus the value types exchanged across it.
//!
//! Nothing in this crate performs I/O. Collaborators owned by the embedding
//! application (network context, service manager, preference store) are
//! modelled as traits so providers can be built against injected handles.

mod error;
mod thread;
mod traits;
mod types;

pub use error::ContractError;
pub use thread::{MainThread, MainThreadToken};
pub use traits::{
    ActivityDataService, Configurator, Connector, ConnectorClone, NetworkContextManager,
    PrefService, RequestContext, ServiceManager, UrlLoaderFactory,
};
pub use types::{DelaySchedule, DeploymentMode, EndpointSet, IdentityDescriptor, SecurityFlags};
