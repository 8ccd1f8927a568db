mod installer_identity;
mod os;

pub use installer_identity::{InstallerIdentity, NoInstallerIdentity, native_installer_identity};
pub use os::{OsKind, os_long_name};

#[cfg(windows)]
pub use installer_identity::RegistryInstallerIdentity;
