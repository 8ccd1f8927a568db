use std::sync::Arc;

use log::debug;

use crate::os::OsKind;

/// Native installer identity store (the Windows installer registry).
pub trait InstallerIdentity: Send + Sync {
    /// The installed product's app GUID, if the store knows one.
    fn app_guid(&self) -> Option<String>;
}

/// Used where the platform has no installer identity store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstallerIdentity;

impl InstallerIdentity for NoInstallerIdentity {
    fn app_guid(&self) -> Option<String> {
        None
    }
}

/// The identity store for the current platform.
#[must_use]
pub fn native_installer_identity() -> Arc<dyn InstallerIdentity> {
    installer_identity_for(OsKind::current())
}

fn installer_identity_for(os: OsKind) -> Arc<dyn InstallerIdentity> {
    if !os.has_installer_registry() {
        debug!("{} has no installer identity store", os.long_name());
        return Arc::new(NoInstallerIdentity);
    }

    #[cfg(windows)]
    {
        Arc::new(windows_impl::RegistryInstallerIdentity::default())
    }

    #[cfg(not(windows))]
    {
        debug!(
            "Installer registry for {} is not readable from this build",
            os.long_name()
        );
        Arc::new(NoInstallerIdentity)
    }
}

#[cfg(windows)]
pub use windows_impl::RegistryInstallerIdentity;

#[cfg(windows)]
mod windows_impl {
    use log::debug;
    use windows_sys::Win32::System::Registry::{HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ, RegGetValueW};

    use super::InstallerIdentity;

    pub const DEFAULT_SUBKEY: &str = "Software\\BraveSoftware\\Brave-Browser";
    pub const DEFAULT_VALUE_NAME: &str = "AppGuid";

    /// Reads the app GUID from a `REG_SZ` value under `HKEY_LOCAL_MACHINE`.
    #[derive(Debug, Clone)]
    pub struct RegistryInstallerIdentity {
        subkey: String,
        value_name: String,
    }

    impl Default for RegistryInstallerIdentity {
        fn default() -> Self {
            Self::new(DEFAULT_SUBKEY, DEFAULT_VALUE_NAME)
        }
    }

    impl RegistryInstallerIdentity {
        pub fn new(subkey: impl Into<String>, value_name: impl Into<String>) -> Self {
            Self {
                subkey: subkey.into(),
                value_name: value_name.into(),
            }
        }
    }

    fn to_wide(value: &str) -> Vec<u16> {
        value.encode_utf16().chain(std::iter::once(0)).collect()
    }

    impl InstallerIdentity for RegistryInstallerIdentity {
        fn app_guid(&self) -> Option<String> {
            let subkey = to_wide(&self.subkey);
            let value_name = to_wide(&self.value_name);
            let mut size: u32 = 0;

            // SAFETY: both strings are NUL-terminated UTF-16 buffers that
            // outlive the call; a null data pointer asks only for the size.
            let status = unsafe {
                RegGetValueW(
                    HKEY_LOCAL_MACHINE,
                    subkey.as_ptr(),
                    value_name.as_ptr(),
                    RRF_RT_REG_SZ,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    &mut size,
                )
            };
            if status != 0 || size == 0 {
                debug!("No installer app GUID at {}: {status}", self.subkey);
                return None;
            }

            let mut buffer: Vec<u16> = vec![0; (size as usize).div_ceil(2)];
            // SAFETY: `buffer` holds at least `size` bytes as reported by the
            // previous call, and `size` is updated with the bytes written.
            let status = unsafe {
                RegGetValueW(
                    HKEY_LOCAL_MACHINE,
                    subkey.as_ptr(),
                    value_name.as_ptr(),
                    RRF_RT_REG_SZ,
                    std::ptr::null_mut(),
                    buffer.as_mut_ptr().cast(),
                    &mut size,
                )
            };
            if status != 0 {
                debug!("Reading installer app GUID failed: {status}");
                return None;
            }

            let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
            String::from_utf16(&buffer[..len])
                .ok()
                .filter(|guid| !guid.is_empty())
        }
    }
}
