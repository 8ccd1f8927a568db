use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsKind {
    Windows,
    MacOs,
    Ios,
    Android,
    Linux,
    FreeBsd,
    OpenBsd,
    Solaris,
    Unknown,
}

impl OsKind {
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "freebsd") {
            Self::FreeBsd
        } else if cfg!(target_os = "openbsd") {
            Self::OpenBsd
        } else if cfg!(target_os = "solaris") {
            Self::Solaris
        } else {
            Self::Unknown
        }
    }

    /// Human-readable OS name reported in update requests.
    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "Mac OS X",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Linux => "Linux",
            Self::FreeBsd => "FreeBSD",
            Self::OpenBsd => "OpenBSD",
            Self::Solaris => "Solaris",
            Self::Unknown => "Unknown",
        }
    }

    /// Only Windows keeps an installer identity registry.
    #[must_use]
    pub const fn has_installer_registry(self) -> bool {
        matches!(self, Self::Windows)
    }
}

#[must_use]
pub const fn os_long_name() -> &'static str {
    OsKind::current().long_name()
}
