//! Generic component-updater policy.
//!
//! This crate provides the deployment-independent defaults a vendor policy
//! provider builds on:
//! - Command-line parsing of the `--component-updater` switch.
//! - Build information (product version, OS name).
//! - The base policy deriving delays, endpoints and security defaults.

mod base_policy;
mod build_info;
mod command_line;
mod version;

pub use base_policy::{BaseConfigPolicy, DEFAULT_UPDATE_URL, FALLBACK_UPDATE_URL};
pub use build_info::{BuildInfo, BuildInfoError};
pub use command_line::{
    COMPONENT_UPDATER_SWITCH, CommandLine, CommandLineConfigPolicy, SwitchError,
};
pub use version::{VersionParseError, package_version, parse_browser_version};
