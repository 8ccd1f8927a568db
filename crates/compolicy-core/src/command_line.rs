use std::time::Duration;

use clap::{Arg, ArgAction, Command};
use log::{debug, warn};
use thiserror::Error;
use url::Url;

/// Switch carrying comma-separated component updater options.
pub const COMPONENT_UPDATER_SWITCH: &str = "component-updater";

const FAST_UPDATE: &str = "fast-update";
const DISABLE_PINGS: &str = "disable-pings";
const DISABLE_DELTA_UPDATES: &str = "disable-delta-updates";
const DISABLE_BACKGROUND_DOWNLOADS: &str = "disable-background-downloads";
const TEST_REQUEST: &str = "test-request";
const URL_SOURCE: &str = "url-source";
const INITIAL_DELAY: &str = "initial-delay";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    #[error("{name} requires a value")]
    MissingValue { name: &'static str },
    #[error("invalid url-source {value:?}: {details}")]
    InvalidUrlSource { value: String, details: String },
    #[error("invalid initial-delay {value:?}, expected whole seconds")]
    InvalidInitialDelay { value: String },
}

const END_OF_SWITCHES: &str = "--";

/// Process arguments, minus the program name, reduced to the switches the
/// updater reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    component_updater: Option<String>,
}

impl CommandLine {
    /// Other switches and positional arguments are skipped, and nothing after
    /// `--` is read. When the switch repeats, the last occurrence wins.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let end = args
            .iter()
            .position(|arg| arg == END_OF_SWITCHES)
            .unwrap_or(args.len());

        // The browser passes switches this parser does not know, so each
        // position is matched on its own together with a possible value.
        let component_updater = (0..end).rev().find_map(|start| {
            let window = &args[start..(start + 2).min(end)];
            switch_command()
                .try_get_matches_from(window)
                .ok()?
                .get_one::<String>(COMPONENT_UPDATER_SWITCH)
                .cloned()
        });

        Self { component_updater }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    /// Value of `--component-updater=value` or `--component-updater value`.
    /// A bare switch yields an empty value.
    #[must_use]
    pub fn component_updater(&self) -> Option<&str> {
        self.component_updater.as_deref()
    }
}

fn switch_command() -> Command {
    Command::new("component-updater-switches")
        .no_binary_name(true)
        .ignore_errors(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new(COMPONENT_UPDATER_SWITCH)
                .long(COMPONENT_UPDATER_SWITCH)
                .num_args(0..=1)
                .default_missing_value("")
                .action(ArgAction::Append),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Setting {
    FastUpdate,
    DisablePings,
    DisableDeltaUpdates,
    DisableBackgroundDownloads,
    TestRequest,
    UrlSource(Url),
    InitialDelay(Duration),
}

fn parse_setting(entry: &str) -> Result<Option<Setting>, SwitchError> {
    let (name, value) = match entry.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (entry.trim(), None),
    };

    let setting = match name {
        FAST_UPDATE => Setting::FastUpdate,
        DISABLE_PINGS => Setting::DisablePings,
        DISABLE_DELTA_UPDATES => Setting::DisableDeltaUpdates,
        DISABLE_BACKGROUND_DOWNLOADS => Setting::DisableBackgroundDownloads,
        TEST_REQUEST => Setting::TestRequest,
        URL_SOURCE => {
            let value = value
                .filter(|v| !v.is_empty())
                .ok_or(SwitchError::MissingValue { name: URL_SOURCE })?;
            let url = Url::parse(value).map_err(|e| SwitchError::InvalidUrlSource {
                value: value.to_string(),
                details: e.to_string(),
            })?;
            Setting::UrlSource(url)
        }
        INITIAL_DELAY => {
            let value = value
                .filter(|v| !v.is_empty())
                .ok_or(SwitchError::MissingValue {
                    name: INITIAL_DELAY,
                })?;
            let secs = value
                .parse::<u64>()
                .map_err(|_| SwitchError::InvalidInitialDelay {
                    value: value.to_string(),
                })?;
            Setting::InitialDelay(Duration::from_secs(secs))
        }
        _ => return Ok(None),
    };
    Ok(Some(setting))
}

/// Updater knobs taken from `--component-updater`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CommandLineConfigPolicy {
    background_downloads_enabled: bool,
    deltas_enabled: bool,
    fast_update: bool,
    pings_enabled: bool,
    test_request: bool,
    url_source_override: Option<Url>,
    initial_delay: Option<Duration>,
}

impl Default for CommandLineConfigPolicy {
    fn default() -> Self {
        Self {
            background_downloads_enabled: cfg!(windows),
            deltas_enabled: true,
            fast_update: false,
            pings_enabled: true,
            test_request: false,
            url_source_override: None,
            initial_delay: None,
        }
    }
}

impl CommandLineConfigPolicy {
    /// Read the policy from `command_line`. Bad values are logged and skipped.
    #[must_use]
    pub fn new(command_line: &CommandLine) -> Self {
        let mut policy = Self::default();
        let Some(raw) = command_line.component_updater() else {
            return policy;
        };

        for entry in raw.split(',').filter(|entry| !entry.trim().is_empty()) {
            match parse_setting(entry) {
                Ok(Some(setting)) => policy.apply(setting),
                Ok(None) => debug!("Ignoring unknown --{COMPONENT_UPDATER_SWITCH} value: {entry}"),
                Err(e) => warn!("Ignoring --{COMPONENT_UPDATER_SWITCH} value: {e}"),
            }
        }
        policy
    }

    fn apply(&mut self, setting: Setting) {
        match setting {
            Setting::FastUpdate => self.fast_update = true,
            Setting::DisablePings => self.pings_enabled = false,
            Setting::DisableDeltaUpdates => self.deltas_enabled = false,
            Setting::DisableBackgroundDownloads => self.background_downloads_enabled = false,
            Setting::TestRequest => self.test_request = true,
            Setting::UrlSource(url) => self.url_source_override = Some(url),
            Setting::InitialDelay(delay) => self.initial_delay = Some(delay),
        }
    }

    #[must_use]
    pub fn background_downloads_enabled(&self) -> bool {
        self.background_downloads_enabled
    }

    #[must_use]
    pub fn deltas_enabled(&self) -> bool {
        self.deltas_enabled
    }

    #[must_use]
    pub fn fast_update(&self) -> bool {
        self.fast_update
    }

    #[must_use]
    pub fn pings_enabled(&self) -> bool {
        self.pings_enabled
    }

    #[must_use]
    pub fn test_request(&self) -> bool {
        self.test_request
    }

    #[must_use]
    pub fn url_source_override(&self) -> Option<&Url> {
        self.url_source_override.as_ref()
    }

    #[must_use]
    pub fn initial_delay(&self) -> Option<Duration> {
        self.initial_delay
    }
}
