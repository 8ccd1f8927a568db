use semver::Version;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,
    #[error("expected at most MAJOR.MINOR.BUILD.PATCH, got: {input}")]
    TooManyComponents { input: String },
    #[error("invalid version {input}: {details}")]
    Invalid { input: String, details: String },
}

/// Parse a product version, accepting a leading `v` and missing minor/patch
/// components (`"1.2"` becomes `1.2.0`).
///
/// Browser builds carry four numeric components. The fourth one becomes the
/// first build-metadata identifier, so `70.0.3538.77` parses as
/// `70.0.3538+77` and prints back with all four numbers.
///
/// # Errors
/// Returns an error when the input is empty, has more than four numeric
/// components, or is otherwise not a semantic version.
pub fn parse_browser_version(raw: &str) -> Result<Version, VersionParseError> {
    let trimmed = raw.trim();
    let version = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if version.is_empty() {
        return Err(VersionParseError::Empty);
    }

    if let Ok(parsed) = Version::parse(version) {
        return Ok(parsed);
    }

    let (core, pre, build) = split_core_and_suffix(version);
    let mut parts = core.split('.');
    let major = parts.next().unwrap_or_default();
    let minor = parts.next().unwrap_or("0");
    let patch = parts.next().unwrap_or("0");
    let fourth = parts.next();
    if parts.next().is_some() {
        return Err(VersionParseError::TooManyComponents {
            input: raw.to_string(),
        });
    }

    let build = match (fourth, build) {
        (Some(fourth), _) if fourth.parse::<u64>().is_err() => {
            return Err(VersionParseError::Invalid {
                input: raw.to_string(),
                details: format!("fourth component {fourth:?} is not a number"),
            });
        }
        (Some(fourth), Some(build)) => format!("+{fourth}.{build}"),
        (Some(fourth), None) => format!("+{fourth}"),
        (None, Some(build)) => format!("+{build}"),
        (None, None) => String::new(),
    };
    let pre = pre.map(|pre| format!("-{pre}")).unwrap_or_default();
    let normalized = format!("{major}.{minor}.{patch}{pre}{build}");

    Version::parse(&normalized).map_err(|e| VersionParseError::Invalid {
        input: raw.to_string(),
        details: e.to_string(),
    })
}

/// Split `core[-pre][+build]`.
fn split_core_and_suffix(version: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, build) = match version.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (version, None),
    };
    match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre), build),
        None => (rest, None, build),
    }
}

/// Version of this package, used when no build version is configured.
#[must_use]
pub fn package_version() -> Version {
    Version::new(
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
    )
}
