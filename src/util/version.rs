use semver::Version;

pub const APP_NAME: &str = "Målerikalkyl";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

/// The version string shown in the UI and baked into cache file names, so a
/// new release invalidates old price caches on activation.
pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{APP_VERSION}")
    }
}

pub fn current_version() -> Option<Version> {
    parse_version_str(&version_label())
}

/// Parses a `v`-prefixed or bare semver string.
pub fn parse_version_str(input: &str) -> Option<Version> {
    let trimmed = input.trim_start_matches(|ch| ch == 'v' || ch == 'V');
    Version::parse(trimmed).ok()
}
