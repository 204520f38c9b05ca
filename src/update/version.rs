// SPDX-License-Identifier: MPL-2.0

//! Release versions as published in tags.
//!
//! A version has three or four dotted numeric components. Ordering is
//! component-wise from the most significant one; a missing fourth component
//! sorts before any present one, so `1.2.3 < 1.2.3.0`. Pre-release and build
//! metadata are not understood.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version '{input}', expected major.minor.patch[.build]")]
pub struct ParseVersionError {
    pub input: String,
}

impl ReleaseVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build: None,
        }
    }

    pub const fn with_build(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build: Some(build),
        }
    }

    /// Parse a release tag, stripping one leading `v` or `V`.
    pub fn from_tag(tag: &str) -> Result<Self, ParseVersionError> {
        let tag = tag.trim();
        let bare = tag
            .strip_prefix('v')
            .or_else(|| tag.strip_prefix('V'))
            .unwrap_or(tag);
        bare.parse()
    }

    /// Version of this build, from the package manifest.
    pub fn current() -> Self {
        let manifest = env!("CARGO_PKG_VERSION");
        // Cargo versions may carry "-pre" or "+meta" suffixes
        let numeric = manifest.split(['-', '+']).next().unwrap_or(manifest);
        numeric.parse().unwrap_or_else(|err| {
            log::warn!("{}; reporting version 0.0.0", err);
            Self::new(0, 0, 0)
        })
    }
}

impl FromStr for ReleaseVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseVersionError {
            input: s.to_string(),
        };

        let parts = s
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                part.parse::<u32>().ok()
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(error)?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            [major, minor, patch, build] => Ok(Self::with_build(*major, *minor, *patch, *build)),
            _ => Err(error()),
        }
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_and_four_components() {
        assert_eq!("2.3.1".parse(), Ok(ReleaseVersion::new(2, 3, 1)));
        assert_eq!(
            "1.0.0.12".parse(),
            Ok(ReleaseVersion::with_build(1, 0, 0, 12))
        );
    }

    #[test]
    fn rejects_other_shapes() {
        for input in ["", "1", "1.2", "1.2.3.4.5", "1..3", "1.2.x", "1.2.3-beta", " 1.2.3", "+1.2.3"] {
            assert!(input.parse::<ReleaseVersion>().is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn tag_prefix_is_stripped_once() {
        assert_eq!(ReleaseVersion::from_tag("v2.3.1"), Ok(ReleaseVersion::new(2, 3, 1)));
        assert_eq!(ReleaseVersion::from_tag("V2.3.1"), Ok(ReleaseVersion::new(2, 3, 1)));
        assert_eq!(ReleaseVersion::from_tag("2.3.1"), Ok(ReleaseVersion::new(2, 3, 1)));
        assert!(ReleaseVersion::from_tag("vv2.3.1").is_err());
        assert!(ReleaseVersion::from_tag("release-2.3.1").is_err());
    }

    #[test]
    fn ordering_is_component_wise() {
        let v = ReleaseVersion::new;
        assert!(v(2, 3, 1) > v(2, 3, 0));
        assert!(v(2, 10, 0) > v(2, 9, 9));
        assert!(v(3, 0, 0) > v(2, 99, 99));
        assert!(ReleaseVersion::with_build(1, 2, 3, 0) > v(1, 2, 3));
        assert!(ReleaseVersion::with_build(1, 2, 3, 5) > ReleaseVersion::with_build(1, 2, 3, 4));
        assert_eq!(v(2, 3, 0).cmp(&v(2, 3, 0)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn display_matches_component_count() {
        assert_eq!(ReleaseVersion::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(ReleaseVersion::with_build(1, 2, 3, 4).to_string(), "1.2.3.4");
    }

    #[test]
    fn current_version_matches_manifest() {
        assert_eq!(ReleaseVersion::current().to_string(), "0.1.0");
    }
}
