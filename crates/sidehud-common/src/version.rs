//! Version of the persisted configuration record.

use serde::{Deserialize, Serialize};

/// Semantic version stamped into the configuration file.
///
/// A major bump means older readers must not load the record; minor bumps
/// only add fields, which deserialize to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Breaking changes
    pub major: u16,
    /// Added fields
    pub minor: u16,
    /// Fixes
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version written by this build. 1.1 added the interruptible color.
    pub const HUD_CONFIG: Self = Self::new(1, 1, 0);

    /// Whether a record of `data_version` can be read by this version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::HUD_CONFIG
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(SchemaVersion::new(1, 0, 9) < SchemaVersion::HUD_CONFIG);
        assert!(SchemaVersion::new(2, 0, 0) > SchemaVersion::HUD_CONFIG);
    }

    #[test]
    fn test_minor_and_patch_are_readable() {
        let current = SchemaVersion::HUD_CONFIG;
        assert!(current.can_read(&SchemaVersion::new(1, 0, 0)));
        assert!(current.can_read(&SchemaVersion::new(1, 7, 3)));
        assert!(!current.can_read(&SchemaVersion::new(2, 3, 0)));
        assert_eq!(SchemaVersion::new(2, 3, 0).to_string(), "2.3.0");
    }

    #[test]
    fn test_toml_shape() {
        #[derive(Serialize, Deserialize)]
        struct Record {
            version: SchemaVersion,
        }

        let text = "[version]\nmajor = 1\nminor = 0\npatch = 2\n";
        let record: Record = toml::from_str(text).expect("parse");
        assert_eq!(record.version, SchemaVersion::new(1, 0, 2));
    }
}
