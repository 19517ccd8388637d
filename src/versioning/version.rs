use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Cluster protocol version, ordered by `(major, minor)`.
///
/// The version is negotiated once per connection and then passed by value to every encode
/// and decode on that stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    /// Sorts below every real version. Peers that never completed a handshake report this.
    pub const UNKNOWN: Version = Version::of(0, 0);
    pub const V3_8: Version = Version::of(3, 8);
    pub const V3_9: Version = Version::of(3, 9);
    pub const V3_10: Version = Version::of(3, 10);
    pub const V3_11: Version = Version::of(3, 11);
    pub const V3_12: Version = Version::of(3, 12);

    /// Oldest version any record schema is written against. Fields introduced at or before
    /// it are always on the wire.
    pub const BASELINE: Version = Version::V3_8;
    pub const CURRENT: Version = Version::V3_12;

    pub const fn of(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Version::UNKNOWN
    }

    pub fn is_greater_or_equal(&self, other: Version) -> bool {
        *self >= other
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::CURRENT
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version '{0}', expected <major>.<minor>")]
pub struct ParseVersionError(String);

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u8>().map_err(|_| invalid())?;
        let minor = minor.parse::<u8>().map_err(|_| invalid())?;
        Ok(Version::of(major, minor))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
