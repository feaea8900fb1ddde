//! Browser support matrices and the compatibility gate.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How a browser appears in a [`SupportMatrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Not a target; fixes for it are never needed.
    Excluded,
    /// Targeted from this minimum version upwards.
    Since(f64),
}

/// When a browser gained native support for a feature, in a [`DisableMap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeSupport {
    /// The browser never supports the feature natively.
    Never,
    /// Native support since this version.
    Since(f64),
}

/// A `version | false` entry as written in configuration.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Version(f64),
    Flag(bool),
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawEntry::deserialize(deserializer)? {
            RawEntry::Version(version) => Self::Since(version),
            RawEntry::Flag(false) => Self::Excluded,
            // `true` targets every version.
            RawEntry::Flag(true) => Self::Since(0.0),
        })
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Excluded => RawEntry::Flag(false),
            Self::Since(version) => RawEntry::Version(*version),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NativeSupport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawEntry::deserialize(deserializer)? {
            RawEntry::Version(version) => Self::Since(version),
            RawEntry::Flag(false) => Self::Never,
            // `true` means supported in every version.
            RawEntry::Flag(true) => Self::Since(0.0),
        })
    }
}

impl Serialize for NativeSupport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Never => RawEntry::Flag(false),
            Self::Since(version) => RawEntry::Version(*version),
        }
        .serialize(serializer)
    }
}

/// Minimum targeted version per browser, or `false` for browsers not targeted.
///
/// ```toml
/// chrome = 10
/// firefox = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportMatrix(BTreeMap<String, Target>);

impl SupportMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a browser from `version` upwards.
    pub fn target(mut self, browser: impl Into<String>, version: f64) -> Self {
        self.0.insert(browser.into(), Target::Since(version));
        self
    }

    /// Mark a browser as not targeted.
    pub fn exclude(mut self, browser: impl Into<String>) -> Self {
        self.0.insert(browser.into(), Target::Excluded);
        self
    }

    /// The entry for a browser.
    pub fn get(&self, browser: &str) -> Option<Target> {
        self.0.get(browser).copied()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Target)> {
        self.0.iter().map(|(browser, target)| (browser.as_str(), *target))
    }
}

/// Per-browser thresholds at which a fix stops being needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisableMap(BTreeMap<String, NativeSupport>);

impl DisableMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The browser supports the feature natively from `version`.
    pub fn since(mut self, browser: impl Into<String>, version: f64) -> Self {
        self.0.insert(browser.into(), NativeSupport::Since(version));
        self
    }

    /// The browser never supports the feature natively.
    pub fn never(mut self, browser: impl Into<String>) -> Self {
        self.0.insert(browser.into(), NativeSupport::Never);
        self
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NativeSupport)> {
        self.0.iter().map(|(browser, native)| (browser.as_str(), *native))
    }
}

/// Decide whether a fix is still needed for the targeted browsers.
///
/// Without a disable map or a support matrix the fix always applies. Otherwise
/// it applies as soon as one targeted browser either never supports the
/// feature or is targeted below the version that added native support.
/// Browsers the matrix excludes or does not mention are satisfied.
pub fn need_fix(support: Option<&SupportMatrix>, disable: Option<&DisableMap>) -> bool {
    let (Some(support), Some(disable)) = (support, disable) else {
        return true;
    };

    for (browser, native) in disable.iter() {
        let target = support.get(browser);
        if target == Some(Target::Excluded) {
            continue;
        }
        match native {
            NativeSupport::Never => return true,
            NativeSupport::Since(threshold) => {
                if let Some(Target::Since(minimum)) = target
                    && minimum < threshold
                {
                    return true;
                }
            }
        }
    }

    false
}
