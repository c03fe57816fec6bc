//! Build metadata resolved once at startup.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Config;

/// Value reported for any metadata key that was not set.
pub const UNKNOWN: &str = "unknown";

/// Read-only deployment information keyed by fixed names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildMetadata(BTreeMap<&'static str, String>);

impl BuildMetadata {
    /// Collect metadata from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::from_values(
            config.git_commit.as_deref(),
            config.git_branch.as_deref(),
            config.build_time.as_deref(),
            config.app_version.as_deref(),
        )
    }

    /// Build from optional values; missing or blank values become `"unknown"`.
    pub fn from_values(
        commit: Option<&str>,
        branch: Option<&str>,
        build_time: Option<&str>,
        version: Option<&str>,
    ) -> Self {
        let resolve = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        let mut values = BTreeMap::new();
        values.insert("commit", resolve(commit));
        values.insert("branch", resolve(branch));
        values.insert("build_time", resolve(build_time));
        values.insert("version", resolve(version));
        Self(values)
    }

    /// Look up a single key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl Default for BuildMetadata {
    fn default() -> Self {
        Self::from_values(None, None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_are_unknown() {
        let meta = BuildMetadata::default();
        assert_eq!(meta.get("commit"), Some(UNKNOWN));
        assert_eq!(meta.get("branch"), Some(UNKNOWN));
        assert_eq!(meta.get("nope"), None);
    }

    #[test]
    fn blank_values_are_unknown() {
        let meta = BuildMetadata::from_values(Some("abc123"), Some("  "), None, Some("1.2.0"));
        assert_eq!(meta.get("commit"), Some("abc123"));
        assert_eq!(meta.get("branch"), Some(UNKNOWN));
        assert_eq!(meta.get("version"), Some("1.2.0"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let meta = BuildMetadata::from_values(Some("abc123"), Some("main"), None, None);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "branch": "main",
                "build_time": "unknown",
                "commit": "abc123",
                "version": "unknown",
            })
        );
    }
}
