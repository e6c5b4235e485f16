//! Session capability map
//!
//! Capabilities arrive from the remote caller as `key=value` strings
//! (e.g. `alias=MyApp1 platformName=Android udid=emulator-5554
//! app=/apps/demo.apk appPackage=com.example appActivity=MainActivity`).
//! Key casing is preserved for the driver but lookups the core performs
//! itself are case-insensitive.

use crate::error::{KeywordError, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Capability keys the core reads for its own bookkeeping
pub const CAP_UDID: &str = "udid";
pub const CAP_ALIAS: &str = "alias";
pub const CAP_APP: &str = "app";
pub const CAP_APP_ACTIVITY: &str = "appActivity";

/// Ordered key/value configuration describing how a session is opened
#[derive(Debug, Clone, Default, Serialize)]
pub struct Capabilities(IndexMap<String, String>);

impl Capabilities {
    /// Create an empty capability map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of `key=value` pairs into a capability map.
    ///
    /// Each pair is split on the first `=` only, so values may contain
    /// literal `=` characters. A pair with no `=` at all is rejected.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self> {
        let mut capabilities = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                KeywordError::InvalidArgument(format!(
                    "Capability '{}' is not of the form key=value",
                    pair
                ))
            })?;
            capabilities.set(key, value);
        }
        Ok(capabilities)
    }

    /// Set a capability, replacing any existing value under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Case-insensitive capability lookup
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Device identifier, if requested
    pub fn udid(&self) -> Option<&str> {
        self.get(CAP_UDID)
    }

    /// Caller-chosen session alias, if supplied
    pub fn alias(&self) -> Option<&str> {
        self.get(CAP_ALIAS)
    }

    /// Application package or bundle under automation
    pub fn app(&self) -> Option<&str> {
        self.get(CAP_APP)
    }

    /// Android activity to launch
    pub fn app_activity(&self) -> Option<&str> {
        self.get(CAP_APP_ACTIVITY)
    }

    /// Iterate over capabilities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of capabilities
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_preserves_order_and_case() {
        let caps = Capabilities::from_pairs(&[
            "alias=MyApp1",
            "platformName=Android",
            "udid=emulator-5554",
        ])
        .unwrap();
        let keys: Vec<&str> = caps.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alias", "platformName", "udid"]);
        assert_eq!(caps.get("platformName"), Some("Android"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let caps = Capabilities::from_pairs(&["UDID=Emulator-5554"]).unwrap();
        assert_eq!(caps.udid(), Some("Emulator-5554"));
        assert_eq!(caps.get("udid"), Some("Emulator-5554"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let caps = Capabilities::from_pairs(&["app=/apps/demo.apk?v=2"]).unwrap();
        assert_eq!(caps.app(), Some("/apps/demo.apk?v=2"));
    }

    #[test]
    fn test_pair_without_equals_is_rejected() {
        let result = Capabilities::from_pairs(&["garbage"]);
        assert!(matches!(result, Err(KeywordError::InvalidArgument(_))));
    }

    #[test]
    fn test_accessor_helpers() {
        let caps = Capabilities::from_pairs(&[
            "app=com.netease.qa.orangedemo",
            "appActivity=MainActivity",
            "alias=orange",
        ])
        .unwrap();
        assert_eq!(caps.app(), Some("com.netease.qa.orangedemo"));
        assert_eq!(caps.app_activity(), Some("MainActivity"));
        assert_eq!(caps.alias(), Some("orange"));
        assert_eq!(caps.udid(), None);
    }
}
