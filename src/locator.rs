//! Locator string translation
//!
//! Keywords address elements through a compact string syntax: an optional
//! strategy prefix (`xpath=`, `class=`, `css=`, `id=`) followed by the
//! strategy value. A string starting with `//` is an xpath without a prefix,
//! and anything unrecognized falls back to an id lookup.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element lookup strategy understood by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Resource id / accessibility id lookup
    Id,
    /// XPath query
    XPath,
    /// Class name lookup
    ClassName,
    /// CSS selector (webview contexts)
    CssSelector,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Id => write!(f, "id"),
            Strategy::XPath => write!(f, "xpath"),
            Strategy::ClassName => write!(f, "class name"),
            Strategy::CssSelector => write!(f, "css selector"),
        }
    }
}

/// A parsed element query: strategy plus value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Locator {
    /// Lookup strategy
    pub strategy: Strategy,
    /// Strategy value (xpath expression, id, class name or css selector)
    pub value: String,
}

impl Locator {
    /// Build a locator directly from a strategy and value
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Shorthand for an xpath locator
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Translate a locator string into a structured query.
    ///
    /// Prefixes are checked in priority order and only the first recognized
    /// prefix is stripped; an embedded `=` in the remainder is literal text.
    /// Unrecognized input falls back to an id lookup on the whole string.
    pub fn parse(locator: &str) -> Self {
        if let Some(rest) = locator.strip_prefix("xpath=") {
            Self::new(Strategy::XPath, rest)
        } else if locator.starts_with("//") {
            Self::new(Strategy::XPath, locator)
        } else if let Some(rest) = locator.strip_prefix("class=") {
            Self::new(Strategy::ClassName, rest)
        } else if let Some(rest) = locator.strip_prefix("css=") {
            Self::new(Strategy::CssSelector, rest)
        } else if let Some(rest) = locator.strip_prefix("id=") {
            Self::new(Strategy::Id, rest)
        } else {
            Self::new(Strategy::Id, locator)
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}
