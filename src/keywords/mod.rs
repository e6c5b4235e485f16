//! Keyword dispatch surface
//!
//! Keywords are the named operations a remote transport invokes with
//! positional string arguments plus an optional `key=value` option tail.
//! Each keyword declares an [`ArgSpec`] and a typed parameter struct; the
//! registry builds a JSON object from the raw arguments once at the
//! boundary and deserializes it into the struct, so individual keywords
//! never touch raw argument strings.

pub mod application;
pub mod args;
pub mod assertions;
pub mod device;
pub mod element;
pub mod gestures;
pub mod getters;
pub mod waits;

use crate::error::{KeywordError, Result};
use crate::locator::Locator;
use crate::session::{Session, SessionRegistry};
use crate::wait::{CancelFlag, Waiter};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// How a keyword treats arguments beyond its positional ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailMode {
    /// No extra arguments are accepted
    None,
    /// Extra arguments are `key=value` options, matched case-insensitively
    Options,
    /// Extra arguments are collected verbatim (capability pairs)
    Raw,
}

/// Declared argument shape of a keyword
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    /// Names of the positional arguments, in order
    pub positional: &'static [&'static str],
    /// Treatment of the argument tail
    pub tail: TailMode,
    /// Suppress argument logging (passwords)
    pub sensitive: bool,
}

impl ArgSpec {
    pub const fn new(positional: &'static [&'static str], tail: TailMode) -> Self {
        Self {
            positional,
            tail,
            sensitive: false,
        }
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Outcome of a successful keyword call
#[derive(Debug, Clone, Default)]
pub struct KeywordResult {
    /// Return value for the caller, when the keyword produces one
    pub data: Option<Value>,
}

impl KeywordResult {
    /// Successful call with no return value
    pub fn success() -> Self {
        Self::default()
    }

    /// Successful call returning data
    pub fn success_with(data: impl Into<Value>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }
}

/// Mutable state a keyword executes against
pub struct KeywordContext<'a> {
    /// The session registry owning every open application
    pub sessions: &'a mut SessionRegistry,
    cancel: Option<CancelFlag>,
}

impl<'a> KeywordContext<'a> {
    pub fn new(sessions: &'a mut SessionRegistry) -> Self {
        Self {
            sessions,
            cancel: None,
        }
    }

    /// Install a cancellation flag checked by every polling wait run
    /// through this context
    pub fn with_cancel_flag(sessions: &'a mut SessionRegistry, cancel: CancelFlag) -> Self {
        Self {
            sessions,
            cancel: Some(cancel),
        }
    }

    /// The active session; element and page keywords all start here
    pub fn active(&mut self) -> Result<&mut Session> {
        self.sessions.active()
    }

    /// Build a waiter using the explicit timeout when given, falling back
    /// to the registry's current effective timeout
    pub(crate) fn waiter(&self, timeout_secs: Option<u32>) -> Waiter {
        let secs = timeout_secs.unwrap_or_else(|| self.sessions.current_timeout());
        let waiter = Waiter::from_secs(u64::from(secs));
        match &self.cancel {
            Some(flag) => waiter.cancel_flag(flag.clone()),
            None => waiter,
        }
    }
}

/// Xpath probing for visible text: matches either the text or the
/// accessibility description of any element
pub(crate) fn page_text_locator(text: &str) -> Locator {
    Locator::xpath(format!(
        "//*[contains(@content-desc,'{text}') or contains(@text,'{text}')]"
    ))
}

/// A named, remotely-invocable operation with a typed parameter struct
pub trait Keyword {
    /// Parameters parsed from the raw argument list
    type Params: DeserializeOwned + schemars::JsonSchema;

    /// Name the transport dispatches on
    fn name(&self) -> &str;

    /// Declared argument shape
    fn arg_spec(&self) -> ArgSpec;

    /// Execute with already-parsed parameters
    fn execute_typed(&self, params: Self::Params, context: &mut KeywordContext)
    -> Result<KeywordResult>;
}

/// Object-safe form of [`Keyword`] stored in the registry
trait DynKeyword {
    fn name(&self) -> &str;
    fn arg_spec(&self) -> ArgSpec;
    fn parameters_schema(&self) -> Value;
    fn execute(&self, params: Value, context: &mut KeywordContext) -> Result<KeywordResult>;
}

impl<K: Keyword> DynKeyword for K {
    fn name(&self) -> &str {
        Keyword::name(self)
    }

    fn arg_spec(&self) -> ArgSpec {
        Keyword::arg_spec(self)
    }

    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(K::Params)).unwrap_or_default()
    }

    fn execute(&self, params: Value, context: &mut KeywordContext) -> Result<KeywordResult> {
        let typed: K::Params = serde_json::from_value(params).map_err(|e| {
            KeywordError::InvalidArgument(format!("keyword '{}': {}", Keyword::name(self), e))
        })?;
        self.execute_typed(typed, context)
    }
}

/// The keyword catalog: maps names to implementations and drives the
/// argument-parsing boundary
pub struct KeywordRegistry {
    keywords: IndexMap<String, Box<dyn DynKeyword>>,
}

impl KeywordRegistry {
    /// Empty catalog
    pub fn new() -> Self {
        Self {
            keywords: IndexMap::new(),
        }
    }

    /// Catalog with every built-in keyword registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        application::register(&mut registry);
        element::register(&mut registry);
        assertions::register(&mut registry);
        getters::register(&mut registry);
        gestures::register(&mut registry);
        device::register(&mut registry);
        waits::register(&mut registry);
        registry
    }

    /// Register a keyword; a later registration under the same name
    /// replaces the earlier one
    pub fn register<K: Keyword + 'static>(&mut self, keyword: K) {
        self.keywords
            .insert(Keyword::name(&keyword).to_string(), Box::new(keyword));
    }

    /// Keyword names in registration order (keyword discovery)
    pub fn names(&self) -> Vec<&str> {
        self.keywords.keys().map(String::as_str).collect()
    }

    /// Whether a keyword is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.keywords.contains_key(name)
    }

    /// JSON schema of a keyword's parameter struct, for transport-side
    /// introspection
    pub fn parameters_schema(&self, name: &str) -> Option<Value> {
        self.keywords.get(name).map(|k| k.parameters_schema())
    }

    /// Declared argument shape of a keyword
    pub fn arg_spec(&self, name: &str) -> Option<ArgSpec> {
        self.keywords.get(name).map(|k| k.arg_spec())
    }

    /// Invoke a keyword with raw string arguments as delivered by the
    /// remote transport
    pub fn run<S: AsRef<str>>(
        &self,
        name: &str,
        raw_args: &[S],
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let keyword = self
            .keywords
            .get(name)
            .ok_or_else(|| KeywordError::NotFound(format!("Unknown keyword: {}", name)))?;
        let spec = keyword.arg_spec();
        if spec.sensitive {
            log::debug!("keyword '{}' ({} arguments, not logged)", name, raw_args.len());
        } else {
            let shown: Vec<&str> = raw_args.iter().map(AsRef::as_ref).collect();
            log::debug!("keyword '{}' args: {:?}", name, shown);
        }
        let params = args::build_params(name, spec, raw_args)?;
        keyword.execute(params, context)
    }

    /// Invoke a keyword with already-structured parameters
    pub fn execute(
        &self,
        name: &str,
        params: Value,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let keyword = self
            .keywords
            .get(name)
            .ok_or_else(|| KeywordError::NotFound(format!("Unknown keyword: {}", name)))?;
        keyword.execute(params, context)
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_registers_catalog() {
        let registry = KeywordRegistry::with_defaults();
        for name in [
            "open_application",
            "switch_application",
            "close_all_applications",
            "click_element",
            "input_text",
            "element_should_contain_text",
            "wait_until_page_contains",
            "scroll_down",
            "press_keycode",
            "set_appium_timeout",
            "pull_file",
        ] {
            assert!(registry.contains(name), "missing keyword: {}", name);
        }
    }

    #[test]
    fn test_unknown_keyword_is_not_found() {
        let registry = KeywordRegistry::with_defaults();

        let factory = crate::driver::mock::MockFactory::new();
        let mut sessions = SessionRegistry::new(Box::new(factory));
        let mut context = KeywordContext::new(&mut sessions);

        let result = registry.run::<&str>("does_not_exist", &[], &mut context);
        assert!(matches!(result, Err(KeywordError::NotFound(_))));
    }

    #[test]
    fn test_parameters_schema_is_object() {
        let registry = KeywordRegistry::with_defaults();
        let schema = registry.parameters_schema("click_element").unwrap();
        assert!(schema.is_object());
    }

    #[test]
    fn test_page_text_locator_shape() {
        let locator = page_text_locator("Hello");
        assert_eq!(
            locator.value,
            "//*[contains(@content-desc,'Hello') or contains(@text,'Hello')]"
        );
    }
}
