//! Polling wait keywords
//!
//! Each keyword probes the driver through a [`crate::wait::Waiter`] until
//! the page reaches the expected state or the timeout expires. The
//! `timeout` option overrides the shared keyword timeout for one call,
//! and the `error` option replaces the generated timeout message.

use crate::error::Result;
use crate::keywords::args::flex_opt;
use crate::keywords::{
    ArgSpec, Keyword, KeywordContext, KeywordRegistry, KeywordResult, TailMode, page_text_locator,
};
use crate::locator::Locator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) fn register(registry: &mut KeywordRegistry) {
    registry.register(WaitUntilPageContains);
    registry.register(WaitUntilPageDoesNotContain);
    registry.register(WaitUntilPageContainsElement);
    registry.register(WaitUntilPageDoesNotContainElement);
}

/// Parameters for the page-text wait keywords
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WaitForTextParams {
    /// Text to wait for (or against)
    pub text: String,
    /// Per-call timeout in seconds; the shared timeout applies when omitted
    #[serde(default, deserialize_with = "flex_opt")]
    pub timeout: Option<u32>,
    /// Replaces the generated timeout message when supplied
    #[serde(default)]
    pub error: Option<String>,
}

/// Parameters for the page-element wait keywords
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WaitForElementParams {
    /// Locator of the element to wait for (or against)
    pub locator: String,
    /// Per-call timeout in seconds; the shared timeout applies when omitted
    #[serde(default, deserialize_with = "flex_opt")]
    pub timeout: Option<u32>,
    /// Replaces the generated timeout message when supplied
    #[serde(default)]
    pub error: Option<String>,
}

/// Waits until the given text appears on the current page
#[derive(Default)]
pub struct WaitUntilPageContains;

impl Keyword for WaitUntilPageContains {
    type Params = WaitForTextParams;

    fn name(&self) -> &str {
        "wait_until_page_contains"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["text"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: WaitForTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let waiter = context.waiter(params.timeout);
        let locator = page_text_locator(&params.text);
        let message = params
            .error
            .unwrap_or_else(|| format!("Page does not contain text: {}", params.text));
        let session = context.active()?;
        waiter.wait_until(
            || session.driver().is_element_present(&locator),
            move || message,
        )?;
        Ok(KeywordResult::success())
    }
}

/// Waits until the given text is gone from the current page
#[derive(Default)]
pub struct WaitUntilPageDoesNotContain;

impl Keyword for WaitUntilPageDoesNotContain {
    type Params = WaitForTextParams;

    fn name(&self) -> &str {
        "wait_until_page_does_not_contain"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["text"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: WaitForTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let waiter = context.waiter(params.timeout);
        let locator = page_text_locator(&params.text);
        let message = params
            .error
            .unwrap_or_else(|| format!("Page contains text: {}", params.text));
        let session = context.active()?;
        waiter.wait_until_not(
            || session.driver().is_element_present(&locator),
            move || message,
        )?;
        Ok(KeywordResult::success())
    }
}

/// Waits until an element matching the locator appears on the page
#[derive(Default)]
pub struct WaitUntilPageContainsElement;

impl Keyword for WaitUntilPageContainsElement {
    type Params = WaitForElementParams;

    fn name(&self) -> &str {
        "wait_until_page_contains_element"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: WaitForElementParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let waiter = context.waiter(params.timeout);
        let locator = Locator::parse(&params.locator);
        let message = params
            .error
            .unwrap_or_else(|| format!("Page does not contain element: {}", params.locator));
        let session = context.active()?;
        waiter.wait_until(
            || session.driver().is_element_present(&locator),
            move || message,
        )?;
        Ok(KeywordResult::success())
    }
}

/// Waits until no element matching the locator remains on the page
#[derive(Default)]
pub struct WaitUntilPageDoesNotContainElement;

impl Keyword for WaitUntilPageDoesNotContainElement {
    type Params = WaitForElementParams;

    fn name(&self) -> &str {
        "wait_until_page_does_not_contain_element"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: WaitForElementParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let waiter = context.waiter(params.timeout);
        let locator = Locator::parse(&params.locator);
        let message = params
            .error
            .unwrap_or_else(|| format!("Page contains element: {}", params.locator));
        let session = context.active()?;
        waiter.wait_until_not(
            || session.driver().is_element_present(&locator),
            move || message,
        )?;
        Ok(KeywordResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_params_parse_timeout_option() {
        let params: WaitForTextParams = serde_json::from_value(serde_json::json!({
            "text": "Welcome",
            "timeout": "15"
        }))
        .unwrap();
        assert_eq!(params.timeout, Some(15));
        assert!(params.error.is_none());
    }

    #[test]
    fn test_wait_params_error_override() {
        let params: WaitForElementParams = serde_json::from_value(serde_json::json!({
            "locator": "id=spinner",
            "error": "spinner never went away"
        }))
        .unwrap();
        assert_eq!(params.error.as_deref(), Some("spinner never went away"));
    }
}
