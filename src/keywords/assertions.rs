//! Element and page state assertions
//!
//! Every assertion keyword generates a default failure message embedding
//! the expected and actual values; callers can replace it wholesale with
//! the `message` (or `error`) option.

use crate::error::{KeywordError, Result};
use crate::keywords::args::flex;
use crate::keywords::{
    ArgSpec, Keyword, KeywordContext, KeywordRegistry, KeywordResult, TailMode, page_text_locator,
};
use crate::locator::Locator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) fn register(registry: &mut KeywordRegistry) {
    registry.register(ElementShouldBeEnabled);
    registry.register(ElementShouldBeDisabled);
    registry.register(ElementShouldContainText);
    registry.register(ElementShouldNotContainText);
    registry.register(ElementTextShouldBe);
    registry.register(ElementNameShouldBe);
    registry.register(ElementValueShouldBe);
    registry.register(PageShouldContainText);
    registry.register(PageShouldNotContainText);
    registry.register(PageShouldContainElement);
    registry.register(PageShouldNotContainElement);
    registry.register(XpathShouldMatchXTimes);
}

/// Parameters for enabled/disabled assertions; the historical `loglevel`
/// option is accepted and ignored
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnabledParams {
    /// Element locator
    pub locator: String,
}

/// Verifies that the element identified by locator is enabled
#[derive(Default)]
pub struct ElementShouldBeEnabled;

impl Keyword for ElementShouldBeEnabled {
    type Params = EnabledParams;

    fn name(&self) -> &str {
        "element_should_be_enabled"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: EnabledParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        if !session.driver().is_enabled(&element)? {
            return Err(KeywordError::AssertionFailed(format!(
                "Element '{}' should be enabled but it is not",
                params.locator
            )));
        }
        Ok(KeywordResult::success())
    }
}

/// Verifies that the element identified by locator is disabled
#[derive(Default)]
pub struct ElementShouldBeDisabled;

impl Keyword for ElementShouldBeDisabled {
    type Params = EnabledParams;

    fn name(&self) -> &str {
        "element_should_be_disabled"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: EnabledParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        if session.driver().is_enabled(&element)? {
            return Err(KeywordError::AssertionFailed(format!(
                "Element '{}' should be disabled but it is not",
                params.locator
            )));
        }
        Ok(KeywordResult::success())
    }
}

/// Parameters for text-comparison assertions
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpectedTextParams {
    /// Element locator
    pub locator: String,
    /// Expected text
    pub expected: String,
    /// Replaces the generated failure message when supplied
    #[serde(default)]
    pub message: Option<String>,
}

fn fail(message: Option<String>, default: impl FnOnce() -> String) -> KeywordError {
    KeywordError::AssertionFailed(message.unwrap_or_else(default))
}

/// Verifies that the element's text contains the expected substring
#[derive(Default)]
pub struct ElementShouldContainText;

impl Keyword for ElementShouldContainText {
    type Params = ExpectedTextParams;

    fn name(&self) -> &str {
        "element_should_contain_text"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "expected"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ExpectedTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        let actual = session.driver().text(&element)?;
        if !actual.contains(&params.expected) {
            return Err(fail(params.message, || {
                format!(
                    "Element should have contained text '{}' but found: '{}'",
                    params.expected, actual
                )
            }));
        }
        Ok(KeywordResult::success())
    }
}

/// Verifies that the element's text does not contain the given substring
#[derive(Default)]
pub struct ElementShouldNotContainText;

impl Keyword for ElementShouldNotContainText {
    type Params = ExpectedTextParams;

    fn name(&self) -> &str {
        "element_should_not_contain_text"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "expected"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ExpectedTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        let actual = session.driver().text(&element)?;
        if actual.contains(&params.expected) {
            return Err(fail(params.message, || {
                format!(
                    "Element should not have contained text '{}' but found: '{}'",
                    params.expected, actual
                )
            }));
        }
        Ok(KeywordResult::success())
    }
}

/// Verifies that the element's text equals the expected text exactly
#[derive(Default)]
pub struct ElementTextShouldBe;

impl Keyword for ElementTextShouldBe {
    type Params = ExpectedTextParams;

    fn name(&self) -> &str {
        "element_text_should_be"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "expected"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ExpectedTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        let actual = session.driver().text(&element)?;
        if actual != params.expected {
            return Err(fail(params.message, || {
                format!(
                    "The text of element should have been '{}' but found: '{}'",
                    params.expected, actual
                )
            }));
        }
        Ok(KeywordResult::success())
    }
}

/// Parameters for attribute-equality assertions
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpectedAttributeParams {
    /// Element locator
    pub locator: String,
    /// Expected attribute value
    pub expected: String,
}

fn attribute_should_be(
    context: &mut KeywordContext,
    params: &ExpectedAttributeParams,
    attribute: &str,
) -> Result<KeywordResult> {
    let locator = Locator::parse(&params.locator);
    let session = context.active()?;
    let element = session.driver().find_element(&locator)?;
    let actual = session.driver().attribute(&element, attribute)?;
    if actual != params.expected {
        return Err(KeywordError::AssertionFailed(format!(
            "Element {} should be '{}' but it is: '{}'",
            attribute, params.expected, actual
        )));
    }
    Ok(KeywordResult::success())
}

/// Verifies the element's `name` attribute value
#[derive(Default)]
pub struct ElementNameShouldBe;

impl Keyword for ElementNameShouldBe {
    type Params = ExpectedAttributeParams;

    fn name(&self) -> &str {
        "element_name_should_be"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "expected"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ExpectedAttributeParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        attribute_should_be(context, &params, "name")
    }
}

/// Verifies the element's `value` attribute value
#[derive(Default)]
pub struct ElementValueShouldBe;

impl Keyword for ElementValueShouldBe {
    type Params = ExpectedAttributeParams;

    fn name(&self) -> &str {
        "element_value_should_be"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "expected"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ExpectedAttributeParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        attribute_should_be(context, &params, "value")
    }
}

/// Parameters for page-text assertions
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageTextParams {
    /// Text expected on (or absent from) the current page
    pub text: String,
}

/// Verifies that the current page shows the given text
#[derive(Default)]
pub struct PageShouldContainText;

impl Keyword for PageShouldContainText {
    type Params = PageTextParams;

    fn name(&self) -> &str {
        "page_should_contain_text"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["text"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: PageTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = page_text_locator(&params.text);
        if !context.active()?.driver().is_element_present(&locator)? {
            return Err(KeywordError::AssertionFailed(format!(
                "Page should have contained text: {}",
                params.text
            )));
        }
        Ok(KeywordResult::success())
    }
}

/// Verifies that the current page does not show the given text
#[derive(Default)]
pub struct PageShouldNotContainText;

impl Keyword for PageShouldNotContainText {
    type Params = PageTextParams;

    fn name(&self) -> &str {
        "page_should_not_contain_text"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["text"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: PageTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = page_text_locator(&params.text);
        if context.active()?.driver().is_element_present(&locator)? {
            return Err(KeywordError::AssertionFailed(format!(
                "Page should not have contained text: {}",
                params.text
            )));
        }
        Ok(KeywordResult::success())
    }
}

/// Parameters for page-element assertions
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageElementParams {
    /// Element locator
    pub locator: String,
}

/// Verifies that the current page contains the locator element
#[derive(Default)]
pub struct PageShouldContainElement;

impl Keyword for PageShouldContainElement {
    type Params = PageElementParams;

    fn name(&self) -> &str {
        "page_should_contain_element"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: PageElementParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        if !context.active()?.driver().is_element_present(&locator)? {
            return Err(KeywordError::AssertionFailed(format!(
                "Page should have contained element: {}",
                params.locator
            )));
        }
        Ok(KeywordResult::success())
    }
}

/// Verifies that the current page does not contain the locator element
#[derive(Default)]
pub struct PageShouldNotContainElement;

impl Keyword for PageShouldNotContainElement {
    type Params = PageElementParams;

    fn name(&self) -> &str {
        "page_should_not_contain_element"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: PageElementParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        if context.active()?.driver().is_element_present(&locator)? {
            return Err(KeywordError::AssertionFailed(format!(
                "Page should not have contained element: {}",
                params.locator
            )));
        }
        Ok(KeywordResult::success())
    }
}

/// Parameters for `xpath_should_match_x_times`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct XpathCountParams {
    /// Xpath query; the `xpath=` prefix must not be used, xpath is assumed
    pub xpath: String,
    /// Expected number of matches
    #[serde(deserialize_with = "flex")]
    pub count: usize,
    /// Replaces the generated failure message when supplied
    #[serde(default)]
    pub error: Option<String>,
}

/// Verifies that the page contains exactly `count` elements matching the
/// given xpath
#[derive(Default)]
pub struct XpathShouldMatchXTimes;

impl Keyword for XpathShouldMatchXTimes {
    type Params = XpathCountParams;

    fn name(&self) -> &str {
        "xpath_should_match_x_times"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["xpath", "count"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: XpathCountParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::xpath(params.xpath.clone());
        let actual = context.active()?.driver().find_elements(&locator)?.len();
        if actual != params.count {
            return Err(fail(params.error, || {
                format!(
                    "Xpath '{}' should have matched '{}' times but matched '{}' times",
                    params.xpath, params.count, actual
                )
            }));
        }
        Ok(KeywordResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_text_params_message_option() {
        let params: ExpectedTextParams = serde_json::from_value(serde_json::json!({
            "locator": "id=greeting",
            "expected": "World",
            "message": "custom failure"
        }))
        .unwrap();
        assert_eq!(params.message.as_deref(), Some("custom failure"));
    }

    #[test]
    fn test_xpath_count_params_coercion() {
        let params: XpathCountParams = serde_json::from_value(serde_json::json!({
            "xpath": "//android.widget.TextView",
            "count": "3"
        }))
        .unwrap();
        assert_eq!(params.count, 3);
        assert!(params.error.is_none());
    }
}
