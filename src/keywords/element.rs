//! Element interaction keywords

use crate::error::Result;
use crate::keywords::args::{NoParams, flex, flex_bool};
use crate::keywords::{ArgSpec, Keyword, KeywordContext, KeywordRegistry, KeywordResult, TailMode};
use crate::locator::Locator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) fn register(registry: &mut KeywordRegistry) {
    registry.register(ClickElement);
    registry.register(ClickButton);
    registry.register(ClickText);
    registry.register(ClickAPoint);
    registry.register(ClickElementAtCoordinates);
    registry.register(Tap);
    registry.register(LongPress);
    registry.register(ClearText);
    registry.register(InputText);
    registry.register(InputPassword);
    registry.register(HideKeyboard);
}

/// Parameters carrying a single locator string
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocatorParams {
    /// Element locator, e.g. `id=my_element` or `//android.widget.Button[1]`
    pub locator: String,
}

/// Clicks the element identified by locator
#[derive(Default)]
pub struct ClickElement;

impl Keyword for ClickElement {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "click_element"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: LocatorParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().click(&element)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `click_button`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickButtonParams {
    /// Button index (1-based, per xpath) or resource id
    pub index_or_name: String,
}

/// Clicks a button addressed by index or resource id
#[derive(Default)]
pub struct ClickButton;

impl Keyword for ClickButton {
    type Params = ClickButtonParams;

    fn name(&self) -> &str {
        "click_button"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["index_or_name"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ClickButtonParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = match params.index_or_name.parse::<u32>() {
            Ok(index) => Locator::xpath(format!("//android.widget.Button[{}]", index)),
            Err(_) => Locator::xpath(format!(
                "//android.widget.Button[@resource-id='{}']",
                params.index_or_name
            )),
        };
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().click(&element)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `click_text`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickTextParams {
    /// Visible text to click
    pub text: String,
    /// Require an exact text match instead of a substring match (default false)
    #[serde(default, deserialize_with = "flex_bool")]
    pub exact_match: bool,
}

/// Clicks the first element showing the given text
#[derive(Default)]
pub struct ClickText;

impl Keyword for ClickText {
    type Params = ClickTextParams;

    fn name(&self) -> &str {
        "click_text"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["text"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ClickTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = if params.exact_match {
            Locator::xpath(format!("//*[@text='{}']", params.text))
        } else {
            Locator::xpath(format!("//*[contains(@text,'{}')]", params.text))
        };
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().click(&element)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `click_a_point`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickAPointParams {
    /// X coordinate (default 0)
    #[serde(default, deserialize_with = "flex")]
    pub x: i32,
    /// Y coordinate (default 0)
    #[serde(default, deserialize_with = "flex")]
    pub y: i32,
    /// Press duration in milliseconds (default 100)
    #[serde(default = "default_point_duration", deserialize_with = "flex")]
    pub duration: u32,
}

fn default_point_duration() -> u32 {
    100
}

/// Taps an absolute screen point
#[derive(Default)]
pub struct ClickAPoint;

impl Keyword for ClickAPoint {
    type Params = ClickAPointParams;

    fn name(&self) -> &str {
        "click_a_point"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ClickAPointParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context
            .active()?
            .driver()
            .tap(1, params.x, params.y, params.duration)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `click_element_at_coordinates`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickAtCoordinatesParams {
    /// X coordinate
    #[serde(deserialize_with = "flex")]
    pub coordinate_x: i32,
    /// Y coordinate
    #[serde(deserialize_with = "flex")]
    pub coordinate_y: i32,
}

/// Taps the screen at the given coordinates with a fixed press duration
#[derive(Default)]
pub struct ClickElementAtCoordinates;

impl Keyword for ClickElementAtCoordinates {
    type Params = ClickAtCoordinatesParams;

    fn name(&self) -> &str {
        "click_element_at_coordinates"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["coordinate_x", "coordinate_y"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ClickAtCoordinatesParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context
            .active()?
            .driver()
            .tap(1, params.coordinate_x, params.coordinate_y, 1000)?;
        Ok(KeywordResult::success())
    }
}

/// Taps the element identified by locator
#[derive(Default)]
pub struct Tap;

impl Keyword for Tap {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "tap"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: LocatorParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().click(&element)?;
        Ok(KeywordResult::success())
    }
}

/// Long-presses the element identified by locator
#[derive(Default)]
pub struct LongPress;

impl Keyword for LongPress {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "long_press"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: LocatorParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().tap_element(&element, 1000)?;
        Ok(KeywordResult::success())
    }
}

/// Clears the text field identified by locator
#[derive(Default)]
pub struct ClearText;

impl Keyword for ClearText {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "clear_text"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: LocatorParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().clear(&element)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for text-entry keywords
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InputTextParams {
    /// Text field locator
    pub locator: String,
    /// Text to type
    pub text: String,
}

/// Types text into the field identified by locator
#[derive(Default)]
pub struct InputText;

impl Keyword for InputText {
    type Params = InputTextParams;

    fn name(&self) -> &str {
        "input_text"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "text"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: InputTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().send_keys(&element, &params.text)?;
        Ok(KeywordResult::success())
    }
}

/// Types a password into the field identified by locator. Identical to
/// `input_text` except the argument list is kept out of the logs.
#[derive(Default)]
pub struct InputPassword;

impl Keyword for InputPassword {
    type Params = InputTextParams;

    fn name(&self) -> &str {
        "input_password"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "text"], TailMode::None).sensitive()
    }

    fn execute_typed(
        &self,
        params: InputTextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().send_keys(&element, &params.text)?;
        Ok(KeywordResult::success())
    }
}

/// Hides the software keyboard when one is shown. Extra options (such as
/// the iOS key name) are accepted and ignored.
#[derive(Default)]
pub struct HideKeyboard;

impl Keyword for HideKeyboard {
    type Params = NoParams;

    fn name(&self) -> &str {
        "hide_keyboard"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::Options)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let session = context.active()?;
        if session.driver().is_keyboard_shown()? {
            session.driver().hide_keyboard()?;
        }
        Ok(KeywordResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_a_point_defaults() {
        let params: ClickAPointParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!((params.x, params.y, params.duration), (0, 0, 100));
    }

    #[test]
    fn test_click_a_point_string_coercion() {
        let params: ClickAPointParams =
            serde_json::from_value(serde_json::json!({"x": "40", "y": "80", "duration": "250"}))
                .unwrap();
        assert_eq!((params.x, params.y, params.duration), (40, 80, 250));
    }

    #[test]
    fn test_click_text_exact_match_default_off() {
        let params: ClickTextParams =
            serde_json::from_value(serde_json::json!({"text": "OK"})).unwrap();
        assert!(!params.exact_match);

        let params: ClickTextParams =
            serde_json::from_value(serde_json::json!({"text": "OK", "exact_match": "TRUE"}))
                .unwrap();
        assert!(params.exact_match);
    }
}
