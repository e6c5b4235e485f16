//! State inspection keywords
//!
//! Everything in this module reads driver state and returns it to the
//! caller without modifying the application, with the exception of
//! `switch_to_context` and the screenshot file written by
//! `capture_page_screenshot`.

use crate::error::Result;
use crate::keywords::args::NoParams;
use crate::keywords::{ArgSpec, Keyword, KeywordContext, KeywordRegistry, KeywordResult, TailMode};
use crate::locator::Locator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable naming the directory screenshots are written to
pub const SCREENSHOT_DIR_ENV: &str = "APPIUM_LOGS";

static SCREENSHOT_INDEX: AtomicUsize = AtomicUsize::new(1);

pub(crate) fn register(registry: &mut KeywordRegistry) {
    registry.register(GetText);
    registry.register(GetElementAttribute);
    registry.register(GetElementLocation);
    registry.register(GetElementSize);
    registry.register(GetSource);
    registry.register(LogSource);
    registry.register(GetMatchingXpathCount);
    registry.register(GetWebelement);
    registry.register(GetWebelements);
    registry.register(GetContexts);
    registry.register(GetCurrentContext);
    registry.register(SwitchToContext);
    registry.register(CapturePageScreenshot);
}

/// Parameters for single-locator getters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocatorParams {
    /// Element locator
    pub locator: String,
}

/// Returns the text of the element identified by locator
#[derive(Default)]
pub struct GetText;

impl Keyword for GetText {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "get_text"
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
        let text = session.driver().text(&element)?;
        Ok(KeywordResult::success_with(text))
    }
}

/// Parameters for `get_element_attribute`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AttributeParams {
    /// Element locator
    pub locator: String,
    /// Attribute name, e.g. `enabled` or `contentDescription`
    pub attribute: String,
}

/// Returns the value of the named attribute of the element
#[derive(Default)]
pub struct GetElementAttribute;

impl Keyword for GetElementAttribute {
    type Params = AttributeParams;

    fn name(&self) -> &str {
        "get_element_attribute"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator", "attribute"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: AttributeParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        let value = session.driver().attribute(&element, &params.attribute)?;
        Ok(KeywordResult::success_with(value))
    }
}

/// Returns the on-screen location of the element as `{"x": .., "y": ..}`
#[derive(Default)]
pub struct GetElementLocation;

impl Keyword for GetElementLocation {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "get_element_location"
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
        let location = session.driver().location(&element)?;
        Ok(KeywordResult::success_with(json!(location)))
    }
}

/// Returns the rendered size of the element as `{"width": .., "height": ..}`
#[derive(Default)]
pub struct GetElementSize;

impl Keyword for GetElementSize {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "get_element_size"
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
        let size = session.driver().size(&element)?;
        Ok(KeywordResult::success_with(json!(size)))
    }
}

/// Returns the XML source of the current page
#[derive(Default)]
pub struct GetSource;

impl Keyword for GetSource {
    type Params = NoParams;

    fn name(&self) -> &str {
        "get_source"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let source = context.active()?.driver().page_source()?;
        Ok(KeywordResult::success_with(source))
    }
}

/// Logs and returns the XML source of the current page; the historical
/// `loglevel` option is accepted and ignored
#[derive(Default)]
pub struct LogSource;

impl Keyword for LogSource {
    type Params = NoParams;

    fn name(&self) -> &str {
        "log_source"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::Options)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let source = context.active()?.driver().page_source()?;
        log::info!("page source:\n{}", source);
        Ok(KeywordResult::success_with(source))
    }
}

/// Parameters for `get_matching_xpath_count`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct XpathParams {
    /// Xpath query; the `xpath=` prefix must not be used, xpath is assumed
    pub xpath: String,
}

/// Returns the number of elements matching the given xpath
#[derive(Default)]
pub struct GetMatchingXpathCount;

impl Keyword for GetMatchingXpathCount {
    type Params = XpathParams;

    fn name(&self) -> &str {
        "get_matching_xpath_count"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["xpath"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: XpathParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::xpath(params.xpath);
        let count = context.active()?.driver().find_elements(&locator)?.len();
        Ok(KeywordResult::success_with(count))
    }
}

/// Returns the driver handle of the first element matching the locator
#[derive(Default)]
pub struct GetWebelement;

impl Keyword for GetWebelement {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "get_webelement"
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
        let element = context.active()?.driver().find_element(&locator)?;
        Ok(KeywordResult::success_with(element.0))
    }
}

/// Returns the driver handles of every element matching the locator
#[derive(Default)]
pub struct GetWebelements;

impl Keyword for GetWebelements {
    type Params = LocatorParams;

    fn name(&self) -> &str {
        "get_webelements"
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
        let elements = context.active()?.driver().find_elements(&locator)?;
        let handles: Vec<String> = elements.into_iter().map(|e| e.0).collect();
        Ok(KeywordResult::success_with(json!(handles)))
    }
}

/// Returns the names of every available context (native and webviews)
#[derive(Default)]
pub struct GetContexts;

impl Keyword for GetContexts {
    type Params = NoParams;

    fn name(&self) -> &str {
        "get_contexts"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let contexts = context.active()?.driver().contexts()?;
        Ok(KeywordResult::success_with(json!(contexts)))
    }
}

/// Returns the name of the context the session is currently in
#[derive(Default)]
pub struct GetCurrentContext;

impl Keyword for GetCurrentContext {
    type Params = NoParams;

    fn name(&self) -> &str {
        "get_current_context"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let current = context.active()?.driver().current_context()?;
        Ok(KeywordResult::success_with(current))
    }
}

/// Parameters for `switch_to_context`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContextParams {
    /// Context name as reported by `get_contexts`
    pub context_name: String,
}

/// Switches the session into the named context
#[derive(Default)]
pub struct SwitchToContext;

impl Keyword for SwitchToContext {
    type Params = ContextParams;

    fn name(&self) -> &str {
        "switch_to_context"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["context_name"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ContextParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context
            .active()?
            .driver()
            .switch_context(&params.context_name)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `capture_page_screenshot`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScreenshotParams {
    /// File name for the screenshot; generated sequentially when omitted
    #[serde(default)]
    pub name: Option<String>,
}

/// Takes a screenshot of the current page, writes it as a PNG file and
/// returns the path it was written to.
///
/// Files land in the directory named by the `APPIUM_LOGS` environment
/// variable, falling back to the working directory.
#[derive(Default)]
pub struct CapturePageScreenshot;

impl Keyword for CapturePageScreenshot {
    type Params = ScreenshotParams;

    fn name(&self) -> &str {
        "capture_page_screenshot"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ScreenshotParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let png = context.active()?.driver().screenshot()?;
        let name = params.name.unwrap_or_else(|| {
            let index = SCREENSHOT_INDEX.fetch_add(1, Ordering::Relaxed);
            format!("appium-screenshot-{}.png", index)
        });
        let mut path = PathBuf::from(
            std::env::var(SCREENSHOT_DIR_ENV).unwrap_or_else(|_| ".".to_string()),
        );
        path.push(&name);
        std::fs::write(&path, &png)?;
        log::info!("screenshot written to {}", path.display());
        Ok(KeywordResult::success_with(path.display().to_string()))
    }
}
