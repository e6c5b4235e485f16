//! Touch gesture and orientation keywords

use crate::driver::Orientation;
use crate::error::Result;
use crate::keywords::args::{NoParams, flex};
use crate::keywords::{ArgSpec, Keyword, KeywordContext, KeywordRegistry, KeywordResult, TailMode};
use crate::locator::Locator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub(crate) fn register(registry: &mut KeywordRegistry) {
    registry.register(Swipe);
    registry.register(Scroll);
    registry.register(ScrollDown);
    registry.register(ScrollUp);
    registry.register(Pinch);
    registry.register(Zoom);
    registry.register(Landscape);
    registry.register(Portrait);
    registry.register(GoBack);
}

fn default_swipe_duration() -> u32 {
    1000
}

/// Parameters for `swipe`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwipeParams {
    /// Horizontal start coordinate
    #[serde(deserialize_with = "flex")]
    pub start_x: i32,
    /// Vertical start coordinate
    #[serde(deserialize_with = "flex")]
    pub start_y: i32,
    /// Horizontal distance of the swipe
    #[serde(deserialize_with = "flex")]
    pub offset_x: i32,
    /// Vertical distance of the swipe
    #[serde(deserialize_with = "flex")]
    pub offset_y: i32,
    /// Gesture duration in milliseconds
    #[serde(default = "default_swipe_duration", deserialize_with = "flex")]
    pub duration: u32,
}

/// Swipes from a start point by the given x/y offsets
#[derive(Default)]
pub struct Swipe;

impl Keyword for Swipe {
    type Params = SwipeParams;

    fn name(&self) -> &str {
        "swipe"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["start_x", "start_y", "offset_x", "offset_y"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: SwipeParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.active()?.driver().swipe(
            params.start_x,
            params.start_y,
            params.offset_x,
            params.offset_y,
            params.duration,
        )?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `scroll`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrollParams {
    /// Locator of the element to scroll from
    pub start_locator: String,
    /// Locator of the element to scroll to
    pub end_locator: String,
}

/// Scrolls from one element to another
#[derive(Default)]
pub struct Scroll;

impl Keyword for Scroll {
    type Params = ScrollParams;

    fn name(&self) -> &str {
        "scroll"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["start_locator", "end_locator"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ScrollParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let start = Locator::parse(&params.start_locator);
        let end = Locator::parse(&params.end_locator);
        let session = context.active()?;
        let from = session.driver().find_element(&start)?;
        let to = session.driver().find_element(&end)?;
        session.driver().scroll(&from, &to)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for the scroll-until-visible keywords
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrollToParams {
    /// Locator of the element to bring into view
    pub locator: String,
}

/// Scrolls towards the bottom of the view until the element is present.
///
/// The scroll gesture itself paces the loop, so no pause is inserted
/// between steps; the shared keyword timeout bounds the whole search.
#[derive(Default)]
pub struct ScrollDown;

impl Keyword for ScrollDown {
    type Params = ScrollToParams;

    fn name(&self) -> &str {
        "scroll_down"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ScrollToParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let waiter = context.waiter(None).poll_interval(Duration::ZERO);
        let locator = Locator::parse(&params.locator);
        let message = format!(
            "Timed out before scrolling down to the following element: {}",
            params.locator
        );
        let session = context.active()?;
        waiter.wait_until(
            || {
                if session.driver().is_element_present(&locator)? {
                    return Ok(true);
                }
                session.driver().scroll_down_step()?;
                Ok(false)
            },
            move || message,
        )?;
        Ok(KeywordResult::success())
    }
}

/// Scrolls towards the top of the view until the element is present
#[derive(Default)]
pub struct ScrollUp;

impl Keyword for ScrollUp {
    type Params = ScrollToParams;

    fn name(&self) -> &str {
        "scroll_up"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: ScrollToParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let waiter = context.waiter(None).poll_interval(Duration::ZERO);
        let locator = Locator::parse(&params.locator);
        let message = format!(
            "Timed out before scrolling up to the following element: {}",
            params.locator
        );
        let session = context.active()?;
        waiter.wait_until(
            || {
                if session.driver().is_element_present(&locator)? {
                    return Ok(true);
                }
                session.driver().scroll_up_step()?;
                Ok(false)
            },
            move || message,
        )?;
        Ok(KeywordResult::success())
    }
}

/// Pinches in on the element. Percent and step options from older callers
/// are accepted and ignored; the driver uses its own gesture geometry.
#[derive(Default)]
pub struct Pinch;

impl Keyword for Pinch {
    type Params = ScrollToParams;

    fn name(&self) -> &str {
        "pinch"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ScrollToParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().pinch(&element)?;
        Ok(KeywordResult::success())
    }
}

/// Zooms in on the element. Percent and step options from older callers
/// are accepted and ignored.
#[derive(Default)]
pub struct Zoom;

impl Keyword for Zoom {
    type Params = ScrollToParams;

    fn name(&self) -> &str {
        "zoom"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["locator"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: ScrollToParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let locator = Locator::parse(&params.locator);
        let session = context.active()?;
        let element = session.driver().find_element(&locator)?;
        session.driver().zoom(&element)?;
        Ok(KeywordResult::success())
    }
}

/// Rotates the device into landscape orientation
#[derive(Default)]
pub struct Landscape;

impl Keyword for Landscape {
    type Params = NoParams;

    fn name(&self) -> &str {
        "landscape"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.active()?.driver().rotate(Orientation::Landscape)?;
        Ok(KeywordResult::success())
    }
}

/// Rotates the device into portrait orientation
#[derive(Default)]
pub struct Portrait;

impl Keyword for Portrait {
    type Params = NoParams;

    fn name(&self) -> &str {
        "portrait"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.active()?.driver().rotate(Orientation::Portrait)?;
        Ok(KeywordResult::success())
    }
}

/// Goes one step backward in the view history
#[derive(Default)]
pub struct GoBack;

impl Keyword for GoBack {
    type Params = NoParams;

    fn name(&self) -> &str {
        "go_back"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.active()?.driver().back()?;
        Ok(KeywordResult::success())
    }
}
