//! Session-lifecycle keywords

use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::keywords::args::{NoParams, flex};
use crate::keywords::{ArgSpec, Keyword, KeywordContext, KeywordRegistry, KeywordResult, TailMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) fn register(registry: &mut KeywordRegistry) {
    registry.register(OpenApplication);
    registry.register(SwitchApplication);
    registry.register(CloseApplication);
    registry.register(QuitApplication);
    registry.register(CloseAllApplications);
    registry.register(BackgroundApp);
    registry.register(ResetApplication);
    registry.register(RemoveApplication);
}

/// Parameters for `open_application`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OpenApplicationParams {
    /// Automation server URL
    pub url: String,
    /// Capability pairs, e.g. `alias=MyApp1 platformName=Android
    /// udid=emulator-5554 app=/apps/demo.apk appActivity=MainActivity`
    #[serde(default)]
    pub args: Vec<String>,
}

/// Opens a new application session against the given automation server,
/// or reuses a running session on the same device
#[derive(Default)]
pub struct OpenApplication;

impl Keyword for OpenApplication {
    type Params = OpenApplicationParams;

    fn name(&self) -> &str {
        "open_application"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["url"], TailMode::Raw)
    }

    fn execute_typed(
        &self,
        params: OpenApplicationParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let capabilities = Capabilities::from_pairs(&params.args)?;
        let alias = context.sessions.open(&params.url, capabilities)?;
        Ok(KeywordResult::success_with(serde_json::json!({
            "alias": alias
        })))
    }
}

/// Parameters for `switch_application`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwitchApplicationParams {
    /// 0-based session index or the alias given at open time
    pub index_or_alias: String,
}

/// Switches the active application by index or alias. An unresolvable
/// argument is logged and leaves the active session unchanged.
#[derive(Default)]
pub struct SwitchApplication;

impl Keyword for SwitchApplication {
    type Params = SwitchApplicationParams;

    fn name(&self) -> &str {
        "switch_application"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["index_or_alias"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: SwitchApplicationParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.sessions.switch(&params.index_or_alias);
        Ok(KeywordResult::success())
    }
}

/// Closes the application binary opened at session creation; the session
/// itself stays tracked and active
#[derive(Default)]
pub struct CloseApplication;

impl Keyword for CloseApplication {
    type Params = NoParams;

    fn name(&self) -> &str {
        "close_application"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.active()?.driver().close_app()?;
        Ok(KeywordResult::success())
    }
}

/// Terminates the active session: the driver connection is released and
/// the registry entry removed
#[derive(Default)]
pub struct QuitApplication;

impl Keyword for QuitApplication {
    type Params = NoParams;

    fn name(&self) -> &str {
        "quit_application"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.sessions.close_active()?;
        Ok(KeywordResult::success())
    }
}

/// Closes every open application. Meant for suite teardown so no session
/// outlives the test run.
#[derive(Default)]
pub struct CloseAllApplications;

impl Keyword for CloseAllApplications {
    type Params = NoParams;

    fn name(&self) -> &str {
        "close_all_applications"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.sessions.close_all();
        Ok(KeywordResult::success())
    }
}

/// Parameters for `background_app`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackgroundAppParams {
    /// How long to keep the application backgrounded (default 5)
    #[serde(default = "default_background_seconds", deserialize_with = "flex")]
    pub seconds: u32,
}

fn default_background_seconds() -> u32 {
    5
}

/// Puts the application in the background on the device for a duration
#[derive(Default)]
pub struct BackgroundApp;

impl Keyword for BackgroundApp {
    type Params = BackgroundAppParams;

    fn name(&self) -> &str {
        "background_app"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: BackgroundAppParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.active()?.driver().background_app(params.seconds)?;
        Ok(KeywordResult::success())
    }
}

/// Resets the application under automation (clear state, relaunch)
#[derive(Default)]
pub struct ResetApplication;

impl Keyword for ResetApplication {
    type Params = NoParams;

    fn name(&self) -> &str {
        "reset_application"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context.active()?.driver().reset_app()?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `remove_application`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveApplicationParams {
    /// Application id, e.g. `com.netease.qa.orangedemo`
    pub application_id: String,
}

/// Removes an installed application from the device
#[derive(Default)]
pub struct RemoveApplication;

impl Keyword for RemoveApplication {
    type Params = RemoveApplicationParams;

    fn name(&self) -> &str {
        "remove_application"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["application_id"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: RemoveApplicationParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context
            .active()?
            .driver()
            .remove_app(&params.application_id)?;
        Ok(KeywordResult::success())
    }
}
