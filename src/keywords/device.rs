//! Device-level keywords: keycodes, network state, file transfer and the
//! shared keyword timeout
//!
//! The keycode and network keywords are Android-only; invoking them on an
//! iOS session fails with a platform error rather than a driver crash.

use crate::driver::NetworkConnection;
use crate::error::{KeywordError, Result};
use crate::keywords::args::{NoParams, flex, flex_bool, flex_opt};
use crate::keywords::{ArgSpec, Keyword, KeywordContext, KeywordRegistry, KeywordResult, TailMode};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) fn register(registry: &mut KeywordRegistry) {
    registry.register(PressKeycode);
    registry.register(LongPressKeycode);
    registry.register(GetNetworkConnectionStatus);
    registry.register(SetNetworkConnectionStatus);
    registry.register(PushFile);
    registry.register(PullFile);
    registry.register(PullFolder);
    registry.register(SetAppiumTimeout);
    registry.register(GetAppiumTimeout);
}

/// Parameters for the keycode keywords
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeycodeParams {
    /// Android keycode to send, e.g. 4 for BACK
    #[serde(deserialize_with = "flex")]
    pub keycode: u32,
    /// Modifier-key metastate held during the press
    #[serde(default, deserialize_with = "flex_opt")]
    pub metastate: Option<u32>,
}

/// Sends a keycode press to the device
#[derive(Default)]
pub struct PressKeycode;

impl Keyword for PressKeycode {
    type Params = KeycodeParams;

    fn name(&self) -> &str {
        "press_keycode"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["keycode"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: KeycodeParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context
            .active()?
            .android(self.name())?
            .press_keycode(params.keycode, params.metastate)?;
        Ok(KeywordResult::success())
    }
}

/// Sends a long keycode press to the device
#[derive(Default)]
pub struct LongPressKeycode;

impl Keyword for LongPressKeycode {
    type Params = KeycodeParams;

    fn name(&self) -> &str {
        "long_press_keycode"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["keycode"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: KeycodeParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        context
            .active()?
            .android(self.name())?
            .long_press_keycode(params.keycode, params.metastate)?;
        Ok(KeywordResult::success())
    }
}

/// Returns the device network connection status as its integer bitmask
#[derive(Default)]
pub struct GetNetworkConnectionStatus;

impl Keyword for GetNetworkConnectionStatus {
    type Params = NoParams;

    fn name(&self) -> &str {
        "get_network_connection_status"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let connection = context.active()?.android(self.name())?.network_connection()?;
        Ok(KeywordResult::success_with(connection.bitmask()))
    }
}

/// Parameters for `set_network_connection_status`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NetworkStatusParams {
    /// Connection bitmask: 0 none, 1 airplane mode, 2 wifi, 4 data, 6 all
    #[serde(deserialize_with = "flex")]
    pub status: u8,
}

/// Sets the device network connection by bitmask
#[derive(Default)]
pub struct SetNetworkConnectionStatus;

impl Keyword for SetNetworkConnectionStatus {
    type Params = NetworkStatusParams;

    fn name(&self) -> &str {
        "set_network_connection_status"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["status"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: NetworkStatusParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let connection = NetworkConnection::from_bitmask(params.status)?;
        context
            .active()?
            .android(self.name())?
            .set_network_connection(connection)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `push_file`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PushFileParams {
    /// Destination path on the device
    pub path: String,
    /// File contents, base64 encoded
    pub data: String,
}

/// Writes a file onto the device; the content argument is base64 encoded
#[derive(Default)]
pub struct PushFile;

impl Keyword for PushFile {
    type Params = PushFileParams;

    fn name(&self) -> &str {
        "push_file"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["path", "data"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: PushFileParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let bytes = STANDARD.decode(&params.data).map_err(|e| {
            KeywordError::InvalidArgument(format!("push_file data is not valid base64: {}", e))
        })?;
        context
            .active()?
            .android(self.name())?
            .push_file(&params.path, &bytes)?;
        Ok(KeywordResult::success())
    }
}

/// Parameters for `pull_file`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PullFileParams {
    /// Path of the file on the device
    pub path: String,
    /// Return the content as decoded text instead of base64
    #[serde(default, deserialize_with = "flex_bool")]
    pub decode: bool,
}

/// Retrieves a file from the device. Returns the content base64 encoded,
/// or as text when the `decode` option is set.
#[derive(Default)]
pub struct PullFile;

impl Keyword for PullFile {
    type Params = PullFileParams;

    fn name(&self) -> &str {
        "pull_file"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["path"], TailMode::Options)
    }

    fn execute_typed(
        &self,
        params: PullFileParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let bytes = context.active()?.driver().pull_file(&params.path)?;
        let content = if params.decode {
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            STANDARD.encode(&bytes)
        };
        Ok(KeywordResult::success_with(content))
    }
}

/// Parameters for `pull_folder`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PullFolderParams {
    /// Path of the folder on the device
    pub path: String,
}

/// Retrieves a folder from the device as a base64-encoded zip archive
#[derive(Default)]
pub struct PullFolder;

impl Keyword for PullFolder {
    type Params = PullFolderParams;

    fn name(&self) -> &str {
        "pull_folder"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["path"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: PullFolderParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let bytes = context.active()?.driver().pull_folder(&params.path)?;
        Ok(KeywordResult::success_with(STANDARD.encode(&bytes)))
    }
}

/// Parameters for `set_appium_timeout`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TimeoutParams {
    /// New shared timeout in seconds
    #[serde(deserialize_with = "flex")]
    pub timeout: u32,
}

/// Sets the shared timeout used by waits, scroll searches and the active
/// driver's implicit element lookup. Returns the previous value so a
/// caller can restore it.
#[derive(Default)]
pub struct SetAppiumTimeout;

impl Keyword for SetAppiumTimeout {
    type Params = TimeoutParams;

    fn name(&self) -> &str {
        "set_appium_timeout"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&["timeout"], TailMode::None)
    }

    fn execute_typed(
        &self,
        params: TimeoutParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        let previous = context.sessions.current_timeout();
        context.sessions.set_timeout(params.timeout)?;
        Ok(KeywordResult::success_with(previous))
    }
}

/// Returns the shared timeout in seconds
#[derive(Default)]
pub struct GetAppiumTimeout;

impl Keyword for GetAppiumTimeout {
    type Params = NoParams;

    fn name(&self) -> &str {
        "get_appium_timeout"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::new(&[], TailMode::None)
    }

    fn execute_typed(
        &self,
        _params: NoParams,
        context: &mut KeywordContext,
    ) -> Result<KeywordResult> {
        Ok(KeywordResult::success_with(
            context.sessions.current_timeout(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycode_params_coercion() {
        let params: KeycodeParams = serde_json::from_value(serde_json::json!({
            "keycode": "4",
            "metastate": "1"
        }))
        .unwrap();
        assert_eq!(params.keycode, 4);
        assert_eq!(params.metastate, Some(1));
    }

    #[test]
    fn test_pull_file_decode_defaults_off() {
        let params: PullFileParams =
            serde_json::from_value(serde_json::json!({"path": "/sdcard/log.txt"})).unwrap();
        assert!(!params.decode);
    }

    #[test]
    fn test_push_file_rejects_bad_base64() {
        assert!(STANDARD.decode("not base64!!").is_err());
    }
}
