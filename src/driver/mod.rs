//! Consumed automation-driver interface
//!
//! The keyword core does not implement the mobile automation protocol; it
//! drives sessions through the traits in this module. A transport embedding
//! the crate supplies a [`DriverFactory`] whose drivers talk to the real
//! automation server. Platform-specific operations are only reachable
//! through the [`PlatformDriver`] variant for that platform, so a keyword
//! asking for an Android-only call on an iOS session fails with a typed
//! error instead of a bad cast.

use crate::capabilities::Capabilities;
use crate::error::{KeywordError, Result};
use crate::locator::Locator;
use serde::Serialize;
use std::fmt;

#[cfg(test)]
pub(crate) mod mock;

/// Opaque driver-issued reference to a located element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle(pub String);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element:{}", self.0)
    }
}

/// On-screen position of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Rendered size of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Device screen orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Android network connection bitmask (data / wifi / airplane bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkConnection {
    /// All radios off
    None,
    /// Airplane mode
    AirplaneMode,
    /// Wifi only
    WifiOnly,
    /// Mobile data only
    DataOnly,
    /// Wifi and mobile data
    All,
}

impl NetworkConnection {
    /// Decode the integer bitmask used on the keyword boundary
    pub fn from_bitmask(value: u8) -> Result<Self> {
        match value {
            0 => Ok(NetworkConnection::None),
            1 => Ok(NetworkConnection::AirplaneMode),
            2 => Ok(NetworkConnection::WifiOnly),
            4 => Ok(NetworkConnection::DataOnly),
            6 => Ok(NetworkConnection::All),
            other => Err(KeywordError::InvalidArgument(format!(
                "Unknown network connection status: {}",
                other
            ))),
        }
    }

    /// Integer bitmask form of this connection state
    pub fn bitmask(&self) -> u8 {
        match self {
            NetworkConnection::None => 0,
            NetworkConnection::AirplaneMode => 1,
            NetworkConnection::WifiOnly => 2,
            NetworkConnection::DataOnly => 4,
            NetworkConnection::All => 6,
        }
    }
}

/// Platform kind of an open session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Ios => write!(f, "iOS"),
        }
    }
}

/// Platform-common driver operations consumed by the keyword surface.
///
/// Every method maps onto one automation-protocol round trip; errors are
/// passed through as [`KeywordError::Driver`] and never retried here.
pub trait Driver {
    /// Locate a single element; fails with a driver error when nothing matches
    fn find_element(&mut self, locator: &Locator) -> Result<ElementHandle>;

    /// Locate all matching elements; an empty list is not an error
    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>>;

    /// Non-failing existence probe backing the polling waits
    fn is_element_present(&mut self, locator: &Locator) -> Result<bool> {
        Ok(!self.find_elements(locator)?.is_empty())
    }

    fn click(&mut self, element: &ElementHandle) -> Result<()>;
    fn clear(&mut self, element: &ElementHandle) -> Result<()>;
    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<()>;
    fn text(&mut self, element: &ElementHandle) -> Result<String>;
    fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<String>;
    fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool>;
    fn location(&mut self, element: &ElementHandle) -> Result<Point>;
    fn size(&mut self, element: &ElementHandle) -> Result<Size>;

    /// Tap at screen coordinates with the given number of fingers
    fn tap(&mut self, fingers: u8, x: i32, y: i32, duration_ms: u32) -> Result<()>;
    /// Tap (or long-press, with a long duration) on a located element
    fn tap_element(&mut self, element: &ElementHandle, duration_ms: u32) -> Result<()>;
    fn swipe(
        &mut self,
        start_x: i32,
        start_y: i32,
        offset_x: i32,
        offset_y: i32,
        duration_ms: u32,
    ) -> Result<()>;
    /// Scroll from one located element to another
    fn scroll(&mut self, from: &ElementHandle, to: &ElementHandle) -> Result<()>;
    /// One fixed-size vertical scroll step towards the bottom of the view
    fn scroll_down_step(&mut self) -> Result<()>;
    /// One fixed-size vertical scroll step towards the top of the view
    fn scroll_up_step(&mut self) -> Result<()>;
    fn pinch(&mut self, element: &ElementHandle) -> Result<()>;
    fn zoom(&mut self, element: &ElementHandle) -> Result<()>;
    fn rotate(&mut self, orientation: Orientation) -> Result<()>;

    fn page_source(&mut self) -> Result<String>;
    fn screenshot(&mut self) -> Result<Vec<u8>>;

    fn contexts(&mut self) -> Result<Vec<String>>;
    fn current_context(&mut self) -> Result<String>;
    fn switch_context(&mut self, name: &str) -> Result<()>;

    fn background_app(&mut self, seconds: u32) -> Result<()>;
    /// Close the application binary; the session itself stays open
    fn close_app(&mut self) -> Result<()>;
    fn reset_app(&mut self) -> Result<()>;
    fn remove_app(&mut self, application_id: &str) -> Result<()>;

    fn pull_file(&mut self, path: &str) -> Result<Vec<u8>>;
    /// Retrieve a folder; the returned bytes are the zipped contents
    fn pull_folder(&mut self, path: &str) -> Result<Vec<u8>>;

    fn hide_keyboard(&mut self) -> Result<()>;
    fn is_keyboard_shown(&mut self) -> Result<bool>;
    /// One step backward in the view/browser history
    fn back(&mut self) -> Result<()>;

    /// Configure the driver-side implicit wait applied to element lookups
    fn set_implicit_wait(&mut self, seconds: u32) -> Result<()>;

    /// Terminate the session, releasing the underlying connection
    fn quit(&mut self) -> Result<()>;
}

/// Android-only driver operations
pub trait AndroidDriver: Driver {
    /// Launch an activity inside an already-running session
    fn start_activity(&mut self, app_package: &str, app_activity: &str) -> Result<()>;
    /// Send a keycode press; metastate describes held modifier keys
    fn press_keycode(&mut self, keycode: u32, metastate: Option<u32>) -> Result<()>;
    /// Send a long keycode press
    fn long_press_keycode(&mut self, keycode: u32, metastate: Option<u32>) -> Result<()>;
    fn network_connection(&mut self) -> Result<NetworkConnection>;
    fn set_network_connection(&mut self, connection: NetworkConnection) -> Result<()>;
    /// Write bytes to a file on the device
    fn push_file(&mut self, path: &str, data: &[u8]) -> Result<()>;
}

/// iOS driver marker; platform-specific operations land here when the
/// iOS branch is implemented
pub trait IosDriver: Driver {}

/// Capability-tagged driver variant owned by a session
pub enum PlatformDriver {
    Android(Box<dyn AndroidDriver>),
    Ios(Box<dyn IosDriver>),
}

impl PlatformDriver {
    /// Platform this driver automates
    pub fn platform(&self) -> Platform {
        match self {
            PlatformDriver::Android(_) => Platform::Android,
            PlatformDriver::Ios(_) => Platform::Ios,
        }
    }

    /// Platform-common view of the driver
    pub fn driver(&mut self) -> &mut dyn Driver {
        match self {
            PlatformDriver::Android(driver) => driver.as_mut(),
            PlatformDriver::Ios(driver) => driver.as_mut(),
        }
    }

    /// Android-only view; fails on any other platform
    pub fn android(&mut self, operation: &str) -> Result<&mut dyn AndroidDriver> {
        match self {
            PlatformDriver::Android(driver) => Ok(driver.as_mut()),
            other => Err(KeywordError::unsupported(
                operation,
                other.platform().to_string(),
            )),
        }
    }
}

impl fmt::Debug for PlatformDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlatformDriver({})", self.platform())
    }
}

/// Creates drivers for new sessions; injected into the session registry
/// at construction so tests can substitute scripted drivers.
pub trait DriverFactory {
    /// Open a connection to the automation server at `url` with the given
    /// capabilities and return the platform-tagged driver for it
    fn open(&self, url: &str, capabilities: &Capabilities) -> Result<PlatformDriver>;
}
