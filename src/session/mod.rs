//! Session management
//!
//! A [`Session`] is one open application-automation connection: the
//! platform-tagged driver, the capabilities it was opened with, and a
//! liveness flag. Sessions are owned exclusively by the
//! [`SessionRegistry`], which tracks aliases, insertion order and the
//! single active session.

pub mod registry;

pub use registry::{DEFAULT_TIMEOUT_SECS, SessionRegistry};

use crate::capabilities::Capabilities;
use crate::driver::{AndroidDriver, Driver, Platform, PlatformDriver};
use crate::error::Result;

/// One open application-automation connection
pub struct Session {
    driver: PlatformDriver,
    capabilities: Capabilities,
    live: bool,
}

impl Session {
    pub(crate) fn new(driver: PlatformDriver, capabilities: Capabilities) -> Self {
        Self {
            driver,
            capabilities,
            live: true,
        }
    }

    /// Platform this session automates
    pub fn platform(&self) -> Platform {
        self.driver.platform()
    }

    /// Capabilities the session was opened with
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Device identifier from the opening capabilities
    pub fn udid(&self) -> Option<&str> {
        self.capabilities.udid()
    }

    /// Whether the underlying driver connection is still open
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Platform-common driver operations
    pub fn driver(&mut self) -> &mut dyn Driver {
        self.driver.driver()
    }

    /// Android-only driver operations; fails with a platform error on iOS
    pub fn android(&mut self, operation: &str) -> Result<&mut dyn AndroidDriver> {
        self.driver.android(operation)
    }

    /// Terminate the underlying driver connection. Idempotent: a second
    /// call is a no-op.
    pub(crate) fn quit(&mut self) -> Result<()> {
        if self.live {
            self.live = false;
            self.driver.driver().quit()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, MockState};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_quit_flips_liveness_and_is_idempotent() {
        let state = Arc::new(Mutex::new(MockState::default()));
        let driver = PlatformDriver::Android(Box::new(MockDriver::new(state.clone())));
        let mut session = Session::new(driver, Capabilities::new());
        assert!(session.is_live());

        session.quit().unwrap();
        assert!(!session.is_live());
        assert!(state.lock().unwrap().quit_called);

        // A second quit must not reach the driver again
        state.lock().unwrap().quit_called = false;
        session.quit().unwrap();
        assert!(!session.is_live());
        assert!(!state.lock().unwrap().quit_called);
    }
}
