//! Alias-keyed session registry
//!
//! The registry is an explicit object constructed once at server start and
//! threaded through the keyword dispatch surface; there is no ambient
//! global state. A single `IndexMap` provides both alias lookup and the
//! insertion order used for index-based switching, so the two views cannot
//! drift apart. The registry assumes one sequential caller and does no
//! internal locking.

use crate::capabilities::Capabilities;
use crate::driver::{DriverFactory, Platform};
use crate::error::{KeywordError, Result};
use crate::session::Session;
use indexmap::IndexMap;

/// Initial value for both the default and the current keyword timeout
pub const DEFAULT_TIMEOUT_SECS: u32 = 10;

/// Tracks every open session, the active one, and the shared timeouts
pub struct SessionRegistry {
    factory: Box<dyn DriverFactory>,
    sessions: IndexMap<String, Session>,
    active: Option<String>,
    default_timeout_secs: u32,
    current_timeout_secs: u32,
}

impl SessionRegistry {
    /// Create an empty registry around the driver factory the transport
    /// injects at server start
    pub fn new(factory: Box<dyn DriverFactory>) -> Self {
        Self {
            factory,
            sessions: IndexMap::new(),
            active: None,
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            current_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Open a session against `url`, or reuse a running one.
    ///
    /// When the requested `udid` matches an already-tracked Android
    /// session's `udid` (case-insensitively), that session is made active
    /// and the requested app/activity is started inside it instead of
    /// opening a second connection. Otherwise a fresh driver is created,
    /// the configured default timeout is applied as its implicit wait, and
    /// the session is inserted under its alias (derived as `session-N`
    /// when the capabilities carry none) and made active.
    ///
    /// Returns the alias the session is tracked under. Opening under an
    /// alias that is already in use is rejected.
    pub fn open(&mut self, url: &str, capabilities: Capabilities) -> Result<String> {
        if let Some(alias) = self.running_android_alias(capabilities.udid()) {
            log::info!(
                "session '{}' already running on this device, starting activity instead",
                alias
            );
            let app = capabilities.app().ok_or_else(|| {
                KeywordError::InvalidArgument(
                    "Reusing a running session requires the 'app' capability".to_string(),
                )
            })?;
            let activity = capabilities.app_activity().ok_or_else(|| {
                KeywordError::InvalidArgument(
                    "Reusing a running session requires the 'appActivity' capability".to_string(),
                )
            })?;
            if let Some(session) = self.sessions.get_mut(&alias) {
                session
                    .android("open_application")?
                    .start_activity(app, activity)?;
            }
            self.active = Some(alias.clone());
            return Ok(alias);
        }

        let alias = match capabilities.alias() {
            Some(alias) => alias.to_string(),
            None => format!("session-{}", self.sessions.len() + 1),
        };
        if self.sessions.contains_key(&alias) {
            return Err(KeywordError::DuplicateAlias(alias));
        }

        log::info!("opening application at {} as '{}'", url, alias);
        let mut driver = self.factory.open(url, &capabilities)?;
        driver.driver().set_implicit_wait(self.default_timeout_secs)?;

        self.sessions
            .insert(alias.clone(), Session::new(driver, capabilities));
        self.active = Some(alias.clone());
        Ok(alias)
    }

    /// Alias of a tracked Android session whose udid matches the requested
    /// one, compared case-insensitively
    fn running_android_alias(&self, udid: Option<&str>) -> Option<String> {
        let udid = udid?;
        self.sessions
            .iter()
            .find(|(_, session)| {
                session.platform() == Platform::Android
                    && session
                        .udid()
                        .is_some_and(|existing| existing.eq_ignore_ascii_case(udid))
            })
            .map(|(alias, _)| alias.clone())
    }

    /// Make another tracked session active, addressed either by 0-based
    /// insertion index (when the argument parses as an integer) or by
    /// alias. A failed resolution is logged and leaves the active session
    /// unchanged; it deliberately does not raise.
    pub fn switch(&mut self, index_or_alias: &str) {
        let resolved = match index_or_alias.parse::<usize>() {
            Ok(index) => self
                .sessions
                .get_index(index)
                .map(|(alias, _)| alias.clone()),
            Err(_) => self
                .sessions
                .contains_key(index_or_alias)
                .then(|| index_or_alias.to_string()),
        };
        match resolved {
            Some(alias) => {
                log::debug!("switching active session to '{}'", alias);
                self.active = Some(alias);
            }
            None => log::warn!(
                "unable to switch to '{}'; active session unchanged",
                index_or_alias
            ),
        }
    }

    /// Terminate the active session and forget it.
    ///
    /// The driver connection is released before the entry is discarded.
    /// A quit failure is reported, but the entry is still removed so a
    /// broken connection cannot wedge the registry.
    pub fn close_active(&mut self) -> Result<()> {
        let alias = self.active.clone().ok_or(KeywordError::NoActiveSession)?;
        log::info!("closing session '{}'", alias);
        let quit_result = match self.sessions.get_mut(&alias) {
            Some(session) => session.quit(),
            None => Ok(()),
        };
        self.sessions.shift_remove(&alias);
        self.active = None;
        quit_result
    }

    /// Suite-teardown: terminate and forget every tracked session.
    ///
    /// Quit failures are logged and do not stop the teardown; the registry
    /// is always empty afterwards.
    pub fn close_all(&mut self) {
        for (alias, mut session) in self.sessions.drain(..) {
            log::info!("closing session '{}'", alias);
            if let Err(error) = session.quit() {
                log::warn!("failed to quit session '{}': {}", alias, error);
            }
        }
        self.active = None;
    }

    /// The active session, required by every element/page keyword
    pub fn active(&mut self) -> Result<&mut Session> {
        let alias = self.active.as_ref().ok_or(KeywordError::NoActiveSession)?;
        self.sessions
            .get_mut(alias)
            .ok_or(KeywordError::NoActiveSession)
    }

    /// Alias of the active session, if any
    pub fn active_alias(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Aliases of all tracked sessions in insertion order
    pub fn aliases(&self) -> Vec<&str> {
        self.sessions.keys().map(String::as_str).collect()
    }

    /// Number of tracked sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any session is tracked
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Set the effective timeout used by waits that omit an explicit
    /// override, and apply it as the active driver's implicit wait
    pub fn set_timeout(&mut self, seconds: u32) -> Result<()> {
        self.current_timeout_secs = seconds;
        if let Some(alias) = self.active.clone() {
            if let Some(session) = self.sessions.get_mut(&alias) {
                session.driver().set_implicit_wait(seconds)?;
            }
        }
        Ok(())
    }

    /// Current effective timeout in seconds
    pub fn current_timeout(&self) -> u32 {
        self.current_timeout_secs
    }

    /// Configured default timeout in seconds
    pub fn default_timeout(&self) -> u32 {
        self.default_timeout_secs
    }
}

impl Drop for SessionRegistry {
    fn drop(&mut self) {
        // Process-exit path: every driver connection must still be released
        self.close_all();
    }
}
