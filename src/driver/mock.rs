//! Scripted in-memory driver used by the unit tests.
//!
//! Elements are keyed by the locator value they are found under; each call
//! is recorded so tests can assert on the exact driver traffic a keyword
//! produced. State lives behind a shared handle so it stays inspectable
//! after the driver has been moved into a session.

use super::{
    AndroidDriver, Driver, DriverFactory, ElementHandle, IosDriver, NetworkConnection,
    Orientation, PlatformDriver, Point, Size,
};
use crate::capabilities::Capabilities;
use crate::error::{KeywordError, Result};
use crate::locator::Locator;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct MockElement {
    pub text: String,
    pub enabled: bool,
    pub attributes: HashMap<String, String>,
    pub count: usize,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            enabled: true,
            attributes: HashMap::new(),
            count: 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    pub opened_url: String,
    pub elements: HashMap<String, MockElement>,
    /// Locator values that become present only after this many failed probes
    pub present_after: HashMap<String, u32>,
    pub calls: Vec<String>,
    pub page_source: String,
    pub contexts: Vec<String>,
    pub current_context: String,
    pub network: u8,
    pub files: HashMap<String, Vec<u8>>,
    pub implicit_wait: Option<u32>,
    pub quit_called: bool,
}

impl MockState {
    pub fn add_element(&mut self, key: &str, element: MockElement) {
        self.elements.insert(key.to_string(), element);
    }

    pub fn add_text_element(&mut self, key: &str, text: &str) {
        self.add_element(
            key,
            MockElement {
                text: text.to_string(),
                ..MockElement::default()
            },
        );
    }
}

pub type SharedState = Arc<Mutex<MockState>>;

pub struct MockDriver {
    pub state: SharedState,
}

impl MockDriver {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl Driver for MockDriver {
    fn find_element(&mut self, locator: &Locator) -> Result<ElementHandle> {
        let elements = self.find_elements(locator)?;
        elements.into_iter().next().ok_or_else(|| {
            KeywordError::Driver(format!("no such element: {}", locator))
        })
    }

    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("find({})", locator));
        if let Some(remaining) = state.present_after.get_mut(&locator.value) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(Vec::new());
            }
        }
        match state.elements.get(&locator.value) {
            Some(element) => Ok((0..element.count)
                .map(|_| ElementHandle(locator.value.clone()))
                .collect()),
            None => Ok(Vec::new()),
        }
    }

    fn click(&mut self, element: &ElementHandle) -> Result<()> {
        self.record(format!("click({})", element.0));
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> Result<()> {
        self.record(format!("clear({})", element.0));
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<()> {
        self.record(format!("send_keys({},{})", element.0, text));
        Ok(())
    }

    fn text(&mut self, element: &ElementHandle) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .elements
            .get(&element.0)
            .map(|e| e.text.clone())
            .ok_or_else(|| KeywordError::Driver(format!("stale element: {}", element.0)))
    }

    fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .elements
            .get(&element.0)
            .and_then(|e| e.attributes.get(name).cloned())
            .ok_or_else(|| {
                KeywordError::Driver(format!("no attribute '{}' on {}", name, element.0))
            })
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool> {
        let state = self.state.lock().unwrap();
        state
            .elements
            .get(&element.0)
            .map(|e| e.enabled)
            .ok_or_else(|| KeywordError::Driver(format!("stale element: {}", element.0)))
    }

    fn location(&mut self, _element: &ElementHandle) -> Result<Point> {
        Ok(Point { x: 10, y: 20 })
    }

    fn size(&mut self, _element: &ElementHandle) -> Result<Size> {
        Ok(Size {
            width: 100,
            height: 50,
        })
    }

    fn tap(&mut self, fingers: u8, x: i32, y: i32, duration_ms: u32) -> Result<()> {
        self.record(format!("tap({},{},{},{})", fingers, x, y, duration_ms));
        Ok(())
    }

    fn tap_element(&mut self, element: &ElementHandle, duration_ms: u32) -> Result<()> {
        self.record(format!("tap_element({},{})", element.0, duration_ms));
        Ok(())
    }

    fn swipe(
        &mut self,
        start_x: i32,
        start_y: i32,
        offset_x: i32,
        offset_y: i32,
        duration_ms: u32,
    ) -> Result<()> {
        self.record(format!(
            "swipe({},{},{},{},{})",
            start_x, start_y, offset_x, offset_y, duration_ms
        ));
        Ok(())
    }

    fn scroll(&mut self, from: &ElementHandle, to: &ElementHandle) -> Result<()> {
        self.record(format!("scroll({},{})", from.0, to.0));
        Ok(())
    }

    fn scroll_down_step(&mut self) -> Result<()> {
        self.record("scroll_down_step".to_string());
        Ok(())
    }

    fn scroll_up_step(&mut self) -> Result<()> {
        self.record("scroll_up_step".to_string());
        Ok(())
    }

    fn pinch(&mut self, element: &ElementHandle) -> Result<()> {
        self.record(format!("pinch({})", element.0));
        Ok(())
    }

    fn zoom(&mut self, element: &ElementHandle) -> Result<()> {
        self.record(format!("zoom({})", element.0));
        Ok(())
    }

    fn rotate(&mut self, orientation: Orientation) -> Result<()> {
        self.record(format!("rotate({:?})", orientation));
        Ok(())
    }

    fn page_source(&mut self) -> Result<String> {
        Ok(self.state.lock().unwrap().page_source.clone())
    }

    fn screenshot(&mut self) -> Result<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    fn contexts(&mut self) -> Result<Vec<String>> {
        Ok(self.state.lock().unwrap().contexts.clone())
    }

    fn current_context(&mut self) -> Result<String> {
        Ok(self.state.lock().unwrap().current_context.clone())
    }

    fn switch_context(&mut self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("switch_context({})", name));
        state.current_context = name.to_string();
        Ok(())
    }

    fn background_app(&mut self, seconds: u32) -> Result<()> {
        self.record(format!("background_app({})", seconds));
        Ok(())
    }

    fn close_app(&mut self) -> Result<()> {
        self.record("close_app".to_string());
        Ok(())
    }

    fn reset_app(&mut self) -> Result<()> {
        self.record("reset_app".to_string());
        Ok(())
    }

    fn remove_app(&mut self, application_id: &str) -> Result<()> {
        self.record(format!("remove_app({})", application_id));
        Ok(())
    }

    fn pull_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| KeywordError::Driver(format!("no such file: {}", path)))
    }

    fn pull_folder(&mut self, path: &str) -> Result<Vec<u8>> {
        self.pull_file(path)
    }

    fn hide_keyboard(&mut self) -> Result<()> {
        self.record("hide_keyboard".to_string());
        Ok(())
    }

    fn is_keyboard_shown(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn back(&mut self) -> Result<()> {
        self.record("back".to_string());
        Ok(())
    }

    fn set_implicit_wait(&mut self, seconds: u32) -> Result<()> {
        self.state.lock().unwrap().implicit_wait = Some(seconds);
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        self.state.lock().unwrap().quit_called = true;
        Ok(())
    }
}

impl AndroidDriver for MockDriver {
    fn start_activity(&mut self, app_package: &str, app_activity: &str) -> Result<()> {
        self.record(format!("start_activity({},{})", app_package, app_activity));
        Ok(())
    }

    fn press_keycode(&mut self, keycode: u32, metastate: Option<u32>) -> Result<()> {
        self.record(format!("press_keycode({},{:?})", keycode, metastate));
        Ok(())
    }

    fn long_press_keycode(&mut self, keycode: u32, metastate: Option<u32>) -> Result<()> {
        self.record(format!("long_press_keycode({},{:?})", keycode, metastate));
        Ok(())
    }

    fn network_connection(&mut self) -> Result<NetworkConnection> {
        NetworkConnection::from_bitmask(self.state.lock().unwrap().network)
    }

    fn set_network_connection(&mut self, connection: NetworkConnection) -> Result<()> {
        self.state.lock().unwrap().network = connection.bitmask();
        Ok(())
    }

    fn push_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("push_file({})", path));
        state.files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}

impl IosDriver for MockDriver {}

/// Factory producing mock drivers; keeps a handle to every driver state it
/// has created so tests can script and inspect them.
#[derive(Clone, Default)]
pub struct MockFactory {
    /// Create iOS-tagged drivers instead of Android ones
    pub ios: bool,
    pub created: Arc<Mutex<Vec<SharedState>>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ios() -> Self {
        Self {
            ios: true,
            ..Self::default()
        }
    }

    /// State handle of the n-th driver this factory has opened
    pub fn state(&self, index: usize) -> SharedState {
        self.created.lock().unwrap()[index].clone()
    }
}

impl DriverFactory for MockFactory {
    fn open(&self, url: &str, _capabilities: &Capabilities) -> Result<PlatformDriver> {
        let state = Arc::new(Mutex::new(MockState {
            opened_url: url.to_string(),
            current_context: "NATIVE_APP".to_string(),
            contexts: vec!["NATIVE_APP".to_string()],
            ..MockState::default()
        }));
        self.created.lock().unwrap().push(state.clone());
        let driver = MockDriver::new(state);
        Ok(if self.ios {
            PlatformDriver::Ios(Box::new(driver))
        } else {
            PlatformDriver::Android(Box::new(driver))
        })
    }
}
