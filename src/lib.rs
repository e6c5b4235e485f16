//! # appium-keywords
//!
//! The keyword core of a remote mobile-automation server: a catalog of
//! named operations ("keywords") a remote transport invokes with string
//! arguments to drive Android and iOS applications through an
//! Appium-style driver.
//!
//! ## What lives here
//!
//! - **Keyword dispatch**: [`keywords::KeywordRegistry`] maps keyword
//!   names to typed implementations, parses the raw string argument
//!   lists a transport delivers, and exposes parameter schemas for
//!   introspection
//! - **Session management**: [`session::SessionRegistry`] tracks every
//!   open application by alias and insertion index, the single active
//!   session, and the shared keyword timeout
//! - **Locator translation**: [`locator::Locator`] turns the compact
//!   prefix syntax (`id=`, `xpath=`, `//`, `class=`, `css=`) into a
//!   driver strategy/value pair
//! - **Polling waits**: [`wait::Waiter`] bounds every "wait until" and
//!   "scroll until visible" loop with a deadline and a cancel flag
//!
//! The automation protocol itself is not implemented here. Embedders
//! supply a [`driver::DriverFactory`] whose drivers speak to the real
//! automation server; tests substitute scripted drivers through the
//! same seam.
//!
//! ## Usage
//!
//! ```rust
//! use appium_keywords::keywords::KeywordRegistry;
//!
//! let registry = KeywordRegistry::with_defaults();
//! assert!(registry.contains("open_application"));
//! assert!(registry.contains("wait_until_page_contains"));
//! ```
//!
//! Executing a keyword takes a [`keywords::KeywordContext`] built around
//! a session registry:
//!
//! ```rust,no_run
//! use appium_keywords::keywords::{KeywordContext, KeywordRegistry};
//! use appium_keywords::session::SessionRegistry;
//!
//! # fn run(factory: Box<dyn appium_keywords::driver::DriverFactory>) -> appium_keywords::Result<()> {
//! let registry = KeywordRegistry::with_defaults();
//! let mut sessions = SessionRegistry::new(factory);
//! let mut context = KeywordContext::new(&mut sessions);
//!
//! registry.run(
//!     "open_application",
//!     &["http://localhost:4723/wd/hub", "alias=app", "udid=emulator-5554"],
//!     &mut context,
//! )?;
//! registry.run("click_element", &["id=login"], &mut context)?;
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod driver;
pub mod error;
pub mod keywords;
pub mod locator;
pub mod session;
pub mod wait;

pub use capabilities::Capabilities;
pub use error::{KeywordError, Result};
pub use keywords::{KeywordContext, KeywordRegistry, KeywordResult};
pub use locator::{Locator, Strategy};
pub use session::SessionRegistry;
pub use wait::{CancelFlag, Waiter};
