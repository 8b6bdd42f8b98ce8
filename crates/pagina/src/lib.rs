//! Pagina: a page-object layer for driving browsers from tests.
//!
//! Pagina sits between a test and a browser driver. Tests declare pages and
//! modules as plain structs whose content is looked up through [`Locator`]s;
//! resolution never fails on a miss (missing content is an empty sentinel,
//! not an error), and anything asynchronous is handled by polling waits with
//! descriptive timeout diagnostics.
//!
//! The driver itself stays behind the [`Driver`] and [`ElementHandle`]
//! traits. A scriptable in-memory implementation ships in [`mock`] so page
//! objects can be unit-tested without a browser.
//!
//! # Example
//!
//! ```
//! use pagina::mock::{MockDriver, MockElement};
//! use pagina::{Browser, Config, Locator, PaginaResult};
//!
//! fn main() -> PaginaResult<()> {
//!     let mock = MockDriver::new();
//!     mock.install(Locator::tag("h1"), vec![MockElement::new("Welcome")]);
//!
//!     let browser = Browser::new(mock.as_driver(), Config::new());
//!     let heading = browser.tag("h1", None)?;
//!     assert_eq!(heading.text()?, "Welcome");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod browser;
mod config;
mod content;
mod driver;
mod element;
mod locator;
pub mod mock;
mod page;
mod result;
mod truthy;
mod wait;

pub use browser::Browser;
pub use config::Config;
pub use content::{Content, ContentValue};
pub use driver::{Driver, DriverRef, ElementHandle, ElementRef, Point};
pub use element::{Element, ElementList, Resolved};
pub use locator::{FetchMode, Locator};
pub use page::{Module, Page};
pub use result::{PaginaError, PaginaResult};
pub use truthy::{Evaluated, Truthy};
pub use wait::{
    wait_for, WaitPreset, WaitTimeoutMessage, DEFAULT_PRESET_NAME, DEFAULT_RETRY_INTERVAL,
    DEFAULT_WAIT_TIMEOUT,
};
