//! Boundary to the browser-driving collaborator.
//!
//! Pagina does not implement a browser protocol. It consumes a small driving
//! capability behind the [`Driver`] and [`ElementHandle`] traits: element
//! queries, a rendered-position probe, window-handle enumeration, navigation
//! and session shutdown. Everything else (wire protocol, DOM semantics) is
//! owned by the implementation behind these traits.
//!
//! Handles are `Rc`-shared: the concurrency model is strictly
//! single-threaded, with one test thread owning every page, module and
//! content object it creates.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::locator::Locator;
use crate::result::PaginaResult;

/// A point in page coordinates, as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Shared handle to a live element owned by the driver
pub type ElementRef = Rc<dyn ElementHandle>;

/// Shared handle to a driver session
pub type DriverRef = Rc<dyn Driver>;

/// A single live element inside the current document.
///
/// Scoped queries run through the handle of the scope element, so locator
/// syntax lives entirely on the driver side of this boundary.
pub trait ElementHandle: std::fmt::Debug {
    /// All descendants of this element matching `locator`, in document order
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the query cannot be executed.
    fn query(&self, locator: &Locator) -> PaginaResult<Vec<ElementRef>>;

    /// On-page position, or `None` when the element is not rendered
    fn location(&self) -> Option<Point>;

    /// Visible text content
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the element is gone.
    fn text(&self) -> PaginaResult<String>;

    /// Click the element
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the element is gone or not clickable.
    fn click(&self) -> PaginaResult<()>;

    /// Value of an attribute, if present
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the element is gone.
    fn attribute(&self, name: &str) -> PaginaResult<Option<String>>;
}

/// An active browser session.
pub trait Driver: std::fmt::Debug {
    /// All elements in the current document matching `locator`, in document
    /// order
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the session is broken.
    fn query(&self, locator: &Locator) -> PaginaResult<Vec<ElementRef>>;

    /// Navigate the current tab to `url`
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if navigation cannot be commanded.
    fn navigate(&self, url: &str) -> PaginaResult<()>;

    /// URL currently displayed
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the session is broken.
    fn current_url(&self) -> PaginaResult<String>;

    /// Handles of all open windows/tabs, in opening order
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the session is broken.
    fn window_handles(&self) -> PaginaResult<Vec<String>>;

    /// Handle of the currently focused window/tab
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the session is broken.
    fn current_window(&self) -> PaginaResult<String>;

    /// Focus the window/tab with the given handle
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if the handle is unknown.
    fn switch_to_window(&self, handle: &str) -> PaginaResult<()>;

    /// End the session
    ///
    /// # Errors
    ///
    /// Returns a driver-level error if shutdown fails.
    fn quit(&self) -> PaginaResult<()>;
}
