//! Scriptable in-memory driver for testing without a browser.
//!
//! [`MockDriver`] keeps a locator-keyed registry of [`MockElement`]s plus
//! window-handle bookkeeping. Registrations can be changed while a test
//! runs, which is how tests simulate asynchronous rendering: a wait polls
//! while the test (or a scripted step) installs the content it is waiting
//! for.
//!
//! The mock is part of the public API so downstream page objects can be
//! unit-tested against it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::driver::{Driver, DriverRef, ElementHandle, ElementRef, Point};
use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};

/// In-memory element for the mock driver
#[derive(Debug, Clone)]
pub struct MockElement {
    state: Rc<MockElementState>,
}

#[derive(Debug)]
struct MockElementState {
    text: RefCell<String>,
    located: Cell<bool>,
    attributes: RefCell<HashMap<String, String>>,
    children: RefCell<HashMap<Locator, Vec<MockElement>>>,
    clicks: Cell<usize>,
}

impl MockElement {
    /// Create a rendered element with the given text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: Rc::new(MockElementState {
                text: RefCell::new(text.into()),
                located: Cell::new(true),
                attributes: RefCell::new(HashMap::new()),
                children: RefCell::new(HashMap::new()),
                clicks: Cell::new(0),
            }),
        }
    }

    /// Mark the element as rendered or not; an unrendered element has no
    /// location
    #[must_use]
    pub fn with_located(self, located: bool) -> Self {
        self.state.located.set(located);
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self
            .state
            .attributes
            .borrow_mut()
            .insert(name.into(), value.into());
        self
    }

    /// Register descendants matched by `locator` inside this element
    #[must_use]
    pub fn with_child(self, locator: Locator, children: Vec<Self>) -> Self {
        let _ = self.state.children.borrow_mut().insert(locator, children);
        self
    }

    /// Replace the element text (simulates a document mutation)
    pub fn set_text(&self, text: impl Into<String>) {
        *self.state.text.borrow_mut() = text.into();
    }

    /// Flip the rendered flag (simulates late rendering)
    pub fn set_located(&self, located: bool) {
        self.state.located.set(located);
    }

    /// How many times the element was clicked
    #[must_use]
    pub fn clicks(&self) -> usize {
        self.state.clicks.get()
    }
}

impl ElementHandle for MockElement {
    fn query(&self, locator: &Locator) -> PaginaResult<Vec<ElementRef>> {
        let children = self.state.children.borrow();
        Ok(children
            .get(locator)
            .map(|found| {
                found
                    .iter()
                    .map(|el| Rc::new(el.clone()) as ElementRef)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn location(&self) -> Option<Point> {
        self.state.located.get().then_some(Point::new(0, 0))
    }

    fn text(&self) -> PaginaResult<String> {
        Ok(self.state.text.borrow().clone())
    }

    fn click(&self) -> PaginaResult<()> {
        self.state.clicks.set(self.state.clicks.get() + 1);
        Ok(())
    }

    fn attribute(&self, name: &str) -> PaginaResult<Option<String>> {
        Ok(self.state.attributes.borrow().get(name).cloned())
    }
}

/// In-memory driver session
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Rc<RefCell<MockDriverState>>,
}

#[derive(Debug)]
struct MockDriverState {
    elements: HashMap<Locator, Vec<MockElement>>,
    windows: Vec<String>,
    current_window: usize,
    visited: Vec<String>,
    quit: bool,
}

impl Default for MockDriverState {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
            windows: vec!["main".to_string()],
            current_window: 0,
            visited: Vec::new(),
            quit: false,
        }
    }
}

impl MockDriver {
    /// Create a session with a single window named `main`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// This driver as a shareable driver handle
    #[must_use]
    pub fn as_driver(&self) -> DriverRef {
        Rc::new(self.clone())
    }

    /// Register elements matched by `locator` at document root
    pub fn install(&self, locator: Locator, elements: Vec<MockElement>) {
        let _ = self.state.borrow_mut().elements.insert(locator, elements);
    }

    /// Drop all registrations for `locator`
    pub fn remove(&self, locator: &Locator) {
        let _ = self.state.borrow_mut().elements.remove(locator);
    }

    /// Open a new tab at the end of the handle list, without focusing it
    pub fn open_tab(&self, handle: impl Into<String>) {
        self.state.borrow_mut().windows.push(handle.into());
    }

    /// Close the tab with the given handle
    pub fn close_tab(&self, handle: &str) {
        self.state.borrow_mut().windows.retain(|h| h != handle);
    }

    /// URLs navigated to, in order
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.state.borrow().visited.clone()
    }

    /// Whether the session was quit
    #[must_use]
    pub fn was_quit(&self) -> bool {
        self.state.borrow().quit
    }

    fn ensure_alive(&self) -> PaginaResult<()> {
        if self.state.borrow().quit {
            Err(PaginaError::driver("session has been quit"))
        } else {
            Ok(())
        }
    }
}

impl Driver for MockDriver {
    fn query(&self, locator: &Locator) -> PaginaResult<Vec<ElementRef>> {
        self.ensure_alive()?;
        let state = self.state.borrow();
        Ok(state
            .elements
            .get(locator)
            .map(|found| {
                found
                    .iter()
                    .map(|el| Rc::new(el.clone()) as ElementRef)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn navigate(&self, url: &str) -> PaginaResult<()> {
        self.ensure_alive()?;
        self.state.borrow_mut().visited.push(url.to_string());
        Ok(())
    }

    fn current_url(&self) -> PaginaResult<String> {
        self.ensure_alive()?;
        Ok(self
            .state
            .borrow()
            .visited
            .last()
            .cloned()
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    fn window_handles(&self) -> PaginaResult<Vec<String>> {
        self.ensure_alive()?;
        Ok(self.state.borrow().windows.clone())
    }

    fn current_window(&self) -> PaginaResult<String> {
        self.ensure_alive()?;
        let state = self.state.borrow();
        state
            .windows
            .get(state.current_window)
            .cloned()
            .ok_or_else(|| PaginaError::driver("current window has been closed"))
    }

    fn switch_to_window(&self, handle: &str) -> PaginaResult<()> {
        self.ensure_alive()?;
        let mut state = self.state.borrow_mut();
        match state.windows.iter().position(|h| h == handle) {
            Some(index) => {
                state.current_window = index;
                Ok(())
            }
            None => Err(PaginaError::driver(format!(
                "no window with handle '{handle}'"
            ))),
        }
    }

    fn quit(&self) -> PaginaResult<()> {
        self.state.borrow_mut().quit = true;
        Ok(())
    }
}
