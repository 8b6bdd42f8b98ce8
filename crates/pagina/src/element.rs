//! Resolved content: element handles, empty sentinels, and the selector
//! resolver.
//!
//! Resolution never raises for zero matches. A single-mode query that finds
//! nothing yields an [`Element`] carrying no handle (the empty sentinel), a
//! list-mode query yields an empty [`ElementList`]. Both are first-class
//! values that participate in truthiness evaluation and `required` checking.
//!
//! Resolution is read-only and idempotent; the document may have mutated
//! between two calls, which is the caller's concern, not the resolver's.

use crate::driver::{DriverRef, ElementRef, Point};
use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};

/// A single located element, or the empty sentinel when nothing matched.
#[derive(Debug, Clone)]
pub struct Element {
    locator: Locator,
    handle: Option<ElementRef>,
}

impl Element {
    pub(crate) fn present(locator: Locator, handle: ElementRef) -> Self {
        Self {
            locator,
            handle: Some(handle),
        }
    }

    pub(crate) fn empty(locator: Locator) -> Self {
        Self {
            locator,
            handle: None,
        }
    }

    /// Whether the locator matched anything
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.handle.is_some()
    }

    /// The locator this element was resolved from
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// The underlying driver handle, absent for the empty sentinel
    #[must_use]
    pub fn handle(&self) -> Option<&ElementRef> {
        self.handle.as_ref()
    }

    /// On-page position; `None` for the empty sentinel or an unrendered
    /// element
    #[must_use]
    pub fn location(&self) -> Option<Point> {
        self.handle.as_ref().and_then(|h| h.location())
    }

    /// Visible text content
    ///
    /// # Errors
    ///
    /// [`PaginaError::NoSuchElement`] on the empty sentinel; driver errors
    /// propagate unchanged.
    pub fn text(&self) -> PaginaResult<String> {
        self.require_handle()?.text()
    }

    /// Click the element
    ///
    /// # Errors
    ///
    /// [`PaginaError::NoSuchElement`] on the empty sentinel; driver errors
    /// propagate unchanged.
    pub fn click(&self) -> PaginaResult<()> {
        self.require_handle()?.click()
    }

    /// Value of an attribute, if present on the element
    ///
    /// # Errors
    ///
    /// [`PaginaError::NoSuchElement`] on the empty sentinel; driver errors
    /// propagate unchanged.
    pub fn attribute(&self, name: &str) -> PaginaResult<Option<String>> {
        self.require_handle()?.attribute(name)
    }

    fn require_handle(&self) -> PaginaResult<&ElementRef> {
        self.handle
            .as_ref()
            .ok_or_else(|| PaginaError::NoSuchElement {
                selector: self.locator.to_string(),
            })
    }
}

/// An ordered sequence of located elements, possibly empty.
///
/// An empty list is the list-mode sentinel: a value, not an error.
#[derive(Debug, Clone)]
pub struct ElementList {
    locator: Locator,
    elements: Vec<Element>,
}

impl ElementList {
    pub(crate) fn new(locator: Locator, elements: Vec<Element>) -> Self {
        Self { locator, elements }
    }

    /// The locator this list was resolved from
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Number of matches
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the locator matched nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `index`, in document order
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// First match in document order
    #[must_use]
    pub fn first(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// Iterate the matches in document order
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a ElementList {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for ElementList {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// Result of a mode-agnostic resolution
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Single-mode result: first match or the empty sentinel
    Single(Element),
    /// List-mode result: ordered matches, possibly none
    List(ElementList),
}

/// One shared raw-query path for both fetch modes.
///
/// A scope constrains the query to descendants of the scope element; an
/// empty-sentinel scope matches nothing. Without a scope the whole current
/// document is queried.
fn raw_query(
    driver: &DriverRef,
    locator: &Locator,
    scope: Option<&Element>,
) -> PaginaResult<Vec<ElementRef>> {
    match scope {
        Some(element) => match element.handle() {
            Some(handle) => handle.query(locator),
            None => Ok(Vec::new()),
        },
        None => driver.query(locator),
    }
}

pub(crate) fn resolve_single(
    driver: &DriverRef,
    locator: Locator,
    scope: Option<&Element>,
) -> PaginaResult<Element> {
    let mut found = raw_query(driver, &locator, scope)?;
    if found.is_empty() {
        Ok(Element::empty(locator))
    } else {
        Ok(Element::present(locator, found.remove(0)))
    }
}

pub(crate) fn resolve_list(
    driver: &DriverRef,
    locator: Locator,
    scope: Option<&Element>,
) -> PaginaResult<ElementList> {
    let found = raw_query(driver, &locator, scope)?;
    let elements = found
        .into_iter()
        .map(|handle| Element::present(locator.clone(), handle))
        .collect();
    Ok(ElementList::new(locator, elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};
    use std::rc::Rc;

    fn driver_with(locator: Locator, elements: Vec<MockElement>) -> DriverRef {
        let mock = MockDriver::new();
        mock.install(locator, elements);
        Rc::new(mock)
    }

    mod single_tests {
        use super::*;

        #[test]
        fn test_no_match_yields_empty_sentinel() {
            let driver: DriverRef = Rc::new(MockDriver::new());
            let element = resolve_single(&driver, Locator::css("#missing"), None).unwrap();
            assert!(!element.is_present());
            assert_eq!(element.locator(), &Locator::css("#missing"));
        }

        #[test]
        fn test_first_match_in_document_order() {
            let driver = driver_with(
                Locator::css("li"),
                vec![MockElement::new("first"), MockElement::new("second")],
            );
            let element = resolve_single(&driver, Locator::css("li"), None).unwrap();
            assert!(element.is_present());
            assert_eq!(element.text().unwrap(), "first");
        }

        #[test]
        fn test_interaction_on_empty_sentinel_fails() {
            let driver: DriverRef = Rc::new(MockDriver::new());
            let element = resolve_single(&driver, Locator::css("#missing"), None).unwrap();
            let err = element.text().unwrap_err();
            assert!(matches!(err, PaginaError::NoSuchElement { .. }));
            assert!(err.to_string().contains("#missing"));
        }

        #[test]
        fn test_empty_sentinel_has_no_location() {
            let driver: DriverRef = Rc::new(MockDriver::new());
            let element = resolve_single(&driver, Locator::css("#missing"), None).unwrap();
            assert!(element.location().is_none());
        }
    }

    mod list_tests {
        use super::*;

        #[test]
        fn test_no_match_yields_empty_list_not_error() {
            let driver: DriverRef = Rc::new(MockDriver::new());
            let list = resolve_list(&driver, Locator::css(".row"), None).unwrap();
            assert!(list.is_empty());
            assert_eq!(list.len(), 0);
        }

        #[test]
        fn test_preserves_document_order() {
            let driver = driver_with(
                Locator::tag("li"),
                vec![
                    MockElement::new("a"),
                    MockElement::new("b"),
                    MockElement::new("c"),
                ],
            );
            let list = resolve_list(&driver, Locator::tag("li"), None).unwrap();
            let texts: Vec<String> = list.iter().map(|e| e.text().unwrap()).collect();
            assert_eq!(texts, vec!["a", "b", "c"]);
        }

        #[test]
        fn test_first_accessor() {
            let driver = driver_with(Locator::tag("li"), vec![MockElement::new("only")]);
            let list = resolve_list(&driver, Locator::tag("li"), None).unwrap();
            assert_eq!(list.first().unwrap().text().unwrap(), "only");
        }
    }

    mod scope_tests {
        use super::*;

        #[test]
        fn test_scoped_query_runs_against_scope_descendants() {
            let child = MockElement::new("inner");
            let parent = MockElement::new("outer").with_child(Locator::css(".inner"), vec![child]);
            let driver = driver_with(Locator::css(".outer"), vec![parent]);

            let scope = resolve_single(&driver, Locator::css(".outer"), None).unwrap();
            let inner = resolve_single(&driver, Locator::css(".inner"), Some(&scope)).unwrap();
            assert_eq!(inner.text().unwrap(), "inner");

            // the same locator at document root matches nothing
            let at_root = resolve_single(&driver, Locator::css(".inner"), None).unwrap();
            assert!(!at_root.is_present());
        }

        #[test]
        fn test_empty_sentinel_scope_matches_nothing() {
            let driver: DriverRef = Rc::new(MockDriver::new());
            let scope = resolve_single(&driver, Locator::css("#gone"), None).unwrap();
            let inside = resolve_single(&driver, Locator::css("a"), Some(&scope)).unwrap();
            assert!(!inside.is_present());
            let list = resolve_list(&driver, Locator::css("a"), Some(&scope)).unwrap();
            assert!(list.is_empty());
        }
    }
}
