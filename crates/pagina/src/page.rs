//! Pages and modules: named bundles of content declarations.
//!
//! Both take their owning [`Browser`] at construction time; nothing is
//! bound late. A module may carry a default scope, in which case its
//! content helpers resolve inside that scope instead of the document root.

use crate::browser::Browser;
use crate::content::ContentValue;
use crate::element::{Element, ElementList, Resolved};
use crate::locator::Locator;
use crate::result::PaginaResult;
use crate::truthy::{Evaluated, Truthy};

/// A page object: content declarations plus a URL and a verify-at check.
///
/// The verify-at check runs through the wait engine, so "is the browser on
/// this page yet" is itself a polling wait with the usual timeout and
/// diagnostics.
pub trait Page {
    /// The browser this page was constructed with
    fn browser(&self) -> &Browser;

    /// URL of this page, relative to the configured base URL
    fn url(&self) -> String {
        String::new()
    }

    /// Verify-at predicate: is the browser currently displaying this page?
    ///
    /// # Errors
    ///
    /// Driver errors are treated as not-yet-satisfied by the surrounding
    /// wait.
    fn at(&self) -> PaginaResult<bool> {
        Ok(true)
    }

    /// Page name for diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Poll [`Page::at`] until satisfied, using the named preset or the
    /// default
    ///
    /// # Errors
    ///
    /// [`crate::PaginaError::WaitTimeout`] when the page never reports
    /// itself displayed; [`crate::PaginaError::PresetNotFound`] for an
    /// unknown preset name.
    fn verify_at(&self, preset: Option<&str>) -> PaginaResult<()> {
        let desc = format!("at-check of {}", self.name());
        self.browser()
            .wait_for(preset, Some(&desc), || self.at())
            .map(|_| ())
    }
}

/// A reusable bundle of content declarations with an optional default
/// scope.
///
/// Page and module types hold one of these and declare their content
/// through it; the scope (if any) constrains every declaration to a
/// subtree of the document.
#[derive(Debug, Clone)]
pub struct Module {
    browser: Browser,
    scope: Option<Element>,
}

impl Module {
    /// Create a module resolving against the document root
    #[must_use]
    pub const fn new(browser: Browser) -> Self {
        Self {
            browser,
            scope: None,
        }
    }

    /// Create a module resolving inside `scope`
    #[must_use]
    pub const fn scoped(browser: Browser, scope: Element) -> Self {
        Self {
            browser,
            scope: Some(scope),
        }
    }

    /// The owning browser
    #[must_use]
    pub const fn browser(&self) -> &Browser {
        &self.browser
    }

    /// The default scope, if any
    #[must_use]
    pub const fn scope(&self) -> Option<&Element> {
        self.scope.as_ref()
    }

    /// First CSS match inside the default scope
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn css(&self, selector: &str) -> PaginaResult<Element> {
        self.browser.css(selector, self.scope.as_ref())
    }

    /// All CSS matches inside the default scope
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn css_list(&self, selector: &str) -> PaginaResult<ElementList> {
        self.browser.css_list(selector, self.scope.as_ref())
    }

    /// First tag-name match inside the default scope
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn tag(&self, name: &str) -> PaginaResult<Element> {
        self.browser.tag(name, self.scope.as_ref())
    }

    /// All tag-name matches inside the default scope
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn tag_list(&self, name: &str) -> PaginaResult<ElementList> {
        self.browser.tag_list(name, self.scope.as_ref())
    }

    /// First XPath match inside the default scope
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn xpath(&self, expression: &str) -> PaginaResult<Element> {
        self.browser.xpath(expression, self.scope.as_ref())
    }

    /// All XPath matches inside the default scope
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn xpath_list(&self, expression: &str) -> PaginaResult<ElementList> {
        self.browser.xpath_list(expression, self.scope.as_ref())
    }

    /// Mode-agnostic resolution inside the default scope, using the
    /// configured default fetch mode
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn find(&self, locator: Locator) -> PaginaResult<Resolved> {
        self.browser.find(locator, self.scope.as_ref())
    }

    /// Wait inside this module, delegating to the browser's wait engine
    ///
    /// # Errors
    ///
    /// Same contract as [`Browser::wait_for`].
    pub fn wait_for<T, F>(
        &self,
        preset: Option<&str>,
        desc: Option<&str>,
        probe: F,
    ) -> PaginaResult<T>
    where
        T: Truthy,
        F: FnMut() -> PaginaResult<T>,
    {
        self.browser.wait_for(preset, desc, probe)
    }
}

impl Truthy for Module {
    fn evaluate(&self) -> Evaluated {
        self.scope
            .as_ref()
            .map_or(Evaluated::Opaque, Truthy::evaluate)
    }
}

impl ContentValue for Module {}
