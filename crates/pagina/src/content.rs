//! Content references: lazy, optionally cached, presence-aware handles to
//! declared page content.
//!
//! A reference is created eagerly at module/page construction time, but the
//! underlying query only ever runs when the reference is resolved. By
//! default every resolution re-runs the initializer, tolerating content the
//! page replaces after declaration; `cached()` pins the first successful
//! value for content known to be stable; `required()` turns the empty
//! sentinel into a hard failure naming the locator.

use std::cell::RefCell;
use std::rc::Rc;

use crate::element::{Element, ElementList, Resolved};
use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};
use crate::truthy::{Evaluated, Truthy};

/// A value a content reference can resolve to.
///
/// The only specialized behavior is `required` checking: values that can be
/// an empty sentinel report the locator that matched nothing.
pub trait ContentValue: Clone {
    /// Locator of the empty sentinel, if this value is one
    fn absent_locator(&self) -> Option<&Locator> {
        None
    }
}

impl ContentValue for Element {
    fn absent_locator(&self) -> Option<&Locator> {
        (!self.is_present()).then(|| self.locator())
    }
}

impl ContentValue for ElementList {
    fn absent_locator(&self) -> Option<&Locator> {
        self.is_empty().then(|| self.locator())
    }
}

impl ContentValue for Resolved {
    fn absent_locator(&self) -> Option<&Locator> {
        match self {
            Self::Single(element) => element.absent_locator(),
            Self::List(list) => list.absent_locator(),
        }
    }
}

impl ContentValue for String {}

/// Lazy reference to declared content.
///
/// Resolution runs the initializer; the `cached` and `required` flags
/// compose independently, and the required check runs before a value is
/// cached, so a cached reference never stores a sentinel it would have
/// rejected.
pub struct Content<T> {
    init: Rc<dyn Fn() -> PaginaResult<T>>,
    cached_value: Rc<RefCell<Option<T>>>,
    cache: bool,
    required: bool,
}

impl<T> Clone for Content<T> {
    fn clone(&self) -> Self {
        Self {
            init: Rc::clone(&self.init),
            cached_value: Rc::clone(&self.cached_value),
            cache: self.cache,
            required: self.required,
        }
    }
}

impl<T> std::fmt::Debug for Content<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Content")
            .field("cache", &self.cache)
            .field("required", &self.required)
            .field("populated", &self.cached_value.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl<T: ContentValue> Content<T> {
    /// Declare content backed by `init`
    pub fn new(init: impl Fn() -> PaginaResult<T> + 'static) -> Self {
        Self {
            init: Rc::new(init),
            cached_value: Rc::new(RefCell::new(None)),
            cache: false,
            required: false,
        }
    }

    /// Pin the first successful resolution for the lifetime of the owning
    /// page or module
    #[must_use]
    pub fn cached(mut self) -> Self {
        self.cache = true;
        self
    }

    /// Treat the empty sentinel as a hard failure
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Resolve the reference.
    ///
    /// # Errors
    ///
    /// [`PaginaError::RequiredContentAbsent`] when a `required` reference
    /// resolves to an empty sentinel; initializer errors propagate
    /// unchanged.
    pub fn get(&self) -> PaginaResult<T> {
        if self.cache {
            if let Some(value) = self.cached_value.borrow().as_ref() {
                return Ok(value.clone());
            }
            let value = self.checked_init()?;
            *self.cached_value.borrow_mut() = Some(value.clone());
            Ok(value)
        } else {
            self.checked_init()
        }
    }

    fn checked_init(&self) -> PaginaResult<T> {
        let value = (self.init)()?;
        if self.required {
            if let Some(locator) = value.absent_locator() {
                return Err(PaginaError::RequiredContentAbsent {
                    selector: locator.to_string(),
                });
            }
        }
        Ok(value)
    }
}

impl<T: ContentValue> ContentValue for Content<T> {}

impl<T: ContentValue + Truthy> Truthy for Content<T> {
    fn evaluate(&self) -> Evaluated {
        self.get().map_or(Evaluated::Absent, |value| value.evaluate())
    }
}
