//! Locators: how content declarations describe where their elements live.
//!
//! A [`Locator`] pairs a selection strategy (CSS, tag name, XPath) with an
//! expression. Locators are immutable and constructed once per content
//! declaration; the strategies are mutually exclusive variants behind one
//! type, so adding a strategy never changes call sites.

use serde::{Deserialize, Serialize};

/// Selector strategy plus expression for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    /// CSS selector (e.g., `button.primary`)
    Css(String),
    /// Tag-name selector (e.g., `textarea`)
    Tag(String),
    /// XPath selector (e.g., `//div[@id='main']`)
    XPath(String),
}

impl Locator {
    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a tag-name locator
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// The raw selector expression, without the strategy
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Css(s) | Self::Tag(s) | Self::XPath(s) => s,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css '{s}'"),
            Self::Tag(s) => write!(f, "tag '{s}'"),
            Self::XPath(s) => write!(f, "xpath '{s}'"),
        }
    }
}

/// Whether a resolution yields one handle or an ordered sequence.
///
/// Fixed per content declaration. `Single` resolves to the first match in
/// document order (or the empty sentinel), `List` to a possibly empty
/// ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchMode {
    /// First match, or the empty-element sentinel
    #[default]
    Single,
    /// All matches in document order, possibly none
    List,
}
