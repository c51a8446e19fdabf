//! Locator abstraction: an immutable (strategy, selector) pair.
//!
//! A locator identifies zero-or-more elements in a remote document. Page
//! objects declare their locators once at construction and never mutate
//! them; every lookup goes through the [`crate::driver::Driver`] seam.

use serde::{Deserialize, Serialize};

/// Strategy for locating DOM elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// CSS selector (e.g., `button.primary`)
    Css,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// Wire name of the strategy, as WebDriver-style tooling spells it
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css selector",
            Self::XPath => "xpath",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable strategy + selector pair identifying page elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    selector: String,
}

impl Locator {
    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            selector: selector.into(),
        }
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: selector.into(),
        }
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the selector expression
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Render a JavaScript expression resolving to the first matching
    /// element (or `null`). Used by the CDP driver.
    #[must_use]
    pub fn to_js_query(&self) -> String {
        match self.strategy {
            Strategy::Css => format!("document.querySelector({:?})", self.selector),
            Strategy::XPath => format!(
                "document.evaluate({:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                self.selector
            ),
        }
    }

    /// Render a JavaScript expression resolving to the number of matches
    #[must_use]
    pub fn to_js_count_query(&self) -> String {
        match self.strategy {
            Strategy::Css => format!("document.querySelectorAll({:?}).length", self.selector),
            Strategy::XPath => format!(
                "document.evaluate({:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
                self.selector
            ),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy, self.selector)
    }
}
