//! Abstract browser-automation seam.
//!
//! Page objects never talk to a concrete browser; they talk to this trait.
//! The real implementation ([`crate::browser::CdpDriver`], behind the
//! `browser` feature) drives a Chromium page over CDP; the in-memory
//! [`crate::mock::MockDriver`] backs unit and integration tests.
//!
//! Everything is synchronous and blocking. A driver encapsulates mutable,
//! order-dependent state (the current page), so one instance must not be
//! shared across concurrent tests; isolation is the runner's job.

use crate::locator::Locator;
use crate::result::VitrinaResult;

/// Synchronous browser-automation capability used by page objects.
///
/// Observation methods (`is_present`, `is_clickable`, `text`, `count`,
/// `attribute`, `current_url`, `document_ready`, `page_source`) are safe
/// to call repeatedly from wait probes. Interaction methods assume the
/// page is in the state left by the previous action.
pub trait Driver {
    /// Navigate the page to `url`
    fn navigate(&self, url: &str) -> VitrinaResult<()>;

    /// Current page URL
    fn current_url(&self) -> VitrinaResult<String>;

    /// Full serialized page markup
    fn page_source(&self) -> VitrinaResult<String>;

    /// Whether `document.readyState` is `complete`
    fn document_ready(&self) -> VitrinaResult<bool>;

    /// Whether at least one element matches
    fn is_present(&self, locator: &Locator) -> VitrinaResult<bool>;

    /// Number of matching elements
    fn count(&self, locator: &Locator) -> VitrinaResult<usize>;

    /// Whether the first match is visible and enabled
    fn is_clickable(&self, locator: &Locator) -> VitrinaResult<bool>;

    /// Text content of the first match
    fn text(&self, locator: &Locator) -> VitrinaResult<String>;

    /// Attribute value of the first match, `None` when the attribute is absent
    fn attribute(&self, locator: &Locator, name: &str) -> VitrinaResult<Option<String>>;

    /// Native click on the first match
    fn click(&self, locator: &Locator) -> VitrinaResult<()>;

    /// DOM-level click (`element.click()` in page context), bypassing native
    /// hit-testing. Used where overlays intercept native clicks.
    fn click_js(&self, locator: &Locator) -> VitrinaResult<()>;

    /// Clear the value of the first matching input
    fn clear(&self, locator: &Locator) -> VitrinaResult<()>;

    /// Type `text` into the first matching input
    fn type_text(&self, locator: &Locator, text: &str) -> VitrinaResult<()>;

    /// Send an Enter keypress to the first matching element
    fn press_enter(&self, locator: &Locator) -> VitrinaResult<()>;

    /// Scroll the viewport by the given offsets
    fn scroll_by(&self, x: i64, y: i64) -> VitrinaResult<()>;

    /// Tear the session down. Further calls are invalid.
    fn quit(&self) -> VitrinaResult<()>;
}
