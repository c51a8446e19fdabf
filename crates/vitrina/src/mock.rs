//! Scripted in-memory driver for exercising page objects without a browser.
//!
//! The mock models a page as a flat map from selector expression to element
//! state, plus interaction hooks and deferred mutations. Hooks fire when a
//! page object clicks/types/presses-enter on a selector; deferred mutations
//! fire after a number of observations, which lets tests script the
//! "asynchronously updating DOM" that the wait primitive polls against.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::{VitrinaError, VitrinaResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Hook = Arc<dyn Fn(&mut PageState) + Send + Sync>;
type TypeHook = Arc<dyn Fn(&mut PageState, &str) + Send + Sync>;

/// State of one mocked element
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Whether the element is attached to the document
    pub present: bool,
    /// Whether the element is visible and enabled
    pub clickable: bool,
    /// Number of elements the selector matches
    pub matches: usize,
    /// Text content
    pub text: String,
    /// Current input value
    pub value: String,
    /// Attribute map; absence of a key models an absent attribute
    pub attributes: HashMap<String, String>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            present: true,
            clickable: false,
            matches: 1,
            text: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
        }
    }
}

impl MockElement {
    /// A present, non-clickable element
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark clickable
    #[must_use]
    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    /// Mark absent
    #[must_use]
    pub fn absent(mut self) -> Self {
        self.present = false;
        self.matches = 0;
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the match count
    #[must_use]
    pub fn with_matches(mut self, matches: usize) -> Self {
        self.matches = matches;
        self
    }
}

/// Mutable page snapshot the hooks operate on
#[derive(Debug, Default)]
pub struct PageState {
    /// Current URL
    pub url: String,
    /// `document.readyState == "complete"`
    pub ready: bool,
    /// Serialized markup returned by `page_source`
    pub source: String,
    elements: HashMap<String, MockElement>,
}

impl PageState {
    /// Element state for `selector`, created present-by-default on first use
    pub fn element_mut(&mut self, selector: &str) -> &mut MockElement {
        self.elements.entry(selector.to_string()).or_default()
    }

    fn element(&self, selector: &str) -> Option<&MockElement> {
        self.elements.get(selector)
    }

    /// Remove an attribute, modeling e.g. a `disabled` flag being cleared
    pub fn remove_attribute(&mut self, selector: &str, name: &str) {
        self.element_mut(selector).attributes.remove(name);
    }
}

struct Deferred {
    remaining: usize,
    apply: Hook,
}

/// In-memory [`Driver`] with scripted behavior
pub struct MockDriver {
    state: Mutex<PageState>,
    on_click: Mutex<HashMap<String, Vec<Hook>>>,
    on_type: Mutex<HashMap<String, Vec<TypeHook>>>,
    on_enter: Mutex<HashMap<String, Vec<Hook>>>,
    deferred: Mutex<Vec<Deferred>>,
    last_scroll: Mutex<Option<(i64, i64)>>,
    quit_called: AtomicBool,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver").finish_non_exhaustive()
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create an empty mock page (ready, blank URL)
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                ready: true,
                ..PageState::default()
            }),
            on_click: Mutex::new(HashMap::new()),
            on_type: Mutex::new(HashMap::new()),
            on_enter: Mutex::new(HashMap::new()),
            deferred: Mutex::new(Vec::new()),
            last_scroll: Mutex::new(None),
            quit_called: AtomicBool::new(false),
        }
    }

    /// Mutate the page state directly (test setup)
    pub fn with_state(self, setup: impl FnOnce(&mut PageState)) -> Self {
        setup(&mut self.state.lock().expect("mock state poisoned"));
        self
    }

    /// Install an element under `selector`
    pub fn with_element(self, selector: &str, element: MockElement) -> Self {
        self.state
            .lock()
            .expect("mock state poisoned")
            .elements
            .insert(selector.to_string(), element);
        self
    }

    /// Script a reaction to a click on `selector`
    pub fn on_click(self, selector: &str, hook: impl Fn(&mut PageState) + Send + Sync + 'static) -> Self {
        self.on_click
            .lock()
            .expect("mock hooks poisoned")
            .entry(selector.to_string())
            .or_default()
            .push(Arc::new(hook));
        self
    }

    /// Script a reaction to text typed into `selector`; the hook receives
    /// the element's full value after the keystrokes
    pub fn on_type(
        self,
        selector: &str,
        hook: impl Fn(&mut PageState, &str) + Send + Sync + 'static,
    ) -> Self {
        self.on_type
            .lock()
            .expect("mock hooks poisoned")
            .entry(selector.to_string())
            .or_default()
            .push(Arc::new(hook));
        self
    }

    /// Script a reaction to an Enter keypress on `selector`
    pub fn on_enter(self, selector: &str, hook: impl Fn(&mut PageState) + Send + Sync + 'static) -> Self {
        self.on_enter
            .lock()
            .expect("mock hooks poisoned")
            .entry(selector.to_string())
            .or_default()
            .push(Arc::new(hook));
        self
    }

    /// Apply a mutation after `observations` further driver observations.
    /// This is how tests model DOM state that settles while a wait polls.
    pub fn after_observations(
        self,
        observations: usize,
        hook: impl Fn(&mut PageState) + Send + Sync + 'static,
    ) -> Self {
        self.deferred.lock().expect("mock hooks poisoned").push(Deferred {
            remaining: observations,
            apply: Arc::new(hook),
        });
        self
    }

    /// Last `scroll_by` offsets, if any
    #[must_use]
    pub fn scrolled(&self) -> Option<(i64, i64)> {
        *self.last_scroll.lock().expect("mock state poisoned")
    }

    /// Whether `quit` was invoked
    #[must_use]
    pub fn quit_was_called(&self) -> bool {
        self.quit_called.load(Ordering::SeqCst)
    }

    /// Count down deferred mutations; fires those whose budget is spent
    fn tick(&self) {
        let mut due = Vec::new();
        {
            let mut deferred = self.deferred.lock().expect("mock hooks poisoned");
            for entry in deferred.iter_mut() {
                if entry.remaining > 0 {
                    entry.remaining -= 1;
                }
            }
            let mut index = 0;
            while index < deferred.len() {
                if deferred[index].remaining == 0 {
                    due.push(deferred.swap_remove(index).apply);
                } else {
                    index += 1;
                }
            }
        }
        if !due.is_empty() {
            let mut state = self.state.lock().expect("mock state poisoned");
            for hook in due {
                hook(&mut state);
            }
        }
    }

    fn hooks_for(&self, map: &Mutex<HashMap<String, Vec<Hook>>>, selector: &str) -> Vec<Hook> {
        map.lock()
            .expect("mock hooks poisoned")
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    fn run_hooks(&self, map: &Mutex<HashMap<String, Vec<Hook>>>, selector: &str) {
        let hooks = self.hooks_for(map, selector);
        let mut state = self.state.lock().expect("mock state poisoned");
        for hook in hooks {
            hook(&mut state);
        }
    }

    fn require_present(&self, locator: &Locator) -> VitrinaResult<()> {
        let state = self.state.lock().expect("mock state poisoned");
        match state.element(locator.selector()) {
            Some(element) if element.present => Ok(()),
            _ => Err(VitrinaError::ElementNotFound {
                selector: locator.selector().to_string(),
            }),
        }
    }
}

impl Driver for MockDriver {
    fn navigate(&self, url: &str) -> VitrinaResult<()> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.url = url.to_string();
        state.ready = true;
        Ok(())
    }

    fn current_url(&self) -> VitrinaResult<String> {
        self.tick();
        Ok(self.state.lock().expect("mock state poisoned").url.clone())
    }

    fn page_source(&self) -> VitrinaResult<String> {
        self.tick();
        Ok(self.state.lock().expect("mock state poisoned").source.clone())
    }

    fn document_ready(&self) -> VitrinaResult<bool> {
        self.tick();
        Ok(self.state.lock().expect("mock state poisoned").ready)
    }

    fn is_present(&self, locator: &Locator) -> VitrinaResult<bool> {
        self.tick();
        let state = self.state.lock().expect("mock state poisoned");
        Ok(state
            .element(locator.selector())
            .is_some_and(|e| e.present))
    }

    fn count(&self, locator: &Locator) -> VitrinaResult<usize> {
        self.tick();
        let state = self.state.lock().expect("mock state poisoned");
        Ok(state
            .element(locator.selector())
            .map_or(0, |e| if e.present { e.matches } else { 0 }))
    }

    fn is_clickable(&self, locator: &Locator) -> VitrinaResult<bool> {
        self.tick();
        let state = self.state.lock().expect("mock state poisoned");
        Ok(state
            .element(locator.selector())
            .is_some_and(|e| e.present && e.clickable))
    }

    fn text(&self, locator: &Locator) -> VitrinaResult<String> {
        self.tick();
        let state = self.state.lock().expect("mock state poisoned");
        state
            .element(locator.selector())
            .filter(|e| e.present)
            .map(|e| e.text.clone())
            .ok_or_else(|| VitrinaError::ElementNotFound {
                selector: locator.selector().to_string(),
            })
    }

    fn attribute(&self, locator: &Locator, name: &str) -> VitrinaResult<Option<String>> {
        self.tick();
        let state = self.state.lock().expect("mock state poisoned");
        state
            .element(locator.selector())
            .filter(|e| e.present)
            .map(|e| e.attributes.get(name).cloned())
            .ok_or_else(|| VitrinaError::ElementNotFound {
                selector: locator.selector().to_string(),
            })
    }

    fn click(&self, locator: &Locator) -> VitrinaResult<()> {
        self.require_present(locator)?;
        {
            let state = self.state.lock().expect("mock state poisoned");
            let clickable = state
                .element(locator.selector())
                .is_some_and(|e| e.clickable);
            if !clickable {
                return Err(VitrinaError::driver(format!(
                    "element not clickable: {}",
                    locator.selector()
                )));
            }
        }
        self.run_hooks(&self.on_click, locator.selector());
        Ok(())
    }

    fn click_js(&self, locator: &Locator) -> VitrinaResult<()> {
        // DOM-level click fires even when native hit-testing would be
        // intercepted, so clickability is not checked.
        self.require_present(locator)?;
        self.run_hooks(&self.on_click, locator.selector());
        Ok(())
    }

    fn clear(&self, locator: &Locator) -> VitrinaResult<()> {
        self.require_present(locator)?;
        let mut state = self.state.lock().expect("mock state poisoned");
        state.element_mut(locator.selector()).value.clear();
        Ok(())
    }

    fn type_text(&self, locator: &Locator, text: &str) -> VitrinaResult<()> {
        self.require_present(locator)?;
        let value = {
            let mut state = self.state.lock().expect("mock state poisoned");
            let element = state.element_mut(locator.selector());
            element.value.push_str(text);
            element.value.clone()
        };
        let hooks: Vec<TypeHook> = self
            .on_type
            .lock()
            .expect("mock hooks poisoned")
            .get(locator.selector())
            .cloned()
            .unwrap_or_default();
        let mut state = self.state.lock().expect("mock state poisoned");
        for hook in hooks {
            hook(&mut state, &value);
        }
        Ok(())
    }

    fn press_enter(&self, locator: &Locator) -> VitrinaResult<()> {
        self.require_present(locator)?;
        self.run_hooks(&self.on_enter, locator.selector());
        Ok(())
    }

    fn scroll_by(&self, x: i64, y: i64) -> VitrinaResult<()> {
        *self.last_scroll.lock().expect("mock state poisoned") = Some((x, y));
        Ok(())
    }

    fn quit(&self) -> VitrinaResult<()> {
        self.quit_called.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_element_reports_not_present() {
        let driver = MockDriver::new().with_element("button", MockElement::new().absent());
        assert!(!driver.is_present(&Locator::css("button")).unwrap());
        assert_eq!(driver.count(&Locator::css("button")).unwrap(), 0);
    }

    #[test]
    fn test_unknown_selector_text_errors() {
        let driver = MockDriver::new();
        let result = driver.text(&Locator::css(".missing"));
        assert!(matches!(result, Err(VitrinaError::ElementNotFound { .. })));
    }

    #[test]
    fn test_click_requires_clickability_but_js_click_does_not() {
        let driver = MockDriver::new().with_element("button", MockElement::new());
        let locator = Locator::css("button");
        assert!(driver.click(&locator).is_err());
        assert!(driver.click_js(&locator).is_ok());
    }

    #[test]
    fn test_click_hook_mutates_state() {
        let driver = MockDriver::new()
            .with_element("button", MockElement::new().clickable())
            .with_element(".badge", MockElement::new())
            .on_click("button", |state| {
                state.element_mut(".badge").text = "1".to_string();
            });
        driver.click(&Locator::css("button")).unwrap();
        assert_eq!(driver.text(&Locator::css(".badge")).unwrap(), "1");
    }

    #[test]
    fn test_type_hook_sees_accumulated_value() {
        let driver = MockDriver::new()
            .with_element("input", MockElement::new())
            .on_type("input", |state, value| {
                if value.len() >= 3 {
                    state.remove_attribute("button.submit", "disabled");
                }
            })
            .with_element(
                "button.submit",
                MockElement::new().with_attribute("disabled", "true"),
            );
        let input = Locator::css("input");
        driver.type_text(&input, "12").unwrap();
        assert!(driver
            .attribute(&Locator::css("button.submit"), "disabled")
            .unwrap()
            .is_some());
        driver.type_text(&input, "3").unwrap();
        assert!(driver
            .attribute(&Locator::css("button.submit"), "disabled")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_deferred_mutation_fires_after_observations() {
        let driver = MockDriver::new()
            .with_element(".counter", MockElement::new())
            .after_observations(3, |state| {
                state.element_mut(".counter").text = "2".to_string();
            });
        let counter = Locator::css(".counter");
        assert_eq!(driver.text(&counter).unwrap(), "");
        assert_eq!(driver.text(&counter).unwrap(), "");
        assert_eq!(driver.text(&counter).unwrap(), "2");
    }

    #[test]
    fn test_clear_then_type_replaces_value() {
        let driver = MockDriver::new().with_element("input", MockElement::new());
        let input = Locator::css("input");
        driver.type_text(&input, "old").unwrap();
        driver.clear(&input).unwrap();
        driver.type_text(&input, "new").unwrap();
        let state = driver.state.lock().unwrap();
        assert_eq!(state.element("input").unwrap().value, "new");
    }

    #[test]
    fn test_navigate_and_quit_bookkeeping() {
        let driver = MockDriver::new();
        driver.navigate("https://example.test/").unwrap();
        assert_eq!(driver.current_url().unwrap(), "https://example.test/");
        driver.quit().unwrap();
        assert!(driver.quit_was_called());
    }
}
