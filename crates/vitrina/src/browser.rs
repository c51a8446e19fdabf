//! Real browser control over the Chrome DevTools Protocol.
//!
//! Compiled only with the `browser` feature. The driver owns a
//! current-thread tokio runtime and drives one CDP page through it, so the
//! [`Driver`] surface stays synchronous and blocking like the rest of the
//! harness. Element access goes through evaluated JavaScript rendered from
//! [`Locator`], which covers CSS and XPath uniformly.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::{VitrinaError, VitrinaResult};
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Path to a chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn with_window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// CDP-backed [`Driver`]: one chromium process, one page, blocking calls
pub struct CdpDriver {
    runtime: Runtime,
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    #[allow(dead_code)]
    handler: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for CdpDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpDriver").finish_non_exhaustive()
    }
}

impl CdpDriver {
    /// Launch a browser and open a blank page
    pub fn launch(config: BrowserConfig) -> VitrinaResult<Self> {
        let runtime = Runtime::new()?;

        let mut builder = CdpConfig::builder()
            .window_size(config.window_width, config.window_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(VitrinaError::driver)?;

        let (browser, mut handler_stream, page) = runtime.block_on(async {
            let (browser, mut stream) = CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| VitrinaError::driver(e.to_string()))?;
            // The handler stream must be polled for the connection to make
            // progress; hand it to a task on the same runtime.
            let page = loop {
                tokio::select! {
                    page = browser.new_page("about:blank") => {
                        break page.map_err(|e| VitrinaError::driver(e.to_string()))?;
                    }
                    event = stream.next() => {
                        if event.is_none() {
                            return Err(VitrinaError::driver("browser handler closed"));
                        }
                    }
                }
            };
            Ok::<_, VitrinaError>((browser, stream, page))
        })?;

        let handler = runtime.spawn(async move {
            while let Some(event) = handler_stream.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            runtime,
            browser: Mutex::new(browser),
            page,
            handler,
        })
    }

    fn eval<T: serde::de::DeserializeOwned>(&self, expression: String) -> VitrinaResult<T> {
        self.runtime.block_on(async {
            self.page
                .evaluate(expression)
                .await
                .map_err(|e| VitrinaError::driver(e.to_string()))?
                .into_value::<T>()
                .map_err(|e| VitrinaError::driver(e.to_string()))
        })
    }

    fn eval_unit(&self, expression: String) -> VitrinaResult<()> {
        self.runtime.block_on(async {
            self.page
                .evaluate(expression)
                .await
                .map(|_| ())
                .map_err(|e| VitrinaError::driver(e.to_string()))
        })
    }

    /// JS expression resolving the locator, with a `null` guard that throws
    /// a recognizable marker when the element is missing
    fn element_expr(locator: &Locator, body: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return null; return ({body}); }})()",
            locator.to_js_query()
        )
    }
}

impl Driver for CdpDriver {
    fn navigate(&self, url: &str) -> VitrinaResult<()> {
        self.runtime.block_on(async {
            self.page
                .goto(url)
                .await
                .map_err(|e| VitrinaError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        })
    }

    fn current_url(&self) -> VitrinaResult<String> {
        self.runtime.block_on(async {
            Ok(self
                .page
                .url()
                .await
                .map_err(|e| VitrinaError::driver(e.to_string()))?
                .unwrap_or_default())
        })
    }

    fn page_source(&self) -> VitrinaResult<String> {
        self.runtime.block_on(async {
            self.page
                .content()
                .await
                .map_err(|e| VitrinaError::driver(e.to_string()))
        })
    }

    fn document_ready(&self) -> VitrinaResult<bool> {
        self.eval("document.readyState === 'complete'".to_string())
    }

    fn is_present(&self, locator: &Locator) -> VitrinaResult<bool> {
        self.eval(format!("({}) !== null", locator.to_js_query()))
    }

    fn count(&self, locator: &Locator) -> VitrinaResult<usize> {
        let count: u64 = self.eval(locator.to_js_count_query())?;
        Ok(count as usize)
    }

    fn is_clickable(&self, locator: &Locator) -> VitrinaResult<bool> {
        let expr = Self::element_expr(
            locator,
            "!el.disabled && el.getClientRects().length > 0",
        );
        Ok(self.eval::<Option<bool>>(expr)?.unwrap_or(false))
    }

    fn text(&self, locator: &Locator) -> VitrinaResult<String> {
        let expr = Self::element_expr(locator, "el.textContent");
        self.eval::<Option<String>>(expr)?
            .ok_or_else(|| VitrinaError::ElementNotFound {
                selector: locator.selector().to_string(),
            })
    }

    fn attribute(&self, locator: &Locator, name: &str) -> VitrinaResult<Option<String>> {
        if !self.is_present(locator)? {
            return Err(VitrinaError::ElementNotFound {
                selector: locator.selector().to_string(),
            });
        }
        let name_js = serde_json::to_string(name)?;
        let expr = Self::element_expr(locator, &format!("el.getAttribute({name_js})"));
        self.eval(expr)
    }

    fn click(&self, locator: &Locator) -> VitrinaResult<()> {
        // Scroll into view first so the click lands inside the viewport.
        let clicked: Option<bool> = self.eval(Self::element_expr(
            locator,
            "(el.scrollIntoView({block: 'center'}), el.click(), true)",
        ))?;
        if clicked.is_none() {
            return Err(VitrinaError::ElementNotFound {
                selector: locator.selector().to_string(),
            });
        }
        Ok(())
    }

    fn click_js(&self, locator: &Locator) -> VitrinaResult<()> {
        let clicked: Option<bool> =
            self.eval(Self::element_expr(locator, "(el.click(), true)"))?;
        if clicked.is_none() {
            return Err(VitrinaError::ElementNotFound {
                selector: locator.selector().to_string(),
            });
        }
        Ok(())
    }

    fn clear(&self, locator: &Locator) -> VitrinaResult<()> {
        let expr = Self::element_expr(
            locator,
            "(el.value = '', el.dispatchEvent(new Event('input', {bubbles: true})), true)",
        );
        self.eval_unit(expr)
    }

    fn type_text(&self, locator: &Locator, text: &str) -> VitrinaResult<()> {
        let text_js = serde_json::to_string(text)?;
        let expr = Self::element_expr(
            locator,
            &format!(
                "(el.value = el.value + {text_js}, el.dispatchEvent(new Event('input', {{bubbles: true}})), true)"
            ),
        );
        self.eval_unit(expr)
    }

    fn press_enter(&self, locator: &Locator) -> VitrinaResult<()> {
        let expr = Self::element_expr(
            locator,
            "(['keydown', 'keypress', 'keyup'].forEach(t => el.dispatchEvent(new KeyboardEvent(t, {key: 'Enter', code: 'Enter', bubbles: true}))), el.form && el.form.requestSubmit(), true)",
        );
        self.eval_unit(expr)
    }

    fn scroll_by(&self, x: i64, y: i64) -> VitrinaResult<()> {
        self.eval_unit(format!("window.scrollBy({x}, {y})"))
    }

    fn quit(&self) -> VitrinaResult<()> {
        self.runtime.block_on(async {
            let mut browser = self.browser.lock().await;
            browser
                .close()
                .await
                .map_err(|e| VitrinaError::driver(e.to_string()))?;
            Ok(())
        })
    }
}
