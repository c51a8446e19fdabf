//! Search page object.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::VitrinaResult;
use crate::wait::{Wait, SEARCH_WAIT_TIMEOUT_MS};

/// Page object for the catalog search area.
///
/// Search results render server-side and land noticeably slower than the
/// rest of the UI, so result waits run on the long 15s budget while URL
/// and readiness waits keep the default one.
#[derive(Debug)]
pub struct SearchPage<'d, D: Driver> {
    driver: &'d D,
    wait: Wait,
    result_wait: Wait,
    search_input: Locator,
    search_button: Locator,
    search_results: Locator,
    product_titles: Locator,
    no_results_stub: Locator,
}

impl<'d, D: Driver> SearchPage<'d, D> {
    /// Bind the page object to a live driver
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            wait: Wait::new(),
            result_wait: Wait::with_timeout_ms(SEARCH_WAIT_TIMEOUT_MS),
            search_input: Locator::css("input[type='search'], .search-form__input, [name='q']"),
            search_button: Locator::css("button.search-form__button-search"),
            search_results: Locator::css(".product-card, .catalog-product, [data-product-id]"),
            product_titles: Locator::css(".product-card__title"),
            no_results_stub: Locator::css(".catalog-stub__title"),
        }
    }

    /// Search the catalog by title and wait for the result page to settle:
    /// URL gains the search marker, document becomes ready, and at least
    /// one result container and one result title are present.
    pub fn search_by_title(&self, title: &str) -> VitrinaResult<()> {
        tracing::debug!(title, "search by title");
        self.result_wait.until_true("search input clickable", || {
            self.driver.is_clickable(&self.search_input).unwrap_or(false)
        })?;
        self.driver.clear(&self.search_input)?;
        self.driver.type_text(&self.search_input, title)?;
        self.driver.click(&self.search_button)?;

        self.wait.until_true("URL contains search-result marker", || {
            self.driver
                .current_url()
                .map(|url| url.contains("search") || url.contains("phrase"))
                .unwrap_or(false)
        })?;
        self.wait.until_true("document ready after search", || {
            self.driver.document_ready().unwrap_or(false)
        })?;
        self.result_wait
            .until_true("search result containers present", || {
                self.driver.is_present(&self.search_results).unwrap_or(false)
            })?;
        self.result_wait
            .until_true("search result titles present", || {
                self.driver.count(&self.product_titles).unwrap_or(0) > 0
            })?;
        Ok(())
    }

    /// Search via keyboard submit, waiting only for document readiness.
    /// The caller asserts the no-results state afterwards.
    pub fn search_negative(&self, title: &str) -> VitrinaResult<()> {
        tracing::debug!(title, "negative search");
        self.result_wait.until_true("search input clickable", || {
            self.driver.is_clickable(&self.search_input).unwrap_or(false)
        })?;
        self.driver.clear(&self.search_input)?;
        self.driver.type_text(&self.search_input, title)?;
        self.driver.press_enter(&self.search_input)?;

        self.wait
            .until_true("document ready after negative search", || {
                self.driver.document_ready().unwrap_or(false)
            })
    }

    /// Wait for the no-results stub to appear and return its text
    pub fn no_results_text(&self) -> VitrinaResult<String> {
        self.wait.until("no-results stub present", || {
            self.driver.text(&self.no_results_stub).ok()
        })
    }
}
