//! Cart page object: adding, opening, and deleting from the cart.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::VitrinaResult;
use crate::wait::Wait;

/// Page object for the buy button, cart icon and cart contents.
#[derive(Debug)]
pub struct AddToCart<'d, D: Driver> {
    driver: &'d D,
    wait: Wait,
    buy_button: Locator,
    cart_icon: Locator,
    cart_counter: Locator,
    delete_button: Locator,
    deleted_notice: Locator,
}

impl<'d, D: Driver> AddToCart<'d, D> {
    /// Bind the page object to a live driver
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            wait: Wait::new(),
            buy_button: Locator::xpath(
                "(//button[contains(@class, 'product-buttons__main-action')])[1]",
            ),
            cart_icon: Locator::xpath("//button[@aria-label='Корзина']"),
            cart_counter: Locator::css(".header-controls__btn .chg-indicator"),
            delete_button: Locator::css("button.cart-item__delete-button"),
            deleted_notice: Locator::css(".cart-item-deleted__title"),
        }
    }

    /// Add the first listed product to the cart.
    ///
    /// Scrolls the buy button into reach, waits for it to become clickable
    /// and clicks it at the DOM level: product cards carry hover overlays
    /// that intercept native clicks. The action is complete only once the
    /// cart-counter badge text turns non-empty, which is the join point
    /// proving the asynchronous cart update landed.
    pub fn add_product_to_cart(&self) -> VitrinaResult<()> {
        tracing::debug!("add product to cart via buy button");
        self.driver.scroll_by(0, 300)?;
        self.wait.until_true("buy button clickable", || {
            self.driver.is_clickable(&self.buy_button).unwrap_or(false)
        })?;
        self.driver.click_js(&self.buy_button)?;

        self.wait.until_true("cart counter text non-empty", || {
            self.driver
                .text(&self.cart_counter)
                .map(|text| !text.trim().is_empty())
                .unwrap_or(false)
        })
    }

    /// Open the cart via the header icon
    pub fn open_cart(&self) -> VitrinaResult<()> {
        tracing::debug!("open cart");
        self.driver.click(&self.cart_icon)
    }

    /// Delete the first cart item
    pub fn delete_from_cart(&self) -> VitrinaResult<()> {
        tracing::debug!("delete from cart");
        self.wait.until_true("delete control clickable", || {
            self.driver.is_clickable(&self.delete_button).unwrap_or(false)
        })?;
        self.driver.click(&self.delete_button)
    }

    /// Current cart-counter badge text, trimmed
    pub fn counter_text(&self) -> VitrinaResult<String> {
        Ok(self.driver.text(&self.cart_counter)?.trim().to_string())
    }

    /// Wait for the "item deleted" notice and return its text
    pub fn wait_for_deleted_notice(&self) -> VitrinaResult<String> {
        self.wait.until("item-deleted notice present", || {
            self.driver.text(&self.deleted_notice).ok()
        })
    }
}
