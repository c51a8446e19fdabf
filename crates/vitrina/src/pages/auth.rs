//! Auth modal page object.
//!
//! Validation-driven enabling of the "get code" control is asserted by the
//! caller; the page object only drives the form and exposes the control's
//! locator for those assertions.

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::VitrinaResult;
use crate::wait::Wait;

/// Page object for the phone-based auth modal
#[derive(Debug)]
pub struct AuthPage<'d, D: Driver> {
    driver: &'d D,
    wait: Wait,
    login_button: Locator,
    phone_input: Locator,
    get_code_button: Locator,
}

impl<'d, D: Driver> AuthPage<'d, D> {
    /// Bind the page object to a live driver
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            wait: Wait::new(),
            login_button: Locator::css("button.header-controls__btn[aria-label='Меню профиля']"),
            phone_input: Locator::css("input#tid-input"),
            get_code_button: Locator::css("button.auth-modal-content__button"),
        }
    }

    /// Open the auth modal via the profile-menu trigger
    pub fn open_auth_form(&self) -> VitrinaResult<()> {
        tracing::debug!("open auth form");
        self.driver.click(&self.login_button)
    }

    /// Wait for the phone input to appear, clear it and type `phone`
    pub fn enter_phone_number(&self, phone: &str) -> VitrinaResult<()> {
        tracing::debug!(phone, "enter phone number");
        self.wait.until_true("phone input present", || {
            self.driver.is_present(&self.phone_input).unwrap_or(false)
        })?;
        self.driver.clear(&self.phone_input)?;
        self.driver.type_text(&self.phone_input, phone)
    }

    /// Locator of the "get code" control, for caller-side assertions
    pub fn get_code_button(&self) -> &Locator {
        &self.get_code_button
    }

    /// Whether the "get code" control currently carries no `disabled`
    /// attribute
    pub fn get_code_enabled(&self) -> VitrinaResult<bool> {
        Ok(self
            .driver
            .attribute(&self.get_code_button, "disabled")?
            .is_none())
    }

    /// Wait until the "get code" control becomes clickable
    pub fn wait_get_code_clickable(&self) -> VitrinaResult<()> {
        self.wait.until_true("get-code button clickable", || {
            self.driver
                .is_clickable(&self.get_code_button)
                .unwrap_or(false)
        })
    }
}
