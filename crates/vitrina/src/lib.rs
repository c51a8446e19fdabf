//! Vitrina: page-object E2E harness for a retail storefront.
//!
//! The harness validates a storefront's cart, search and authentication
//! flows through two channels: direct HTTP calls against the cart API and
//! browser-driven UI interaction.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     VITRINA Architecture                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  test case ──► CartApi ──► CookieProvisioner ──► HTTP        │
//! │  test case ──► PageObject ──► Wait ──► Driver ──► browser    │
//! │                (Search/Cart/Auth)      (CDP or mock)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Test bodies, fixtures and reporting live outside this crate; it
//! provides the session client, the explicit-wait primitive, the locator
//! and driver seams, and the three page objects. Everything is
//! synchronous and blocking; one driver and one API client per logical
//! test, never shared across concurrent executions.

#![warn(missing_docs)]

mod api;
#[cfg(feature = "browser")]
mod browser;
mod config;
mod cookies;
mod driver;
mod locator;
mod mock;
mod pages;
mod result;
mod wait;

pub use api::{ApiResponse, Cart, CartApi, CartProduct};
#[cfg(feature = "browser")]
pub use browser::{BrowserConfig, CdpDriver};
pub use config::HarnessConfig;
pub use cookies::{
    CookieProvisioner, DEFAULT_COOKIE_PREFIX, FALLBACK_COOKIE_NAME, FALLBACK_COOKIE_VALUE,
};
pub use driver::Driver;
pub use locator::{Locator, Strategy};
pub use mock::{MockDriver, MockElement, PageState};
pub use pages::{AddToCart, AuthPage, SearchPage};
pub use result::{VitrinaError, VitrinaResult};
pub use wait::{
    Wait, WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS, SEARCH_WAIT_TIMEOUT_MS,
};
