//! Harness configuration.
//!
//! Everything the test layer feeds into the core: endpoint URLs, the
//! bearer token, and the fixture values the scenarios assert against.
//! Each field has a reference default and a `VITRINA_*` environment
//! override, so CI can retarget the harness without a rebuild.

use std::env;

/// Configuration consumed by the API client and page objects
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the cart API resource
    pub api_base_url: String,
    /// Base URL of the storefront UI
    pub ui_base_url: String,
    /// Origin probed for anti-bot cookies (usually the UI base)
    pub cookie_origin: String,
    /// Bearer token for the `Authorization` header, supplied externally
    pub bearer_token: String,
    /// A product id known to exist in the catalog
    pub product_id: i64,
    /// A title string known to be in the catalog
    pub book_title: String,
    /// A deliberately nonsensical title for no-results scenarios
    pub invalid_title: String,
    /// A syntactically valid phone number
    pub phone: String,
    /// A syntactically invalid phone number
    pub invalid_phone: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://web-gate.chitai-gorod.ru/api/v1/cart".to_string(),
            ui_base_url: "https://www.chitai-gorod.ru/".to_string(),
            cookie_origin: "https://www.chitai-gorod.ru/".to_string(),
            bearer_token: String::new(),
            product_id: 2_997_135,
            book_title: "Мастер и Маргарита".to_string(),
            invalid_title: "кжмхшщзшйцу".to_string(),
            phone: "9161234567".to_string(),
            invalid_phone: "123".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Create a config with reference defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from `VITRINA_*` environment variables, falling back
    /// to the reference defaults for anything unset
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env_or("VITRINA_API_BASE_URL", defaults.api_base_url),
            ui_base_url: env_or("VITRINA_UI_BASE_URL", defaults.ui_base_url),
            cookie_origin: env_or("VITRINA_COOKIE_ORIGIN", defaults.cookie_origin),
            bearer_token: env_or("VITRINA_BEARER_TOKEN", defaults.bearer_token),
            product_id: env::var("VITRINA_PRODUCT_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.product_id),
            book_title: env_or("VITRINA_BOOK_TITLE", defaults.book_title),
            invalid_title: env_or("VITRINA_INVALID_TITLE", defaults.invalid_title),
            phone: env_or("VITRINA_PHONE", defaults.phone),
            invalid_phone: env_or("VITRINA_INVALID_PHONE", defaults.invalid_phone),
        }
    }

    /// Set the API base URL
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the UI base URL
    #[must_use]
    pub fn with_ui_base_url(mut self, url: impl Into<String>) -> Self {
        self.ui_base_url = url.into();
        self
    }

    /// Set the cookie probe origin
    #[must_use]
    pub fn with_cookie_origin(mut self, origin: impl Into<String>) -> Self {
        self.cookie_origin = origin.into();
        self
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = token.into();
        self
    }

    /// Set the known-good product id
    #[must_use]
    pub const fn with_product_id(mut self, id: i64) -> Self {
        self.product_id = id;
        self
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}
