//! Cart API session client.
//!
//! Owns one authenticated HTTP session: fixed headers and bearer token set
//! at construction and never mutated, plus an anti-bot cookie subset that
//! is re-provisioned before every call (the vendor cookie is short-lived,
//! and a stale value makes the backend reject the request).
//!
//! The client is a deliberate pass-through: no retries, no recovery, no
//! interpretation of response payloads. Negative scenarios depend on being
//! able to send malformed requests (empty body, wrong verb) and assert the
//! raw status the server answers with, so nothing here "fixes" them.

use crate::config::HarnessConfig;
use crate::cookies::CookieProvisioner;
use crate::result::VitrinaResult;
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;

/// Static user agent presented on every API call
const API_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// A raw HTTP outcome: status plus body, no interpretation.
///
/// Both positive and negative tests assert directly against this; 4xx/5xx
/// are ordinary values here, never errors.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    /// Build from a completed blocking response
    fn from_response(response: reqwest::blocking::Response) -> VitrinaResult<Self> {
        let status = response.status();
        let body = response.text()?;
        Ok(Self { status, body })
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Status as a bare number, for assertion messages
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Raw response body
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> VitrinaResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Deserialize the body as the cart payload
    pub fn cart(&self) -> VitrinaResult<Cart> {
        self.json()
    }
}

/// Cart payload shape: a `products` array of server-owned entries
#[derive(Debug, Clone, Deserialize)]
pub struct Cart {
    /// Products currently in the cart
    pub products: Vec<CartProduct>,
}

impl Cart {
    /// Whether the cart holds no products
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Cart-entry id of the first product, used for removal
    #[must_use]
    pub fn first_product_id(&self) -> Option<i64> {
        self.products.first().map(|p| p.id)
    }
}

/// One server-owned cart entry, referenced only by its id.
/// The harness never caches these; it always re-fetches.
#[derive(Debug, Clone, Deserialize)]
pub struct CartProduct {
    /// Cart-entry identifier (the `id` field of the cart payload)
    pub id: i64,
}

/// Authenticated session client for the cart API
#[derive(Debug)]
pub struct CartApi {
    base_url: String,
    cookie_scope: Url,
    client: Client,
    jar: Arc<Jar>,
    provisioner: CookieProvisioner,
}

impl CartApi {
    /// Build a session against `config.api_base_url`.
    ///
    /// Provisions cookies once up front and installs the fixed header set.
    /// Cookie provisioning cannot fail (the provisioner degrades to a
    /// fallback); only a malformed base URL or token makes this error.
    pub fn new(config: &HarnessConfig) -> VitrinaResult<Self> {
        Self::with_provisioner(config, CookieProvisioner::new(config.cookie_origin.clone()))
    }

    /// Build a session with a custom provisioner (injectable probe origin
    /// and vendor prefix)
    pub fn with_provisioner(
        config: &HarnessConfig,
        provisioner: CookieProvisioner,
    ) -> VitrinaResult<Self> {
        let cookie_scope = Url::parse(&config.api_base_url).map_err(|e| {
            crate::result::VitrinaError::InvalidState {
                message: format!("bad api base url {:?}: {e}", config.api_base_url),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&config.bearer_token).map_err(|e| {
                crate::result::VitrinaError::InvalidState {
                    message: format!("bearer token is not a valid header value: {e}"),
                }
            })?,
        );

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        let api = Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cookie_scope,
            client,
            jar,
            provisioner,
        };
        api.refresh_cookies();
        Ok(api)
    }

    /// Re-provision the anti-bot cookie subset, merging overwrite-by-key
    /// into the session jar. Headers and token are untouched.
    fn refresh_cookies(&self) {
        for (name, value) in self.provisioner.fresh_cookies() {
            self.jar
                .add_cookie_str(&format!("{name}={value}"), &self.cookie_scope);
        }
    }

    fn product_url(&self) -> String {
        format!("{}/product", self.base_url)
    }

    /// Add a product to the cart: POST `{base}/product` with `{"id": product_id}`
    pub fn add_product_to_cart(&self, product_id: i64) -> VitrinaResult<ApiResponse> {
        self.refresh_cookies();
        tracing::debug!(product_id, "POST add product to cart");
        let response = self
            .client
            .post(self.product_url())
            .json(&serde_json::json!({ "id": product_id }))
            .send()?;
        ApiResponse::from_response(response)
    }

    /// Deliberately malformed add: POST `{base}/product` with an empty body.
    /// Exists to assert the server's 400-class rejection.
    pub fn add_product_without_id(&self) -> VitrinaResult<ApiResponse> {
        self.refresh_cookies();
        tracing::debug!("POST add product without id (negative)");
        let response = self.client.post(self.product_url()).send()?;
        ApiResponse::from_response(response)
    }

    /// Fetch the cart: GET `{base}`
    pub fn get_cart(&self) -> VitrinaResult<ApiResponse> {
        self.refresh_cookies();
        tracing::debug!("GET cart");
        let response = self.client.get(&self.base_url).send()?;
        ApiResponse::from_response(response)
    }

    /// Remove a cart entry: DELETE `{base}/product/{cart_product_id}`
    pub fn remove_from_cart(&self, cart_product_id: i64) -> VitrinaResult<ApiResponse> {
        self.refresh_cookies();
        tracing::debug!(cart_product_id, "DELETE product from cart");
        let response = self
            .client
            .delete(format!("{}/{cart_product_id}", self.product_url()))
            .send()?;
        ApiResponse::from_response(response)
    }

    /// Deliberately wrong verb: POST `{base}` where GET is expected.
    /// Exists to assert the server's 405 rejection.
    pub fn get_cart_with_wrong_method(&self) -> VitrinaResult<ApiResponse> {
        self.refresh_cookies();
        tracing::debug!("POST cart with wrong method (negative)");
        let response = self.client.post(&self.base_url).send()?;
        ApiResponse::from_response(response)
    }
}
