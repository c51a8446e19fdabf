//! Page objects for the storefront UI.
//!
//! Each page object encapsulates the locators for one UI area and exposes
//! intention-revealing actions, each a short deterministic protocol of
//! locate, wait-for-condition, interact steps. Page objects are stateless
//! over a borrowed driver; an action assumes the page is in the state the
//! previous action left it in (implicit sequential protocol) and verifies
//! nothing beyond what its own waits check.

mod auth;
mod cart;
mod search;

pub use auth::AuthPage;
pub use cart::AddToCart;
pub use search::SearchPage;
