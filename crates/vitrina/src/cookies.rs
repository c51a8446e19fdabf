//! Anti-bot cookie provisioning.
//!
//! The storefront fronts its API with a fingerprinting vendor that issues
//! short-lived `__ddg*` cookies; requests without a fresh one may be
//! rejected. The provisioner probes the site root for that cookie set and
//! degrades to a static fallback on any failure, so a flaky probe never
//! fails a test on its own.

use std::collections::HashMap;
use std::time::Duration;

/// Cookie-name prefix the reference site's anti-bot vendor uses
pub const DEFAULT_COOKIE_PREFIX: &str = "__ddg";

/// Cookie name used when the probe yields nothing
pub const FALLBACK_COOKIE_NAME: &str = "__ddg1";

/// Cookie value used when the probe yields nothing
pub const FALLBACK_COOKIE_VALUE: &str = "fallback_cookie_value";

/// Default budget for the single unauthenticated probe request
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches a minimal anti-bot cookie set from the target origin.
///
/// `fresh_cookies` is total: any transport error, and an empty match set,
/// both degrade to the configured single-entry fallback. The degradation
/// is logged so it stays diagnosable.
///
/// The vendor prefix is injectable rather than hardcoded; the reference
/// behavior is one specific vendor (`__ddg`), and the defaults keep that.
#[derive(Debug, Clone)]
pub struct CookieProvisioner {
    origin: String,
    prefix: String,
    fallback_name: String,
    fallback_value: String,
    probe_timeout: Duration,
}

impl CookieProvisioner {
    /// Create a provisioner probing `origin` with reference defaults
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            prefix: DEFAULT_COOKIE_PREFIX.to_string(),
            fallback_name: FALLBACK_COOKIE_NAME.to_string(),
            fallback_value: FALLBACK_COOKIE_VALUE.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Override the vendor cookie-name prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Override the fallback cookie entry
    #[must_use]
    pub fn with_fallback(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.fallback_name = name.into();
        self.fallback_value = value.into();
        self
    }

    /// Override the probe request budget
    #[must_use]
    pub const fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Get the probed origin
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fetch a fresh anti-bot cookie set. Never fails.
    ///
    /// Issues one GET to the origin with a fixed short timeout, keeps only
    /// cookies whose name starts with the vendor prefix, and falls back to
    /// `{fallback_name: fallback_value}` on any error or empty match set.
    #[must_use]
    pub fn fresh_cookies(&self) -> HashMap<String, String> {
        match self.probe() {
            Ok(cookies) if !cookies.is_empty() => cookies,
            Ok(_) => {
                tracing::warn!(
                    origin = %self.origin,
                    prefix = %self.prefix,
                    "cookie probe returned no matching cookies, using fallback"
                );
                self.fallback()
            }
            Err(err) => {
                tracing::warn!(
                    origin = %self.origin,
                    error = %err,
                    "cookie probe failed, using fallback"
                );
                self.fallback()
            }
        }
    }

    fn probe(&self) -> Result<HashMap<String, String>, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.probe_timeout)
            .build()?;
        let response = client.get(&self.origin).send()?;
        Ok(retain_prefixed(
            response
                .cookies()
                .map(|c| (c.name().to_string(), c.value().to_string())),
            &self.prefix,
        ))
    }

    fn fallback(&self) -> HashMap<String, String> {
        let mut cookies = HashMap::new();
        cookies.insert(self.fallback_name.clone(), self.fallback_value.clone());
        cookies
    }
}

/// Keep only cookies whose name starts with `prefix`
fn retain_prefixed(
    cookies: impl Iterator<Item = (String, String)>,
    prefix: &str,
) -> HashMap<String, String> {
    cookies
        .filter(|(name, _)| name.starts_with(prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0_u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/")
    }

    #[test]
    fn test_retain_prefixed_filters_by_name() {
        let cookies = vec![
            ("__ddg1".to_string(), "a".to_string()),
            ("__ddg8".to_string(), "b".to_string()),
            ("session".to_string(), "c".to_string()),
        ];
        let kept = retain_prefixed(cookies.into_iter(), "__ddg");
        assert_eq!(kept.len(), 2);
        assert!(kept.contains_key("__ddg1"));
        assert!(!kept.contains_key("session"));
    }

    #[test]
    fn test_fallback_on_unreachable_origin() {
        // Port 1 is never listening; the probe errors and must be absorbed.
        let provisioner = CookieProvisioner::new("http://127.0.0.1:1/");
        let cookies = provisioner.fresh_cookies();
        assert_eq!(cookies.len(), 1);
        assert_eq!(
            cookies.get(FALLBACK_COOKIE_NAME).map(String::as_str),
            Some(FALLBACK_COOKIE_VALUE)
        );
    }

    #[test]
    fn test_fallback_on_empty_cookie_jar() {
        let origin = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        );
        let provisioner = CookieProvisioner::new(origin);
        let cookies = provisioner.fresh_cookies();
        assert_eq!(
            cookies.get(FALLBACK_COOKIE_NAME).map(String::as_str),
            Some(FALLBACK_COOKIE_VALUE)
        );
    }

    #[test]
    fn test_prefixed_cookies_are_kept_and_others_dropped() {
        let origin = serve_once(
            "HTTP/1.1 200 OK\r\nSet-Cookie: __ddg1=abc; Path=/\r\nSet-Cookie: session=zzz; Path=/\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        );
        let provisioner = CookieProvisioner::new(origin);
        let cookies = provisioner.fresh_cookies();
        assert_eq!(cookies.get("__ddg1").map(String::as_str), Some("abc"));
        assert!(!cookies.contains_key("session"));
    }

    #[test]
    fn test_custom_prefix_and_fallback() {
        let provisioner = CookieProvisioner::new("http://127.0.0.1:1/")
            .with_prefix("__cf")
            .with_fallback("__cf_bm", "stub");
        let cookies = provisioner.fresh_cookies();
        assert_eq!(cookies.get("__cf_bm").map(String::as_str), Some("stub"));
    }
}
