//! Cart API session tests against an in-process stub server.
//!
//! The stub implements just enough of the cart backend to exercise the
//! client's contract: cookie issuance at the site root, the cart CRUD
//! routes, and the negative routes (empty body, wrong verb). It records
//! the headers of every request so the session invariants (fixed headers,
//! refreshed cookies) can be asserted.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use vitrina::{CartApi, HarnessConfig};

#[derive(Debug, Default)]
struct StubState {
    /// (cart entry id, product id) pairs
    products: Vec<(i64, i64)>,
    /// Number of probes against the site root
    root_probes: usize,
    /// Headers seen on cart-API requests, most recent last
    api_headers: Vec<HashMap<String, String>>,
}

struct Request {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Request {
        method,
        path,
        headers,
        body,
    })
}

fn write_response(stream: &mut TcpStream, status: &str, extra_headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\n{extra_headers}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

fn products_json(state: &StubState) -> String {
    let entries: Vec<String> = state
        .products
        .iter()
        .map(|(cart_id, product_id)| format!(r#"{{"id":{cart_id},"goodsId":{product_id}}}"#))
        .collect();
    format!(r#"{{"products":[{}]}}"#, entries.join(","))
}

/// Start the stub backend; returns its base address (`http://host:port`)
fn start_stub(state: Arc<Mutex<StubState>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(request) = read_request(&mut stream) else {
                continue;
            };
            let mut state = state.lock().unwrap();
            match (request.method.as_str(), request.path.as_str()) {
                ("GET", "/") => {
                    state.root_probes += 1;
                    write_response(
                        &mut stream,
                        "200 OK",
                        "Set-Cookie: __ddg1=stub-issued; Path=/\r\n",
                        "ok",
                    );
                }
                ("GET", "/cart") => {
                    state.api_headers.push(request.headers.clone());
                    let body = products_json(&state);
                    write_response(&mut stream, "200 OK", "", &body);
                }
                ("POST", "/cart") => {
                    state.api_headers.push(request.headers.clone());
                    write_response(&mut stream, "405 Method Not Allowed", "", "");
                }
                ("POST", "/cart/product") => {
                    state.api_headers.push(request.headers.clone());
                    let id = serde_json::from_slice::<serde_json::Value>(&request.body)
                        .ok()
                        .and_then(|v| v.get("id").and_then(serde_json::Value::as_i64));
                    match id {
                        Some(product_id) => {
                            state.products.push((product_id + 1000, product_id));
                            write_response(&mut stream, "200 OK", "", "{}");
                        }
                        None => write_response(&mut stream, "400 Bad Request", "", ""),
                    }
                }
                ("DELETE", path) if path.starts_with("/cart/product/") => {
                    state.api_headers.push(request.headers.clone());
                    let cart_id: Option<i64> =
                        path.rsplit('/').next().and_then(|s| s.parse().ok());
                    match cart_id {
                        Some(cart_id) => {
                            state.products.retain(|(id, _)| *id != cart_id);
                            write_response(&mut stream, "204 No Content", "", "");
                        }
                        None => write_response(&mut stream, "400 Bad Request", "", ""),
                    }
                }
                _ => write_response(&mut stream, "404 Not Found", "", ""),
            }
        }
    });
    format!("http://{addr}")
}

fn stub_config(base: &str) -> HarnessConfig {
    HarnessConfig::new()
        .with_api_base_url(format!("{base}/cart"))
        .with_cookie_origin(format!("{base}/"))
        .with_bearer_token("Bearer stub-token")
        .with_product_id(167)
}

#[test]
fn add_get_remove_round_trip_empties_the_cart() {
    let state = Arc::new(Mutex::new(StubState::default()));
    let base = start_stub(Arc::clone(&state));
    let api = CartApi::new(&stub_config(&base)).unwrap();

    let added = api.add_product_to_cart(167).unwrap();
    assert_eq!(added.status_code(), 200);

    let cart = api.get_cart().unwrap();
    assert_eq!(cart.status_code(), 200);
    let cart = cart.cart().unwrap();
    assert!(!cart.is_empty());
    // The entry must be resolvable back to the product we added.
    let cart_product_id = cart.first_product_id().unwrap();
    assert_eq!(cart_product_id, 167 + 1000);

    let removed = api.remove_from_cart(cart_product_id).unwrap();
    assert_eq!(removed.status_code(), 204);

    let cart = api.get_cart().unwrap().cart().unwrap();
    assert!(cart.is_empty());
}

#[test]
fn add_without_id_is_rejected_and_mutates_nothing() {
    let state = Arc::new(Mutex::new(StubState::default()));
    let base = start_stub(Arc::clone(&state));
    let api = CartApi::new(&stub_config(&base)).unwrap();

    let response = api.add_product_without_id().unwrap();
    assert_eq!(response.status_code(), 400);
    assert!(api.get_cart().unwrap().cart().unwrap().is_empty());
}

#[test]
fn wrong_method_on_cart_is_405() {
    let state = Arc::new(Mutex::new(StubState::default()));
    let base = start_stub(Arc::clone(&state));
    let api = CartApi::new(&stub_config(&base)).unwrap();

    let response = api.get_cart_with_wrong_method().unwrap();
    assert_eq!(response.status_code(), 405);
}

#[test]
fn get_cart_is_idempotent_without_mutation() {
    let state = Arc::new(Mutex::new(StubState::default()));
    let base = start_stub(Arc::clone(&state));
    let api = CartApi::new(&stub_config(&base)).unwrap();

    api.add_product_to_cart(42).unwrap();
    let first = api.get_cart().unwrap().text().to_string();
    let second = api.get_cart().unwrap().text().to_string();
    assert_eq!(first, second);
}

#[test]
fn session_headers_are_fixed_and_cookies_refresh_per_call() {
    let state = Arc::new(Mutex::new(StubState::default()));
    let base = start_stub(Arc::clone(&state));
    let api = CartApi::new(&stub_config(&base)).unwrap();

    api.add_product_to_cart(167).unwrap();
    api.get_cart().unwrap();

    let state = state.lock().unwrap();
    // One probe at construction plus one before each of the two calls.
    assert!(
        state.root_probes >= 3,
        "expected a cookie probe before every call, saw {}",
        state.root_probes
    );
    assert_eq!(state.api_headers.len(), 2);
    for headers in &state.api_headers {
        assert_eq!(
            headers.get("authorization").map(String::as_str),
            Some("Bearer stub-token")
        );
        assert_eq!(
            headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert!(headers
            .get("user-agent")
            .is_some_and(|ua| ua.starts_with("Mozilla/5.0")));
        // The cookie issued by the stub origin must ride along, proving
        // the probe result was merged into the session jar.
        assert!(headers
            .get("cookie")
            .is_some_and(|c| c.contains("__ddg1=stub-issued")));
    }
}
