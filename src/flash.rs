//! One-shot flash notices, carried in a short-lived cookie.
//!
//! State-changing handlers answer with [`redirect`], which pairs a 303 with
//! a `Set-Cookie` for the notice. The next rendered page picks the notice up
//! through the [`Flash`] extractor and expires the cookie so it shows once.

use std::future::Future;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};

const FLASH_COOKIE_NAME: &str = "flash";

/// 303 redirect carrying a flash notice for the target page.
pub fn redirect(to: &str, message: &str) -> Response {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    let cookie = format!("{}={}; Path=/; Max-Age=60", FLASH_COOKIE_NAME, encoded);

    let mut response = Redirect::to(to).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Pending flash notice for the page being rendered, if any.
pub struct Flash(Option<String>);

impl Flash {
    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Render a page, expiring the notice cookie when one was shown.
    pub fn page(&self, html: Html<String>) -> Response {
        let mut response = html.into_response();
        if self.0.is_some() {
            let cookie = format!("{}=; Path=/; Max-Age=0", FLASH_COOKIE_NAME);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let message = cookie_value(&parts.headers, FLASH_COOKIE_NAME).and_then(decode);
        async move { Ok(Flash(message)) }
    }
}

/// Pull a single cookie value out of the Cookie header.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE).and_then(|h| h.to_str().ok())?;
    for cookie in cookie_header.split(';') {
        if let Some((k, v)) = cookie.trim().split_once('=') {
            if k == name {
                return Some(v.to_string());
            }
        }
    }
    None
}

fn decode(raw: String) -> Option<String> {
    let pair = format!("m={}", raw);
    url::form_urlencoded::parse(pair.as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn redirect_sets_notice_and_sees_other() {
        let response = redirect("/login", "Please log in to access this page.");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("flash="));
        assert!(cookie.contains("Max-Age=60"));
    }

    #[test]
    fn notice_round_trips_through_the_cookie() {
        let message = "Donation of ₹500 completed successfully!";
        let response = redirect("/donor_dashboard", message);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        let raw = set_cookie
            .split(';')
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(_, v)| v.to_string())
            .unwrap();

        assert_eq!(decode(raw).unwrap(), message);
    }

    #[test]
    fn cookie_value_finds_the_named_cookie() {
        let headers = headers_with_cookie("session=abc; flash=hello; other=1");
        assert_eq!(
            cookie_value(&headers, "flash"),
            Some("hello".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
