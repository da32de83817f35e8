//! One-shot notices carried across a redirect in a short-lived cookie.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// `Set-Cookie` value storing this notice
    pub fn to_cookie(&self) -> HeaderValue {
        let value = format!(
            "{}={}:{}; Path=/; Max-Age=60; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            self.level.as_str(),
            urlencoding::encode(&self.message)
        );
        // Percent-encoding leaves only visible ASCII, which is always a valid header value
        HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    /// `Set-Cookie` value removing any stored notice
    pub fn clear_cookie() -> HeaderValue {
        HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
    }

    /// Decode the notice from a raw cookie value (`level:message`)
    pub fn decode(raw: &str) -> Option<Self> {
        let (level, message) = raw.split_once(':')?;
        let level = match level {
            "success" => FlashLevel::Success,
            "error" => FlashLevel::Error,
            _ => return None,
        };
        let message = urlencoding::decode(message).ok()?.into_owned();
        Some(Self { level, message })
    }

    /// Find the notice in a request's `Cookie` headers
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .and_then(|(_, value)| Self::decode(value))
    }
}

/// Extractor for the notice left by the previous request, if any
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Option<Flash>);

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IncomingFlash(Flash::from_headers(&parts.headers)))
    }
}

/// 303 redirect that leaves `flash` for the next page
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(to).into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, flash.to_cookie());
    response
}

/// Rendered page; clears the flash cookie when the page displayed one
pub fn page_response(status: StatusCode, html: String, consumed: &IncomingFlash) -> Response {
    let mut response = (status, Html(html)).into_response();
    if consumed.0.is_some() {
        response
            .headers_mut()
            .append(header::SET_COOKIE, Flash::clear_cookie());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_roundtrip_keeps_quotes_and_spaces() {
        let flash = Flash::success("Software \"Foo 1.0\" has been deleted successfully!");
        let cookie = flash.to_cookie();
        let cookie = cookie.to_str().unwrap();

        let pair = cookie.split(';').next().unwrap();
        let (_, value) = pair.split_once('=').unwrap();
        assert_eq!(Flash::decode(value), Some(flash));
    }

    #[test]
    fn test_from_headers_picks_flash_among_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=abc; flash=error:Bad%20input; theme=dark"),
        );

        let flash = Flash::from_headers(&headers).unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert_eq!(flash.message, "Bad input");
    }

    #[test]
    fn test_decode_rejects_unknown_level() {
        assert_eq!(Flash::decode("warning:hi"), None);
        assert_eq!(Flash::decode("no-separator"), None);
    }

    #[test]
    fn test_redirect_sets_cookie() {
        let response = redirect_with_flash("/adminpage/software/", Flash::success("Saved"));

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().starts_with("flash=success:Saved"));
    }

    #[test]
    fn test_page_response_clears_consumed_flash() {
        let shown = IncomingFlash(Some(Flash::error("x")));
        let response = page_response(StatusCode::OK, "<p>ok</p>".to_string(), &shown);
        assert!(response.headers().get(header::SET_COOKIE).is_some());

        let response = page_response(StatusCode::OK, String::new(), &IncomingFlash(None));
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
