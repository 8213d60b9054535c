//! HTML forms can only submit GET/POST. A POST carrying `_METHOD=PATCH|PUT|DELETE`
//! in its urlencoded body (or an `X-HTTP-Method-Override` header) is dispatched
//! as that method instead.
//!
//! Must wrap the whole router: method routing has already happened inside a
//! `Router::layer`.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

pub const METHOD_FIELD: &str = "_METHOD";
pub const METHOD_HEADER: &str = "x-http-method-override";

const MAX_FORM_BYTES: usize = 64 * 1024;

pub async fn override_method(req: Request, next: Next) -> Response {
    if *req.method() != Method::POST {
        return next.run(req).await;
    }

    let from_header = req
        .headers()
        .get(METHOD_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(overridable);
    if let Some(method) = from_header {
        let mut req = req;
        debug!(%method, "method override from header");
        *req.method_mut() = method;
        return next.run(req).await;
    }

    if !is_urlencoded_form(req.headers()) {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(b) => b,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };
    if let Some(method) = std::str::from_utf8(&bytes).ok().and_then(form_method) {
        debug!(%method, "method override from form field");
        parts.method = method;
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_urlencoded_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Find `_METHOD` in an urlencoded body.
fn form_method(body: &str) -> Option<Method> {
    body.split('&').find_map(|pair| {
        let mut it = pair.splitn(2, '=');
        match (it.next(), it.next()) {
            (Some(METHOD_FIELD), Some(v)) => overridable(v),
            _ => None,
        }
    })
}

fn overridable(value: &str) -> Option<Method> {
    match value.trim().to_ascii_uppercase().as_str() {
        "PATCH" => Some(Method::PATCH),
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
