//! TraceLayer span maker that keeps credentials out of request logs.
//!
//! Only the authorization scheme is recorded, never the token. Query
//! parameters that may carry secrets are redacted from the logged URI.

use axum::http::{header::AUTHORIZATION, HeaderMap, Request, Uri};
use tower_http::trace::MakeSpan;
use tracing::Span;

/// Query parameter names whose values must be redacted in logs.
const SENSITIVE_PARAMS: &[&str] = &["token", "access_token", "password", "senha", "secret"];

/// Authorization schemes recorded by name. Anything else is logged as `other`.
const KNOWN_SCHEMES: &[&str] = &["Bearer", "Basic"];

#[derive(Clone, Debug)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let auth_scheme = auth_scheme(request.headers());

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %sanitize_uri(request.uri()),
            version = ?request.version(),
            auth_scheme = %auth_scheme,
        )
    }
}

/// Scheme of the `Authorization` header, never any part of the credential.
fn auth_scheme(headers: &HeaderMap) -> &'static str {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return "none";
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.split_once(' '))
        .and_then(|(scheme, _)| KNOWN_SCHEMES.iter().copied().find(|known| *known == scheme))
        .unwrap_or("other")
}

/// `/login?senha=abc&lang=pt` becomes `/login?senha=[REDACTED]&lang=pt`
fn sanitize_uri(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE_PARAMS.contains(&key.to_ascii_lowercase().as_str()) => {
                format!("{key}=[REDACTED]")
            }
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", uri.path(), pairs.join("&"))
}
