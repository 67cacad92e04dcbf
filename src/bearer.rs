use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Pull the bearer token out of the `authorization` header.
///
/// The scheme is matched case-insensitively, the value is split on the
/// first space only, and the remainder is trimmed. Anything else (missing
/// header, other scheme, blank token, non-UTF8 value) yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;

    let mut parts = raw.splitn(2, ' ');
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = parts.next()?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}
