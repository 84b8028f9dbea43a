use std::io::Read;

use anyhow::Result;
use axum::http::{header, HeaderMap};
use flate2::read::GzDecoder;

use backend_domain::RuntimeConfig;

/// Open when no `api_token` is configured, otherwise a matching bearer token
/// is required.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Request body as text, inflated first when sent with `Content-Encoding: gzip`.
pub fn decode_body(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get(header::CONTENT_ENCODING) {
        if encoding.to_str().unwrap_or("").eq_ignore_ascii_case("gzip") {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
