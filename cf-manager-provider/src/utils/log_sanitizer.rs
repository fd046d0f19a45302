//! Log sanitization
//!
//! Response bodies can be KV values or script sources and every client holds
//! a bearer token; neither may reach the log in full.

/// Longest body excerpt written to the log, in bytes.
const BODY_LOG_LIMIT: usize = 256;

/// Characters of a secret left readable by [`mask_secret`].
const SECRET_VISIBLE_PREFIX: usize = 4;

/// Shortens text to at most [`BODY_LOG_LIMIT`] bytes, cutting on a char boundary.
pub fn truncate_for_log(text: &str) -> String {
    if text.len() <= BODY_LOG_LIMIT {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= BODY_LOG_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &text[..cut], text.len())
}

/// Renders a raw response body; binary payloads are summarised by size only.
pub fn body_for_log(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => truncate_for_log(text),
        Err(_) => format!("<{} bytes of binary data>", body.len()),
    }
}

/// `abcdefghijkl` → `abcd****`; short secrets are hidden entirely.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= SECRET_VISIBLE_PREFIX * 2 {
        return "****".to_string();
    }
    let visible: String = secret.chars().take(SECRET_VISIBLE_PREFIX).collect();
    format!("{visible}****")
}
