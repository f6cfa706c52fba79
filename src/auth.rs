//! Token hand-off from the provider's authorization redirect.
//!
//! After authorizing, the provider sends the visitor back with the token in
//! the URL fragment (`#token=<64 hex chars>`). The page forwards it to the
//! server's auth endpoint, which stores it in the session.

/// Path the token is forwarded to.
pub const AUTH_PATH: &str = "/auth";

const TOKEN_KEY: &str = "token=";
const TOKEN_LEN: usize = 64;

/// Find the first `token=` followed by 64 lowercase hex digits in `hash`.
///
/// Only the 64 digits are returned; anything after them is ignored.
pub fn extract_token(hash: &str) -> Option<&str> {
    hash.match_indices(TOKEN_KEY).find_map(|(at, _)| {
        let start = at + TOKEN_KEY.len();
        let candidate = hash.get(start..start + TOKEN_LEN)?;
        candidate
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
            .then_some(candidate)
    })
}

/// Where to send the visitor for a given `location.hash`, if anywhere.
pub fn redirect_for_hash(hash: &str) -> Option<String> {
    if hash.is_empty() {
        return None;
    }
    extract_token(hash).map(|token| format!("{AUTH_PATH}?token={token}"))
}
