//! Best-effort cleanup of user-supplied URLs.

/// Scheme prepended when the input carries none of the recognized ones.
pub const DEFAULT_SCHEME: &str = "http://";

const KNOWN_SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

/// Normalize `url` using [`DEFAULT_SCHEME`].
pub fn normalize(url: &str) -> String {
    normalize_with_scheme(url, DEFAULT_SCHEME)
}

/// Normalize `url`, prepending `scheme` when no recognized scheme is present.
///
/// Strips leading and trailing slashes, drops tabs and line breaks,
/// collapses repeated slashes (restoring the `://` separator), adds the
/// scheme and finally removes spaces. Never fails.
pub fn normalize_with_scheme(url: &str, scheme: &str) -> String {
    // Collapse passes are capped at input length - 5; short inputs get none.
    let max_passes = url.len().saturating_sub(5);

    let mut url = url
        .trim_start_matches('/')
        .trim_end_matches('/')
        .replace(['\t', '\r', '\n'], "");

    let mut pass = 0;
    while pass < max_passes && url.contains("//") {
        url = url.replace("//", "/").replace(":/", "://");
        pass += 1;
    }

    if !KNOWN_SCHEMES.iter().any(|known| url.starts_with(known)) {
        url.insert_str(0, scheme);
    }

    url.replace(' ', "")
}
