use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Characters that are not safe to keep in an object key segment
    /// - Kept: ASCII letters, digits, '.', '_', '-'
    /// - Replaced: whitespace, slashes, unicode, shell metacharacters
    pub static ref UNSAFE_KEY_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();

    /// Loose email shape check used before touching the credential store
    /// - Valid: "alice@x.com", "a.b+c@sub.example.org"
    /// - Invalid: "alice", "alice@", "@x.com", "a b@x.com"
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Rejects values that are empty or only whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Longest filename segment kept in an object key
const MAX_KEY_FILENAME_LEN: usize = 100;

/// Turn an uploaded filename into a key-safe segment.
///
/// Path components are dropped, unsafe runs collapse to `_`, and the result is
/// never empty.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let cleaned = UNSAFE_KEY_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');

    if cleaned.is_empty() {
        return "file".to_string();
    }

    // Keep the tail so the extension survives truncation
    let start = cleaned.len().saturating_sub(MAX_KEY_FILENAME_LEN);
    cleaned[start..].to_string()
}
