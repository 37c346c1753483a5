use regex::Regex;
use url::Url;

/// Extracts the source-attribute value from one markup fragment.
///
/// When `extension` is non-empty the value must end with it. Returns the
/// first match; `None` means the fragment carries no matching reference and
/// callers should skip it rather than treat it as an error.
pub fn source_url(fragment: &str, extension: &str) -> Option<String> {
    let pattern = format!(r#"src="([^"]*?{})""#, regex::escape(extension));
    let regex = Regex::new(&pattern).ok()?;

    regex
        .captures(fragment.trim())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|value| !value.is_empty())
}

/// Converts a reference value to an absolute URL against a fixed base.
///
/// Values that already carry a scheme or a leading `www.` pass through
/// unchanged. Returns `None` if the value cannot be joined.
pub fn resolve(base: &Url, value: &str) -> Option<String> {
    if value.starts_with("http://") || value.starts_with("https://") || value.starts_with("www.") {
        return Some(value.to_string());
    }

    match base.join(value) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(error) => {
            ::log::debug!("cannot resolve {} against {}: {}", value, base, error);
            None
        }
    }
}
