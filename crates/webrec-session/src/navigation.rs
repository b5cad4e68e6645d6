use crate::RecorderError;
use url::Url;

/// Parse a URL for a spawned window; only `http` and `https` are allowed.
pub fn validate_url(raw: &str) -> Result<Url, RecorderError> {
    let parsed = Url::parse(raw.trim()).map_err(|_| RecorderError::validation("invalid URL"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(RecorderError::validation("only http/https URLs are supported")),
    }
}
