use url::Url;

use crate::error::RevoltError;

/// Join path `segments` onto `base`. Every segment is percent-encoded, so
/// ids and unicode emoji can be passed through untouched.
pub fn build_url(base: &str, segments: &[&str]) -> Result<Url, RevoltError> {
    let mut url = Url::parse(base)
        .map_err(|e| RevoltError::Other(format!("Invalid base URL `{base}`: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| RevoltError::Other(format!("Base URL `{base}` cannot hold a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
