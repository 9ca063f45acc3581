//! URL helpers shared by validation rules and backend tests.

use url::Url;

/// Returns true if `url` parses and uses the `https` scheme.
#[must_use]
pub fn is_secure_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| parsed.scheme() == "https")
}

/// Returns the decoded value of the first `key` query parameter.
///
/// Returns `None` for unparseable URLs and absent keys.
#[must_use]
pub fn query_param(url: &str, key: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
