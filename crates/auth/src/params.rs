//! Query-string helpers shared by the schemes.

use std::borrow::Cow;

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`.
pub(crate) fn percent_encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Appends `name=value` pairs to `url`, starting the query string if needed.
/// Names and values are percent-encoded.
pub(crate) fn append_query(url: &mut String, pairs: &[(&str, &str)]) {
    for (name, value) in pairs {
        push_separator(url);
        url.push_str(&percent_encode(name));
        url.push('=');
        url.push_str(&percent_encode(value));
    }
}

/// Appends the right separator for one more query pair.
pub(crate) fn push_separator(url: &mut String) {
    if url.ends_with('?') || url.ends_with('&') {
        return;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
}

/// Decodes an `application/x-www-form-urlencoded` body.
pub(crate) fn parse_form(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.trim().as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
