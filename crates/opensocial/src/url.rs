//! Order-preserving URL builder used to assemble every request target.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

/// Everything but RFC 3986 unreserved characters, `@` and `:`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'@')
    .remove(b':');

/// A URL assembled from a base, ordered path components, and ordered query
/// parameters.
///
/// Path components are percent-encoded as path segments (`@` and `:` are kept,
/// so `@me` stays readable); query names and values use standard
/// `application/x-www-form-urlencoded` encoding. Serialization through
/// [`std::fmt::Display`] is idempotent and emits components and parameters in
/// insertion order.
///
/// ```
/// use opensocial::OpenSocialUrl;
///
/// let mut url = OpenSocialUrl::new("http://x.org");
/// url.add_path_component("a").add_query_string_parameter("k", "v");
/// assert_eq!(url.to_string(), "http://x.org/a?k=v");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSocialUrl {
    base: String,
    components: Vec<String>,
    parameters: Vec<(String, String)>,
}

impl OpenSocialUrl {
    /// Starts a URL from `base`. A query string already present on the base
    /// is preserved and new parameters are appended after it.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            components: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Appends `/segment`, percent-encoding reserved characters.
    pub fn add_path_component(&mut self, segment: impl Into<String>) -> &mut Self {
        self.components.push(segment.into());
        self
    }

    /// Appends `name=value` to the query string.
    pub fn add_query_string_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Raw (unencoded) path components in insertion order.
    pub fn path_components(&self) -> &[String] {
        &self.components
    }

    /// Raw (unencoded) query parameters in insertion order.
    pub fn query_parameters(&self) -> &[(String, String)] {
        &self.parameters
    }
}

impl std::fmt::Display for OpenSocialUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (path, existing_query) = match self.base.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.base.as_str(), None),
        };

        if self.components.is_empty() {
            f.write_str(path)?;
        } else {
            f.write_str(path.trim_end_matches('/'))?;
            for component in &self.components {
                write!(f, "/{}", encode_path_segment(component))?;
            }
        }

        let mut connector = '?';
        if let Some(query) = existing_query.filter(|q| !q.is_empty()) {
            write!(f, "?{query}")?;
            connector = '&';
        }
        for (name, value) in &self.parameters {
            write!(
                f,
                "{connector}{}={}",
                encode_query_component(name),
                encode_query_component(value)
            )?;
            connector = '&';
        }
        Ok(())
    }
}

impl From<OpenSocialUrl> for String {
    fn from(url: OpenSocialUrl) -> Self {
        url.to_string()
    }
}

/// Percent-encodes one path segment, keeping unreserved characters plus `@`
/// and `:`.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn encode_query_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
