//! Query string parsing and form encoding
//!
//! Callback signatures are computed over decoded query values in encounter
//! order, so parsing must follow the server's rules exactly:
//!
//! - pairs are split on `&`, then on the first `=`
//! - a pair without `=` maps to an empty value
//! - keys and values are form-decoded as UTF-8 (`+` is a space)
//! - a repeated key keeps its first position and takes the last value
//!
//! Malformed input is tolerated: bad percent escapes stay literal and
//! invalid UTF-8 decodes lossily.

use percent_encoding::percent_decode_str;
use url::form_urlencoded::byte_serialize;

/// Ordered, decoded query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Look up a value by decoded key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate pairs in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate keys in encounter order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate values in encounter order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, v)| v.as_str())
    }

    /// All values joined without separators
    pub fn values_concat(&self) -> String {
        self.values().collect()
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Parse a raw query string (without the leading `?`).
pub fn parse_query(query: &str) -> QueryParams {
    let mut segments: Vec<&str> = query.split('&').collect();
    // Trailing empty segments are ignored, a wholly empty query is one empty pair
    if segments.len() > 1 {
        while segments.last() == Some(&"") {
            segments.pop();
        }
    }

    let mut params = QueryParams::new();
    for segment in segments {
        match segment.split_once('=') {
            Some((key, value)) => params.insert(decode_component(key), decode_component(value)),
            None => params.insert(decode_component(segment), String::new()),
        }
    }
    params
}

/// Form-decode one key or value.
pub fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Form-encode one key or value (UTF-8, space as `+`).
pub fn encode_component(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}

/// Form-encode pairs; a `None` value emits the bare key.
pub fn encode_form<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut out = String::new();
    for (key, value) in pairs {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&encode_component(key));
        if let Some(value) = value {
            out.push('=');
            out.push_str(&encode_component(value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order_and_bare_keys() {
        let params = parse_query("foo=1&bar=2&baz");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("foo", "1"), ("bar", "2"), ("baz", "")]);
    }

    #[test]
    fn test_parse_decodes_keys_and_values() {
        let params = parse_query("gamer%20id=1&name=J%C3%BCrgen+K&sum=1%2B1");
        assert_eq!(params.get("gamer id"), Some("1"));
        assert_eq!(params.get("name"), Some("Jürgen K"));
        assert_eq!(params.get("sum"), Some("1+1"));
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let params = parse_query("token=a=b=c");
        assert_eq!(params.get("token"), Some("a=b=c"));
    }

    #[test]
    fn test_parse_duplicate_keeps_first_position_last_value() {
        let params = parse_query("a=1&b=2&a=3");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
        assert_eq!(params.values_concat(), "32");
    }

    #[test]
    fn test_parse_tolerates_malformed_input() {
        let params = parse_query("a=%zz&b=%E0%A4&&c");
        assert_eq!(params.get("a"), Some("%zz"));
        assert_eq!(params.get("b"), Some("\u{FFFD}"));
        assert_eq!(params.get(""), Some(""));
        assert_eq!(params.get("c"), Some(""));
    }

    #[test]
    fn test_parse_empty_and_trailing_segments() {
        let empty = parse_query("");
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.get(""), Some(""));

        let trailing = parse_query("a=1&&");
        assert_eq!(trailing.len(), 1);
        assert_eq!(trailing.values_concat(), "1");
    }

    #[test]
    fn test_encode_form() {
        let body = encode_form([
            ("gamer_id", Some("gamer 1")),
            ("note", Some("a&b=c/ü")),
            ("flag", None),
        ]);
        assert_eq!(body, "gamer_id=gamer+1&note=a%26b%3Dc%2F%C3%BC&flag");
    }

    #[test]
    fn test_encoded_form_parses_back() {
        let body = encode_form([("gamer id", Some("x y")), ("level", Some("10"))]);
        let params = parse_query(&body);
        assert_eq!(params.get("gamer id"), Some("x y"));
        assert_eq!(params.get("level"), Some("10"));
    }

    #[test]
    fn test_collect_into_params() {
        let params: QueryParams = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
