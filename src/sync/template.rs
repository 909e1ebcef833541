use crate::errors::{SyncError, TemplateError};
use indexmap::IndexMap;
use url::{Position, Url};

/// Reads a url template as an absolute, hierarchical URL.
pub fn parse_template(raw: &str) -> Result<Url, TemplateError> {
    if raw.is_empty() {
        return Err(TemplateError::Empty);
    }
    let parsed = Url::parse(raw)?;
    if parsed.cannot_be_a_base() {
        return Err(TemplateError::Opaque(raw.to_string()));
    }
    Ok(parsed)
}

/// Everything before the path: scheme, credentials, host and port.
pub fn authority_prefix(url: &Url) -> &str {
    &url[..Position::BeforePath]
}

/// Ordered query mapping. A repeated key keeps its first position and
/// takes the last value seen.
pub fn query_map(url: &Url) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    for (key, value) in url.query_pairs() {
        map.insert(key.into_owned(), value.into_owned());
    }
    map
}

/// Form-encodes `pairs` in order.
pub fn encode_query(pairs: &IndexMap<&str, &str>) -> Result<String, SyncError> {
    let ordered: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, *v)).collect();
    serde_urlencoded::to_string(ordered)
        .map_err(|err| SyncError::internal(format!("Failed to encode query: {}", err)))
}

const URI_RESERVED: &[u8] = b";/?:@&=+$,#";

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Turns percent-escapes back into readable text the way `decodeURI` does:
/// escapes of URI-reserved characters stay escaped. Input whose escapes do
/// not decode to UTF-8 is returned unchanged.
pub fn decode_uri(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                let decoded = hi * 16 + lo;
                if decoded.is_ascii() && URI_RESERVED.contains(&decoded) {
                    out.extend_from_slice(&bytes[i..i + 3]);
                } else {
                    out.push(decoded);
                }
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_relative_inputs_fail_to_parse() {
        assert_eq!(parse_template(""), Err(TemplateError::Empty));
        assert!(matches!(
            parse_template("not a url"),
            Err(TemplateError::Malformed(_))
        ));
        assert!(matches!(
            parse_template("mailto:ops@example.com"),
            Err(TemplateError::Opaque(_))
        ));
    }

    #[test]
    fn authority_prefix_keeps_port() {
        let url = parse_template("http://localhost:8080/v1/:id?x=1").expect("parse");
        assert_eq!(authority_prefix(&url), "http://localhost:8080");
    }

    #[test]
    fn repeated_query_keys_keep_first_position_and_last_value() {
        let url = parse_template("https://api.example.com/?a=1&b=2&a=3").expect("parse");
        let map = query_map(&url);
        let entries: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn decode_uri_restores_braces_but_keeps_reserved_escapes() {
        assert_eq!(decode_uri("?city=%7Buser%7D"), "?city={user}");
        assert_eq!(decode_uri("?q=a%26b%20c"), "?q=a%26b c");
        assert_eq!(decode_uri("caf%C3%A9"), "café");
    }

    #[test]
    fn decode_uri_leaves_broken_escapes_alone() {
        assert_eq!(decode_uri("100%"), "100%");
        assert_eq!(decode_uri("%zz"), "%zz");
        assert_eq!(decode_uri("%C3"), "%C3");
    }
}
