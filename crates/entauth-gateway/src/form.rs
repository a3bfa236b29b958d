//! Form encoding for the gateway wire format.
//!
//! Outbound bodies use standard `application/x-www-form-urlencoded`
//! encoding. Inbound bodies are split verbatim: the gateway's `respData` is
//! base64 and its signature must be verified over the exact bytes received,
//! so values are deliberately *not* percent-decoded.

use std::collections::BTreeMap;

/// Encode `pairs` in order as a URL-encoded form body.
pub fn encode(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().copied())
        .finish()
}

/// Split a response body into fields without percent-decoding.
///
/// Pairs are separated by `&` and split on the first `=`. Segments without
/// `=` are skipped. A repeated key keeps its last value.
pub fn parse_raw(body: &str) -> BTreeMap<String, String> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_preserves_order_and_escapes() {
        let body = encode(&[("reqData", "ab+/="), ("merNo", "M 1"), ("signature", "x&y")]);
        assert_eq!(body, "reqData=ab%2B%2F%3D&merNo=M+1&signature=x%26y");
    }

    #[test]
    fn parse_raw_keeps_values_verbatim() {
        let fields = parse_raw("respData=eyJh%2B==&signature=c2ln+");
        assert_eq!(fields["respData"], "eyJh%2B==");
        assert_eq!(fields["signature"], "c2ln+");
    }

    #[test]
    fn parse_raw_skips_pairs_without_equals() {
        let fields = parse_raw("junk&a=1&&b=");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["a"], "1");
        assert_eq!(fields["b"], "");
    }

    #[test]
    fn parse_raw_last_value_wins() {
        let fields = parse_raw("a=1&a=2");
        assert_eq!(fields["a"], "2");
    }
}
