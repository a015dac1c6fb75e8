use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Obfuscates key material for transport inside a share link. This is
/// encoding, not encryption; it only keeps the raw key out of casual sight
/// and URL-hostile characters out of the query string.
pub fn encode(plaintext: &str) -> String {
    URL_SAFE_NO_PAD.encode(plaintext.as_bytes())
}

/// Reverses [`encode`]. Tokens that are not valid base64, or that decode to
/// non-UTF-8 bytes, yield an empty string; a garbled link degrades to a
/// missing key rather than a crash.
pub fn decode(token: &str) -> String {
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(token.as_bytes()) else {
        return String::new();
    };
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_text() {
        let samples = ["sk-3virt$", "", "pa ss/wörd+嘘"];
        for sample in samples {
            assert_eq!(decode(&encode(sample)), sample, "round trip for {sample:?}");
        }
    }

    #[test]
    fn output_stays_url_safe() {
        let token = encode("subjects?_>>~\u{7f}");
        assert!(
            token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "token {token:?} must avoid characters needing URL escapes"
        );
    }

    #[test]
    fn malformed_tokens_decode_to_empty() {
        assert_eq!(decode("not-valid-token-$$$"), "");
        assert_eq!(decode("a"), "", "truncated token is rejected");
    }

    #[test]
    fn non_utf8_payloads_decode_to_empty() {
        let token = URL_SAFE_NO_PAD.encode([0xff, 0xfe]);
        assert_eq!(decode(&token), "");
    }
}
