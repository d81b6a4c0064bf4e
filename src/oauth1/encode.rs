//! RFC 3986 percent-encoding as OAuth 1.0a requires it.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Everything except the unreserved set `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes every UTF-8 octet outside the unreserved set with uppercase hex.
///
/// Stricter than generic URI component encoders: `!`, `'`, `(`, `)`, and `*` are escaped too.
pub fn percent_encode(input: &str) -> String {
	utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Reverses [`percent_encode`]; `None` when the decoded octets are not valid UTF-8.
pub fn percent_decode(input: &str) -> Option<String> {
	percent_decode_str(input).decode_utf8().ok().map(|value| value.into_owned())
}
