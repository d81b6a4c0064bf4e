//! `Authorization: OAuth ...` header serialization.

// self
use crate::oauth1::{OAuthParams, percent_encode};

/// Renders `OAuth k1="v1", k2="v2", ...` with keys stably sorted and both halves encoded.
pub fn authorization_header(params: &OAuthParams) -> String {
	let pairs = params
		.sorted()
		.into_iter()
		.map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
		.collect::<Vec<_>>();

	format!("OAuth {}", pairs.join(", "))
}
