//! HMAC-SHA1 signature generation over the OAuth 1.0a base string.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
// self
use crate::oauth1::{OAuthParams, percent_encode};

type HmacSha1 = Hmac<Sha1>;

/// Builds `METHOD&enc(url)&enc(normalized params)`.
///
/// `url` must not carry a query string; query parameters belong in `params`.
pub fn base_string(method: &str, url: &str, params: &OAuthParams) -> String {
	format!(
		"{}&{}&{}",
		method.to_uppercase(),
		percent_encode(url),
		percent_encode(&params.normalized())
	)
}

/// Builds `enc(consumer_secret)&enc(token_secret)`.
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
	format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret))
}

/// Computes the base64 HMAC-SHA1 signature for one request.
///
/// `params` must hold every protocol parameter except `oauth_signature`. The result is a pure
/// function of the inputs.
pub fn sign(
	method: &str,
	url: &str,
	params: &OAuthParams,
	consumer_secret: &str,
	token_secret: &str,
) -> String {
	let key = signing_key(consumer_secret, token_secret);
	let Ok(mut mac) = HmacSha1::new_from_slice(key.as_bytes()) else {
		unreachable!("HMAC accepts keys of any length");
	};

	mac.update(base_string(method, url, params).as_bytes());

	STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const TWEETS: &str = "https://api.x.com/2/tweets";

	fn golden_params() -> OAuthParams {
		OAuthParams::protocol("k", "t", "n", "1000000000")
	}

	#[test]
	fn base_string_double_encodes_parameters() {
		assert_eq!(
			base_string("post", TWEETS, &golden_params()),
			"POST&https%3A%2F%2Fapi.x.com%2F2%2Ftweets&oauth_consumer_key%3Dk%26oauth_nonce%3Dn\
			 %26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1000000000%26oauth_token\
			 %3Dt%26oauth_version%3D1.0"
		);
	}

	#[test]
	fn golden_vector_matches() {
		assert_eq!(
			sign("POST", TWEETS, &golden_params(), "cs", "ts"),
			"xAAsKSshJWtv7nchri/HdZVUTJ0="
		);
	}

	#[test]
	fn signature_is_deterministic() {
		let first = sign("POST", TWEETS, &golden_params(), "cs", "ts");
		let second = sign("post", TWEETS, &golden_params(), "cs", "ts");

		assert_eq!(first, second);
		assert_ne!(first, sign("POST", TWEETS, &golden_params(), "cs", "other"));
	}

	#[test]
	fn insertion_order_does_not_matter() {
		let shuffled = OAuthParams::from_iter([
			("oauth_version", "1.0"),
			("oauth_token", "t"),
			("oauth_nonce", "n"),
			("oauth_timestamp", "1000000000"),
			("oauth_consumer_key", "k"),
			("oauth_signature_method", "HMAC-SHA1"),
		]);

		assert_eq!(
			sign("POST", TWEETS, &shuffled, "cs", "ts"),
			sign("POST", TWEETS, &golden_params(), "cs", "ts")
		);
	}

	#[test]
	fn published_twitter_vector_matches() {
		let params = OAuthParams::from_iter([
			("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
			("include_entities", "true"),
			("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
			("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_timestamp", "1318622958"),
			("oauth_token", "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb"),
			("oauth_version", "1.0"),
		]);

		assert_eq!(
			sign(
				"POST",
				"https://api.twitter.com/1.1/statuses/update.json",
				&params,
				"kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
				"LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
			),
			"hCtSmYh+iHYCEqBWrE7C7hYmtUk="
		);
	}

	#[test]
	fn duplicate_keys_both_reach_the_base_string() {
		let params = OAuthParams::from_iter([("a", "2"), ("b", "x"), ("a", "1")]);

		assert_eq!(
			base_string("GET", "https://example.com/r", &params),
			"GET&https%3A%2F%2Fexample.com%2Fr&a%3D2%26a%3D1%26b%3Dx"
		);
	}

	#[test]
	fn signing_key_encodes_both_halves() {
		assert_eq!(signing_key("c&s", "t s"), "c%26s&t%20s");
		assert_eq!(signing_key("cs", ""), "cs&");
	}
}
