//! OAuth parameter multiset plus nonce and timestamp generation.

// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, oauth1::percent_encode};

/// `oauth_consumer_key` parameter name.
pub const CONSUMER_KEY: &str = "oauth_consumer_key";
/// `oauth_nonce` parameter name.
pub const NONCE: &str = "oauth_nonce";
/// `oauth_signature` parameter name.
pub const SIGNATURE: &str = "oauth_signature";
/// `oauth_signature_method` parameter name.
pub const SIGNATURE_METHOD: &str = "oauth_signature_method";
/// `oauth_timestamp` parameter name.
pub const TIMESTAMP: &str = "oauth_timestamp";
/// `oauth_token` parameter name.
pub const TOKEN: &str = "oauth_token";
/// `oauth_version` parameter name.
pub const VERSION: &str = "oauth_version";

/// The only supported signature method.
pub const HMAC_SHA1: &str = "HMAC-SHA1";
/// Protocol version emitted in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_BYTES: usize = 16;

/// Name/value pairs that take part in signing or in the `Authorization` header.
///
/// Keys may repeat. Consumers always go through [`OAuthParams::sorted`], which orders pairs by
/// key (byte order) and keeps duplicate keys in the order they were pushed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthParams(Vec<(String, String)>);
impl OAuthParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds the six protocol parameters signed on every request.
	pub fn protocol(
		consumer_key: impl Into<String>,
		token: impl Into<String>,
		nonce: impl Into<String>,
		timestamp: impl Into<String>,
	) -> Self {
		Self::new()
			.with(CONSUMER_KEY, consumer_key)
			.with(NONCE, nonce)
			.with(SIGNATURE_METHOD, HMAC_SHA1)
			.with(TIMESTAMP, timestamp)
			.with(TOKEN, token)
			.with(VERSION, OAUTH_VERSION)
	}

	/// Appends a pair and returns the set.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.push(key, value);

		self
	}

	/// Appends a pair.
	pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.push((key.into(), value.into()));
	}

	/// Returns the first value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	/// Number of pairs, duplicates included.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the set holds no pairs.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Pairs stably sorted by key.
	pub fn sorted(&self) -> Vec<(&str, &str)> {
		let mut pairs = self.iter().collect::<Vec<_>>();

		pairs.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

		pairs
	}

	/// Serializes the sorted pairs as `enc(k)=enc(v)` joined with `&`.
	pub fn normalized(&self) -> String {
		self.sorted()
			.into_iter()
			.map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
			.collect::<Vec<_>>()
			.join("&")
	}
}
impl<K, V> FromIterator<(K, V)> for OAuthParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
impl<K, V> Extend<(K, V)> for OAuthParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = (K, V)>,
	{
		self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
	}
}

/// Returns 16 fresh random bytes, hex encoded.
pub fn generate_nonce() -> String {
	let bytes: [u8; NONCE_BYTES] = rand::rng().random();

	hex::encode(bytes)
}

/// Returns the current Unix time in whole seconds.
pub fn current_timestamp() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn protocol_params_cover_every_signed_field() {
		let params = OAuthParams::protocol("k", "t", "n", "1000000000");

		assert_eq!(params.len(), 6);
		assert_eq!(params.get(CONSUMER_KEY), Some("k"));
		assert_eq!(params.get(SIGNATURE_METHOD), Some("HMAC-SHA1"));
		assert_eq!(params.get(VERSION), Some("1.0"));
		assert_eq!(params.get(SIGNATURE), None);
	}

	#[test]
	fn sorting_keeps_duplicate_keys_in_supply_order() {
		let params = OAuthParams::from_iter([("b", "x"), ("a", "2"), ("a", "1")]);

		assert_eq!(params.sorted(), vec![("a", "2"), ("a", "1"), ("b", "x")]);
		assert_eq!(params.normalized(), "a=2&a=1&b=x");
	}

	#[test]
	fn sorting_is_by_raw_bytes() {
		let params = OAuthParams::from_iter([("a", "1"), ("B", "2"), ("_", "3")]);
		let keys = params.sorted().into_iter().map(|(k, _)| k).collect::<Vec<_>>();

		assert_eq!(keys, vec!["B", "_", "a"]);
	}

	#[test]
	fn nonces_are_fresh_hex() {
		let first = generate_nonce();
		let second = generate_nonce();

		assert_eq!(first.len(), NONCE_BYTES * 2);
		assert!(first.bytes().all(|b| b.is_ascii_hexdigit()));
		assert_ne!(first, second);
	}

	#[test]
	fn timestamp_is_after_the_golden_vector_epoch() {
		assert!(current_timestamp() > 1_000_000_000);
	}
}
