//! Explicit configuration values: secret providers, endpoints, and the publishing persona.
//!
//! Nothing in the crate reads the process environment on its own. Callers resolve secrets
//! through a [`SecretProvider`] at startup (usually [`EnvSecrets`]) and pass the resulting
//! values into the signer, poster, and drafting clients, so tests can swap in
//! [`StaticSecrets`] fixtures.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Default X API endpoint for tweet creation.
pub const DEFAULT_TWEETS_ENDPOINT: &str = "https://api.x.com/2/tweets";
/// Default Anthropic Messages API endpoint.
pub const DEFAULT_MESSAGES_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
/// Default Anthropic API version header value.
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model used for drafting and curation.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";
/// Environment key holding the Anthropic API key.
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Source of secrets such as API keys and OAuth credentials.
pub trait SecretProvider
where
	Self: Send + Sync,
{
	/// Returns the raw value stored under `key`, if any.
	fn lookup(&self, key: &str) -> Option<String>;

	/// Returns the value stored under `key`, treating empty values as missing.
	fn require(&self, key: &str) -> Result<Secret, ConfigError> {
		self.lookup(key)
			.filter(|value| !value.is_empty())
			.map(Secret::new)
			.ok_or_else(|| ConfigError::missing_secret(key))
	}
}

/// Reads secrets from the process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSecrets;
impl SecretProvider for EnvSecrets {
	fn lookup(&self, key: &str) -> Option<String> {
		std::env::var(key).ok()
	}
}

/// In-memory secret map for fixtures and embedding.
#[derive(Clone, Default)]
pub struct StaticSecrets(HashMap<String, String>);
impl StaticSecrets {
	/// Inserts or replaces a value.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(key.into(), value.into());

		self
	}
}
impl<K, V> FromIterator<(K, V)> for StaticSecrets
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
impl SecretProvider for StaticSecrets {
	fn lookup(&self, key: &str) -> Option<String> {
		self.0.get(key).cloned()
	}
}
impl Debug for StaticSecrets {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut keys = self.0.keys().collect::<Vec<_>>();

		keys.sort();

		f.debug_struct("StaticSecrets").field("keys", &keys).finish()
	}
}

/// Who is posting and what is being announced; fed into drafting prompts and post URLs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
	/// Handle of the account the tweet is posted from (without `@`).
	pub handle: String,
	/// Handle of the product account that quote-tweets the post (without `@`).
	pub brand_handle: String,
	/// Product name.
	pub product: String,
	/// One-line product pitch.
	pub pitch: String,
	/// Public journey site URL.
	pub journey_url: String,
}

/// Parses a signed endpoint, rejecting query strings and fragments.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
	let url = parse_url(raw)?;

	check_signable(&url)?;

	Ok(url)
}

/// Fails when `url` carries a part the OAuth base string would not cover as sent.
pub(crate) fn check_signable(url: &Url) -> Result<(), ConfigError> {
	if url.query().is_some() {
		return Err(ConfigError::QueryInEndpoint { url: url.to_string() });
	}
	if url.fragment().is_some() {
		return Err(ConfigError::FragmentInEndpoint { url: url.to_string() });
	}

	Ok(())
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { url: raw.to_owned(), source })
}
