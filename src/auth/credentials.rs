//! Consumer + access-token credential set used to sign user-context requests.

// self
use crate::{_prelude::*, auth::Secret, config::SecretProvider, error::ConfigError};

/// Lookup keys used to resolve a [`Credentials`] set from a [`SecretProvider`].
///
/// Keys follow the `{PREFIX}_API_KEY`, `{PREFIX}_API_SECRET`, `{PREFIX}_ACCESS_TOKEN`, and
/// `{PREFIX}_ACCESS_SECRET` convention; the default prefix is `X`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialKeys {
	/// Key holding the consumer (API) key.
	pub consumer_key: String,
	/// Key holding the consumer (API) secret.
	pub consumer_secret: String,
	/// Key holding the access token.
	pub access_token: String,
	/// Key holding the access token secret.
	pub access_token_secret: String,
}
impl CredentialKeys {
	/// Derives the four lookup keys from an account prefix such as `X_PERSONAL`.
	pub fn with_prefix(prefix: &str) -> Self {
		Self {
			consumer_key: format!("{prefix}_API_KEY"),
			consumer_secret: format!("{prefix}_API_SECRET"),
			access_token: format!("{prefix}_ACCESS_TOKEN"),
			access_token_secret: format!("{prefix}_ACCESS_SECRET"),
		}
	}
}
impl Default for CredentialKeys {
	fn default() -> Self {
		Self::with_prefix("X")
	}
}

/// Caller credentials for OAuth 1.0a signing.
///
/// The consumer key and access token travel in the clear inside the `Authorization` header, so
/// only the two secrets are wrapped in [`Secret`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Consumer (API) key, sent as `oauth_consumer_key`.
	pub consumer_key: String,
	/// Consumer (API) secret, first half of the signing key.
	pub consumer_secret: Secret,
	/// Access token, sent as `oauth_token`.
	pub access_token: String,
	/// Access token secret, second half of the signing key.
	pub access_token_secret: Secret,
}
impl Credentials {
	/// Builds a credential set from raw parts.
	pub fn new(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<Secret>,
		access_token: impl Into<String>,
		access_token_secret: impl Into<Secret>,
	) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: consumer_secret.into(),
			access_token: access_token.into(),
			access_token_secret: access_token_secret.into(),
		}
	}

	/// Resolves every credential through `provider`, failing on the first missing value.
	pub fn from_secrets(
		provider: &dyn SecretProvider,
		keys: &CredentialKeys,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			consumer_key: provider.require(&keys.consumer_key)?.expose().to_owned(),
			consumer_secret: provider.require(&keys.consumer_secret)?,
			access_token: provider.require(&keys.access_token)?.expose().to_owned(),
			access_token_secret: provider.require(&keys.access_token_secret)?,
		})
	}
}
