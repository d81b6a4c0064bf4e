//! One-shot text completions against the Anthropic Messages API.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::{self, SecretProvider},
	error::{self, ConfigError},
	http::{self, ReqwestHttpClient},
	obs::{self, Operation},
};

const SERVICE: &str = "anthropic";

/// Connection settings for [`MessagesClient`].
#[derive(Clone, Debug)]
pub struct MessagesConfig {
	/// Messages endpoint.
	pub endpoint: Url,
	/// Model identifier.
	pub model: String,
	/// Value of the `anthropic-version` header.
	pub api_version: String,
	/// API key sent as `x-api-key`.
	pub api_key: Secret,
}
impl MessagesConfig {
	/// Default endpoint, model, and API version with the provided key.
	pub fn new(api_key: impl Into<Secret>) -> Result<Self, ConfigError> {
		Ok(Self {
			endpoint: config::parse_url(config::DEFAULT_MESSAGES_ENDPOINT)?,
			model: config::DEFAULT_MODEL.into(),
			api_version: config::DEFAULT_ANTHROPIC_VERSION.into(),
			api_key: api_key.into(),
		})
	}

	/// Resolves the API key from `ANTHROPIC_API_KEY` through `provider`.
	pub fn from_secrets(provider: &dyn SecretProvider) -> Result<Self, ConfigError> {
		Self::new(provider.require(config::ANTHROPIC_API_KEY)?)
	}

	/// Overrides the model identifier.
	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();

		self
	}

	/// Overrides the endpoint.
	pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
		self.endpoint = config::parse_url(endpoint)?;

		Ok(self)
	}
}

#[derive(Deserialize)]
struct MessagesResponse {
	#[serde(default)]
	content: Vec<ContentBlock>,
}
#[derive(Deserialize)]
struct ContentBlock {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default)]
	text: Option<String>,
}

/// Sends single-turn prompts and returns the reply text.
#[derive(Clone, Debug)]
pub struct MessagesClient {
	/// HTTP client used for every outbound call.
	pub http_client: ReqwestHttpClient,
	/// Endpoint, model, and key.
	pub config: MessagesConfig,
}
impl MessagesClient {
	/// Creates a client with the crate's default HTTP client.
	pub fn new(config: MessagesConfig) -> Result<Self> {
		Ok(Self::with_http_client(ReqwestHttpClient::new()?, config))
	}

	/// Creates a client that reuses the caller-provided HTTP client.
	pub fn with_http_client(http_client: ReqwestHttpClient, config: MessagesConfig) -> Self {
		Self { http_client, config }
	}

	/// Sends `prompt` as one user message and returns the trimmed text of the first content
	/// block, or an empty string when that block is not text.
	pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
		obs::observe(Operation::Complete, "complete", async move {
			let body = serde_json::json!({
				"model": self.config.model,
				"max_tokens": max_tokens,
				"messages": [{ "role": "user", "content": prompt }],
			});
			let request = self
				.http_client
				.post(self.config.endpoint.clone())
				.header("x-api-key", self.config.api_key.expose())
				.header("anthropic-version", self.config.api_version.as_str())
				.json(&body);
			let raw = http::send(SERVICE, request).await?;
			let response: MessagesResponse = error::parse_json(SERVICE, &raw)?;
			let text = response
				.content
				.into_iter()
				.next()
				.filter(|block| block.kind == "text")
				.and_then(|block| block.text)
				.unwrap_or_default();

			Ok(text.trim().to_owned())
		})
		.await
	}
}
