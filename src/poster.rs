//! Signed tweet creation against the X API v2.
//!
//! [`Poster::post`] serializes the [`TweetRequest`] body, attaches a freshly stamped OAuth 1.0a header through
//! [`RequestSignerExt`], and maps the `{ data: { id } }` answer onto a [`PostedTweet`]. Failed
//! attempts are never retried; the caller decides whether to fall back to manual posting.

// self
use crate::{
	_prelude::*,
	config::{self, Persona},
	error::{self, ConfigError},
	ext::RequestSignerExt,
	http::{self, ReqwestHttpClient},
	oauth1::RequestSigner,
	obs::{self, Operation},
};

const SERVICE: &str = "x";

/// Body of `POST /2/tweets`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetRequest {
	/// Tweet text.
	pub text: String,
	/// Identifier of a tweet to quote; omitted from the body when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub quote_tweet_id: Option<String>,
}
impl TweetRequest {
	/// Plain text post.
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into(), quote_tweet_id: None }
	}

	/// Quotes the tweet with the provided identifier.
	pub fn quoting(mut self, id: impl Into<String>) -> Self {
		self.quote_tweet_id = Some(id.into());

		self
	}
}

/// A successfully created tweet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostedTweet {
	/// Tweet identifier returned by the API.
	pub id: String,
	/// Public URL under the posting handle.
	pub url: String,
}

#[derive(Deserialize)]
struct CreateTweetResponse {
	data: CreatedTweet,
}
#[derive(Deserialize)]
struct CreatedTweet {
	id: String,
}

/// Posts tweets on behalf of one signed-in account.
#[derive(Clone, Debug)]
pub struct Poster {
	/// HTTP client used for every outbound call.
	pub http_client: ReqwestHttpClient,
	/// Tweet creation endpoint.
	pub endpoint: Url,
	/// Signer holding the account credentials.
	pub signer: RequestSigner,
	/// Handle used to build status URLs.
	pub handle: String,
}
impl Poster {
	/// Creates a poster for the default endpoint with the crate's default HTTP client.
	pub fn new(signer: RequestSigner, persona: &Persona) -> Result<Self> {
		let endpoint = config::parse_endpoint(config::DEFAULT_TWEETS_ENDPOINT)?;

		Ok(Self::with_http_client(ReqwestHttpClient::new()?, endpoint, signer, &persona.handle))
	}

	/// Creates a poster that reuses the caller-provided client and endpoint.
	pub fn with_http_client(
		http_client: ReqwestHttpClient,
		endpoint: Url,
		signer: RequestSigner,
		handle: impl Into<String>,
	) -> Self {
		Self { http_client, endpoint, signer, handle: handle.into() }
	}

	/// Overrides the endpoint; it must not carry a query string.
	pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
		self.endpoint = config::parse_endpoint(endpoint)?;

		Ok(self)
	}

	/// Creates the tweet.
	pub async fn post(&self, tweet: &TweetRequest) -> Result<PostedTweet> {
		obs::observe(Operation::Post, "post", async move {
			let request = self.http_client.post(self.endpoint.clone()).json(tweet);
			let request = self.signer.attach_authorization(request, "POST", &self.endpoint)?;
			let raw = http::send(SERVICE, request).await?;
			let response: CreateTweetResponse = error::parse_json(SERVICE, &raw)?;
			let url = status_url(&self.handle, &response.data.id);

			Ok(PostedTweet { id: response.data.id, url })
		})
		.await
	}
}

/// Public URL of a tweet posted by `handle`.
pub fn status_url(handle: &str, id: &str) -> String {
	format!("https://x.com/{handle}/status/{id}")
}
