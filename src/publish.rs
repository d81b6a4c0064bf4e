//! End-to-end milestone announcement: resolve credentials, draft, post, and fall back to manual
//! posting when the API refuses.
//!
//! [`run`] resolves every secret it needs before the first network call, so a misconfigured
//! environment never burns a completion or reaches the tweet endpoint. A failed post is not an
//! error of the run: it is reported as [`PostOutcome::Failed`] together with the text to post
//! by hand.

// self
use crate::{
	_prelude::*,
	auth::{CredentialKeys, Credentials},
	changelog,
	config::{self, Persona, SecretProvider},
	draft::{self, DraftContext, TweetDraft},
	error::ConfigError,
	http::ReqwestHttpClient,
	llm::{MessagesClient, MessagesConfig},
	oauth1::RequestSigner,
	obs::{self, Operation},
	poster::{PostedTweet, Poster, TweetRequest},
};

/// Remote endpoints used by one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Tweet creation endpoint; signed, so it carries no query or fragment.
	pub tweets: Url,
	/// Anthropic Messages endpoint.
	pub messages: Url,
}
impl Endpoints {
	/// Parses both endpoints.
	pub fn new(tweets: &str, messages: &str) -> Result<Self, ConfigError> {
		Ok(Self { tweets: config::parse_endpoint(tweets)?, messages: config::parse_url(messages)? })
	}

	/// Production X and Anthropic endpoints.
	pub fn production() -> Result<Self, ConfigError> {
		Self::new(config::DEFAULT_TWEETS_ENDPOINT, config::DEFAULT_MESSAGES_ENDPOINT)
	}
}

/// What to announce and how.
#[derive(Clone, Debug)]
pub struct TweetJob {
	/// Accounts and product being announced.
	pub persona: Persona,
	/// Version being announced; read from [`TweetJob::changelog`] when absent.
	pub version: Option<String>,
	/// Release notes; read from [`TweetJob::changelog`] when absent.
	pub notes: Option<String>,
	/// Changelog consulted for a missing version or missing notes.
	pub changelog: PathBuf,
	/// Tweet text to post as is; skips drafting.
	pub text: Option<String>,
	/// Tweet to quote.
	pub quote_tweet_id: Option<String>,
	/// Where the posting account's OAuth credentials are looked up.
	pub credential_keys: CredentialKeys,
	/// Model used for drafting.
	pub model: String,
	/// Publish the draft; otherwise stop after drafting.
	pub post: bool,
}
impl TweetJob {
	/// Dry run for `persona` that drafts from `CHANGELOG.md` with the default model.
	pub fn new(persona: Persona) -> Self {
		Self {
			persona,
			version: None,
			notes: None,
			changelog: PathBuf::from("CHANGELOG.md"),
			text: None,
			quote_tweet_id: None,
			credential_keys: CredentialKeys::with_prefix("X_PERSONAL"),
			model: config::DEFAULT_MODEL.into(),
			post: false,
		}
	}

	/// Version and notes for the prompt; the changelog is read only when one of them is missing.
	pub fn context(&self) -> Result<DraftContext> {
		let (version, notes) = match (&self.version, &self.notes) {
			(Some(version), Some(notes)) => (version.clone(), notes.clone()),
			(version, notes) => {
				let latest = changelog::read_latest(&self.changelog)?;

				(version.clone().unwrap_or(latest.version), notes.clone().unwrap_or(latest.notes))
			},
		};
		let version = version.strip_prefix('v').map(str::to_owned).unwrap_or(version);

		Ok(DraftContext { version, notes })
	}
}

/// How the run ended after drafting.
#[derive(Debug)]
pub enum PostOutcome {
	/// Posting was not requested.
	DryRun,
	/// The tweet is live.
	Posted(PostedTweet),
	/// The API refused or could not be reached; `fallback` is to be posted by hand.
	Failed {
		/// Why the post failed.
		error: Error,
		/// Instructions and text for posting manually.
		fallback: String,
	},
}

/// Draft and outcome of one run.
#[derive(Debug)]
pub struct TweetReport {
	/// Text that was (or would have been) posted, plus the suggested quote.
	pub draft: TweetDraft,
	/// What happened after drafting.
	pub outcome: PostOutcome,
}

/// Text shown when the draft has to be posted by hand.
pub fn manual_fallback(persona: &Persona, draft: &TweetDraft) -> String {
	format!("Post this manually from @{}:\n\n{}", persona.handle, draft.personal)
}

/// Resolves credentials, drafts the tweet (unless [`TweetJob::text`] is set), and posts it when
/// [`TweetJob::post`] is set.
pub async fn run(
	job: &TweetJob,
	secrets: &dyn SecretProvider,
	endpoints: &Endpoints,
) -> Result<TweetReport> {
	let http_client = ReqwestHttpClient::new()?;
	let poster = if job.post {
		let signer = RequestSigner::new(Credentials::from_secrets(secrets, &job.credential_keys)?);

		Some(Poster::with_http_client(
			http_client.clone(),
			endpoints.tweets.clone(),
			signer,
			&job.persona.handle,
		))
	} else {
		None
	};
	let draft = match &job.text {
		Some(text) => TweetDraft { personal: text.clone(), quote: String::new() },
		None => {
			let mut config = MessagesConfig::from_secrets(secrets)?.with_model(&job.model);

			config.endpoint = endpoints.messages.clone();

			let ctx = job.context()?;
			let client = MessagesClient::with_http_client(http_client, config);

			draft::draft_tweet(&client, &job.persona, &ctx).await?
		},
	};
	let Some(poster) = poster else {
		return Ok(TweetReport { draft, outcome: PostOutcome::DryRun });
	};
	let mut request = TweetRequest::new(&draft.personal);

	if let Some(id) = &job.quote_tweet_id {
		request = request.quoting(id);
	}

	let outcome = match poster.post(&request).await {
		Ok(posted) => PostOutcome::Posted(posted),
		Err(error) => {
			obs::warn(Operation::Post, "post failed; manual fallback prepared");

			PostOutcome::Failed { fallback: manual_fallback(&job.persona, &draft), error }
		},
	};

	Ok(TweetReport { draft, outcome })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn persona() -> Persona {
		Persona {
			handle: "founder".into(),
			brand_handle: "product_ai".into(),
			product: "Product".into(),
			pitch: "an AI incubator".into(),
			journey_url: "https://journey.example.com".into(),
		}
	}

	#[test]
	fn explicit_context_skips_the_changelog() {
		let job = TweetJob {
			version: Some("v1.2.0".into()),
			notes: Some("Version browser".into()),
			changelog: PathBuf::from("does/not/exist.md"),
			..TweetJob::new(persona())
		};
		let ctx = job.context().expect("Explicit context should not touch the changelog.");

		assert_eq!(ctx, DraftContext { version: "1.2.0".into(), notes: "Version browser".into() });
	}

	#[test]
	fn missing_changelog_is_an_io_error() {
		let job = TweetJob {
			version: Some("1.2.0".into()),
			changelog: PathBuf::from("does/not/exist.md"),
			..TweetJob::new(persona())
		};

		assert!(matches!(job.context(), Err(Error::Io { .. })));
	}

	#[test]
	fn fallback_names_the_posting_account() {
		let draft = TweetDraft { personal: "v1.2.0 is out".into(), quote: String::new() };

		assert_eq!(
			manual_fallback(&persona(), &draft),
			"Post this manually from @founder:\n\nv1.2.0 is out"
		);
	}

	#[test]
	fn endpoints_validate_the_signed_url() {
		Endpoints::production().expect("Production endpoints should parse.");

		assert!(matches!(
			Endpoints::new("https://api.x.com/2/tweets#draft", config::DEFAULT_MESSAGES_ENDPOINT),
			Err(ConfigError::FragmentInEndpoint { .. })
		));
	}
}
