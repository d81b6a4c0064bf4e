//! Drafts a milestone tweet from the latest changelog entry and optionally posts it.
//!
//! Without `--post` the tool only prints the draft. Credentials are resolved from
//! `{PREFIX}_API_KEY`, `{PREFIX}_API_SECRET`, `{PREFIX}_ACCESS_TOKEN`, and
//! `{PREFIX}_ACCESS_SECRET` before any network call.

// std
use std::path::PathBuf;
// crates.io
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
// self
use journey_publish::{
	auth::CredentialKeys,
	config::{self, EnvSecrets, Persona},
	draft::TWEET_LIMIT,
	error::Error,
	publish::{self, Endpoints, PostOutcome, TweetJob},
};

#[derive(Debug, Parser)]
#[command(name = "journey-tweet", version)]
#[command(about = "Draft and post a build-in-public milestone tweet")]
struct Cli {
	/// Version being announced; read from the changelog when omitted.
	version: Option<String>,
	/// What happened in this release; read from the changelog when omitted.
	notes: Option<String>,
	/// Changelog used when the version or notes are not given.
	#[arg(long, default_value = "CHANGELOG.md")]
	changelog: PathBuf,
	/// Handle the tweet is posted from (without `@`).
	#[arg(long, env = "JOURNEY_HANDLE")]
	handle: String,
	/// Product account handle that quotes the tweet (without `@`).
	#[arg(long, env = "JOURNEY_BRAND_HANDLE")]
	brand_handle: String,
	/// Product name.
	#[arg(long, env = "JOURNEY_PRODUCT")]
	product: String,
	/// One-line product pitch.
	#[arg(long, env = "JOURNEY_PITCH")]
	pitch: String,
	/// Public journey site URL.
	#[arg(long, env = "JOURNEY_URL")]
	journey_url: String,
	/// Model used for drafting.
	#[arg(long, env = "ANTHROPIC_MODEL", default_value = config::DEFAULT_MODEL)]
	model: String,
	/// Use this text instead of drafting one.
	#[arg(long)]
	text: Option<String>,
	/// Quote an existing tweet.
	#[arg(long)]
	quote_tweet_id: Option<String>,
	/// Prefix of the credential environment variables.
	#[arg(long, default_value = "X_PERSONAL")]
	credentials_prefix: String,
	/// Tweet creation endpoint.
	#[arg(long, env = "X_TWEETS_ENDPOINT", default_value = config::DEFAULT_TWEETS_ENDPOINT)]
	endpoint: String,
	/// Anthropic Messages endpoint.
	#[arg(
		long,
		env = "ANTHROPIC_MESSAGES_ENDPOINT",
		default_value = config::DEFAULT_MESSAGES_ENDPOINT
	)]
	messages_endpoint: String,
	/// Publish the tweet; otherwise only print the draft.
	#[arg(long)]
	post: bool,
}
impl Cli {
	fn job(self) -> TweetJob {
		TweetJob {
			persona: Persona {
				handle: self.handle,
				brand_handle: self.brand_handle,
				product: self.product,
				pitch: self.pitch,
				journey_url: self.journey_url,
			},
			version: self.version,
			notes: self.notes,
			changelog: self.changelog,
			text: self.text,
			quote_tweet_id: self.quote_tweet_id,
			credential_keys: CredentialKeys::with_prefix(&self.credentials_prefix),
			model: self.model,
			post: self.post,
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let cli = Cli::parse();
	let endpoints = Endpoints::new(&cli.endpoint, &cli.messages_endpoint)?;
	let job = cli.job();

	if job.text.is_none() {
		tracing::info!(model = %job.model, "drafting tweet");
	}

	let report = match publish::run(&job, &EnvSecrets, &endpoints).await {
		Ok(report) => report,
		Err(Error::Response(e)) => {
			tracing::error!(raw = e.raw(), "model reply is not a draft");

			return Err(e.into());
		},
		Err(e) => return Err(e.into()),
	};
	let draft = &report.draft;

	println!(
		"Personal tweet ({}/{TWEET_LIMIT} chars):\n\n{}\n",
		draft.personal_len(),
		draft.personal
	);

	if !draft.fits() {
		tracing::warn!(chars = draft.personal_len(), "tweet exceeds {TWEET_LIMIT} characters");
	}
	if !draft.quote.is_empty() {
		println!("Suggested quote for @{}:\n\n{}\n", job.persona.brand_handle, draft.quote);
	}

	match report.outcome {
		PostOutcome::DryRun => {
			println!("Dry run; pass --post to publish.");

			Ok(())
		},
		PostOutcome::Posted(posted) => {
			println!("Posted: {}", posted.url);
			println!(
				"Next: open {} as @{} and quote it with the suggested text.",
				posted.url, job.persona.brand_handle
			);

			Ok(())
		},
		PostOutcome::Failed { error, fallback } => {
			eprintln!("Posting failed: {error}");
			eprintln!("{fallback}");

			Err(error.into())
		},
	}
}
