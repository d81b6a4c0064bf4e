//! Aggregates the configured changelogs, has the model curate milestones, and renders the
//! public timeline page.

// std
use std::path::PathBuf;
// crates.io
use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use tracing_subscriber::EnvFilter;
// self
use journey_publish::{
	changelog,
	config::{self, EnvSecrets},
	error::Error,
	http::ReqwestHttpClient,
	llm::{MessagesClient, MessagesConfig},
	timeline,
};

#[derive(Debug, Parser)]
#[command(name = "journey-timeline", version)]
#[command(about = "Render the build-in-public timeline from changelogs")]
struct Cli {
	/// JSON array of `{ repo, label, url, local }` changelog sources.
	#[arg(long, default_value = "timeline-sources.json")]
	sources: PathBuf,
	/// Page template holding the `<!-- TIMELINE_ENTRIES -->` marker.
	#[arg(long, default_value = "timeline.template.html")]
	template: PathBuf,
	/// Rendered page.
	#[arg(long, default_value = "public/timeline.html")]
	output: PathBuf,
	/// Product name.
	#[arg(long, env = "JOURNEY_PRODUCT")]
	product: String,
	/// One-line product pitch.
	#[arg(long, env = "JOURNEY_PITCH")]
	pitch: String,
	/// Model used for curation.
	#[arg(long, env = "ANTHROPIC_MODEL", default_value = config::DEFAULT_MODEL)]
	model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let cli = Cli::parse();
	let config = MessagesConfig::from_secrets(&EnvSecrets)?.with_model(&cli.model);
	let sources = changelog::load_sources(&cli.sources)?;
	let http_client = ReqwestHttpClient::new()?;
	let collected = changelog::collect(&http_client, &sources).await;

	for skipped in &collected.skipped {
		tracing::warn!(repo = %skipped.repo, reason = %skipped.reason, "changelog skipped");
	}
	if collected.is_empty() {
		return Err(eyre!("no changelog content found in {} sources", sources.len()));
	}

	tracing::info!(included = ?collected.included, "changelogs collected");

	let client = MessagesClient::with_http_client(http_client, config);
	let entries = match timeline::curate(&client, &cli.product, &cli.pitch, &collected.text).await {
		Ok(entries) => entries,
		Err(Error::Response(e)) => {
			tracing::error!(raw = e.raw(), "model reply is not a timeline entry array");

			return Err(e.into());
		},
		Err(e) => return Err(e.into()),
	};

	timeline::write_page(&cli.template, &cli.output, &entries)?;
	tracing::info!(entries = entries.len(), output = %cli.output.display(), "timeline written");

	Ok(())
}
