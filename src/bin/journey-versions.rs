//! Stamps the repository's described version into the live site, and renders the browser page
//! listing every frozen release.

// std
use std::{fs, path::PathBuf};
// crates.io
use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
// self
use journey_publish::versions::{self, GitRepo};

#[derive(Debug, Parser)]
#[command(name = "journey-versions", version)]
#[command(about = "Stamp the site version and render the release browser")]
struct Cli {
	/// Any path inside the repository the site is released from.
	#[arg(long, global = true, default_value = ".")]
	repo: PathBuf,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Write `git describe --tags --always` into `package.json` and the site pages.
	Inject {
		/// Package manifest; skipped when absent.
		#[arg(long, default_value = "package.json")]
		package: PathBuf,
		/// Directory whose top-level `.html` pages are stamped.
		#[arg(long, default_value = "site")]
		site: PathBuf,
	},
	/// Render the list of frozen releases.
	Browse {
		/// Directory holding one `v<X.Y.Z>` snapshot per release.
		#[arg(long, default_value = "site/versions")]
		versions: PathBuf,
		/// Page template holding the `<!-- VERSION_ENTRIES -->` marker.
		#[arg(long, default_value = "scripts/versions-template.html")]
		template: PathBuf,
		/// Rendered page; defaults to `index.html` inside the versions directory.
		#[arg(long)]
		output: Option<PathBuf>,
		/// Changelog the release summaries are taken from; skipped when absent.
		#[arg(long, default_value = "CHANGELOG.md")]
		changelog: PathBuf,
	},
}

fn inject(repo: &GitRepo, package: PathBuf, site: PathBuf) -> Result<()> {
	let described = repo.describe()?;
	let semver = versions::package_version(&described);

	if package.exists() {
		let previous = versions::stamp_manifest_file(&package, semver)?;

		println!(
			"{}: {} -> {semver}",
			package.display(),
			previous.as_deref().unwrap_or("(none)")
		);
	} else {
		tracing::warn!(path = %package.display(), "package manifest not found; skipped");
	}

	for page in versions::stamp_site(&site, &described)? {
		println!("{}: injected {described}", page.display());
	}

	println!("Version: {described}");

	Ok(())
}

fn browse(
	repo: &GitRepo,
	versions_dir: PathBuf,
	template: PathBuf,
	output: Option<PathBuf>,
	changelog: PathBuf,
) -> Result<()> {
	let releases = versions::scan_releases(&versions_dir)?;
	let names = releases.iter().map(|r| r.version.as_str()).collect::<Vec<_>>();

	tracing::info!(count = releases.len(), versions = ?names, "releases found");

	let changelog = if changelog.exists() {
		Some(fs::read_to_string(&changelog)?)
	} else {
		tracing::warn!(path = %changelog.display(), "changelog not found; notes skipped");

		None
	};
	let entries = versions::version_entries(releases, changelog.as_deref(), |version| {
		repo.tag_date(version)
			.inspect_err(|e| tracing::warn!(version, error = %e, "release date unavailable"))
			.ok()
	});
	let output = output.unwrap_or_else(|| versions_dir.join("index.html"));

	versions::write_page(&template, &output, &entries)?;
	tracing::info!(entries = entries.len(), output = %output.display(), "version browser written");

	Ok(())
}

fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let cli = Cli::parse();
	let repo = GitRepo::discover(&cli.repo)?;

	match cli.command {
		Command::Inject { package, site } => inject(&repo, package, site),
		Command::Browse { versions, template, output, changelog } =>
			browse(&repo, versions, template, output, changelog),
	}
}
