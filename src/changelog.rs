//! Changelog discovery: the latest entry of one changelog, and aggregation of several sources.
//!
//! Sources are explicit configuration ([`ChangelogSource`], usually loaded from a JSON file with
//! [`load_sources`]). Each source is read from its local checkout when the file exists and
//! fetched from its raw URL otherwise. Sources that cannot be read are skipped and reported in
//! [`Collected::skipped`] rather than failing the whole run.

// std
use std::{fs, sync::LazyLock};
// crates.io
use regex::Regex;
// self
use crate::{_prelude::*, error::ConfigError};
#[cfg(feature = "reqwest")]
use crate::{
	http::{self, ReqwestHttpClient},
	obs::{self, Operation, OpSpan, Outcome},
};

static HEADING: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^## .+$").expect("Heading pattern is valid."));
static SEMVER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"v?(\d+\.\d+\.\d+)").expect("Version pattern is valid."));

/// Version and flattened notes of one changelog section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangelogEntry {
	/// `X.Y.Z` taken from the heading, `latest` when the heading has none, or `unknown` when the
	/// changelog has no `## ` heading at all.
	pub version: String,
	/// Non-empty section lines, trimmed, joined with `. `; `---` rules are dropped.
	pub notes: String,
}

/// Extracts the first `## ` section of a markdown changelog.
pub fn latest_entry(content: &str) -> ChangelogEntry {
	let Some(heading) = HEADING.find(content) else {
		return ChangelogEntry { version: "unknown".into(), notes: "New milestone".into() };
	};
	let rest = &content[heading.end()..];
	let section = rest.find("\n## ").map_or(rest, |end| &rest[..end]);
	let notes = section
		.split('\n')
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with("---"))
		.collect::<Vec<_>>()
		.join(". ");
	let version = SEMVER
		.captures(heading.as_str())
		.and_then(|caps| caps.get(1))
		.map_or_else(|| "latest".to_owned(), |m| m.as_str().to_owned());

	ChangelogEntry { version, notes }
}

/// Reads `path` and extracts its latest entry.
pub fn read_latest(path: &Path) -> Result<ChangelogEntry> {
	let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

	Ok(latest_entry(&content))
}

/// One changelog to aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSource {
	/// Repository name, used in section headers and reports.
	pub repo: String,
	/// Human label (`Product`, `Brand`, ...).
	pub label: String,
	/// Raw URL fetched when the local file is absent.
	pub url: Url,
	/// Local checkout path, preferred when it exists.
	pub local: PathBuf,
}
impl ChangelogSource {
	/// Renders the content under this source's section header.
	pub fn section(&self, content: &str) -> String {
		format!("--- SOURCE: {} ({}) ---\n{content}", self.repo, self.label)
	}
}

/// Parses a JSON array of [`ChangelogSource`] values.
pub fn parse_sources(raw: &str) -> Result<Vec<ChangelogSource>, ConfigError> {
	let mut de = serde_json::Deserializer::from_str(raw);

	serde_path_to_error::deserialize(&mut de).map_err(|source| ConfigError::InvalidSources { source })
}

/// Loads sources from a JSON file; relative `local` paths resolve against the file's directory.
pub fn load_sources(path: &Path) -> Result<Vec<ChangelogSource>> {
	let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
	let base = path.parent().unwrap_or_else(|| Path::new(""));
	let sources = parse_sources(&raw)?
		.into_iter()
		.map(|mut source| {
			if source.local.is_relative() {
				source.local = base.join(&source.local);
			}

			source
		})
		.collect();

	Ok(sources)
}

/// A source that contributed nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSource {
	/// Repository name.
	pub repo: String,
	/// Why it was skipped.
	pub reason: String,
}

/// Result of aggregating every configured source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collected {
	/// Sections joined with a blank line, in source order.
	pub text: String,
	/// Repositories that contributed a section.
	pub included: Vec<String>,
	/// Repositories that did not.
	pub skipped: Vec<SkippedSource>,
}
impl Collected {
	/// Whether no source contributed any text.
	pub fn is_empty(&self) -> bool {
		self.text.trim().is_empty()
	}

	#[cfg(any(test, feature = "reqwest"))]
	fn push(&mut self, source: &ChangelogSource, content: String) {
		if content.is_empty() {
			self.skip(source, "changelog is empty".into());

			return;
		}
		if !self.text.is_empty() {
			self.text.push_str("\n\n");
		}

		self.text.push_str(&source.section(&content));
		self.included.push(source.repo.clone());
	}

	#[cfg(any(test, feature = "reqwest"))]
	fn skip(&mut self, source: &ChangelogSource, reason: String) {
		crate::obs::record_skipped_source(&source.repo);
		self.skipped.push(SkippedSource { repo: source.repo.clone(), reason });
	}
}

/// Aggregates every source, local file first and raw URL as fallback.
#[cfg(feature = "reqwest")]
pub async fn collect(client: &ReqwestHttpClient, sources: &[ChangelogSource]) -> Collected {
	const OP: Operation = Operation::Collect;

	let span = OpSpan::new(OP, "collect");

	obs::record_outcome(OP, Outcome::Attempt);

	let collected = span
		.instrument(async move {
			let mut collected = Collected::default();

			for source in sources {
				let content = if source.local.exists() {
					fs::read_to_string(&source.local)
						.map_err(|e| format!("failed to read {}: {e}", source.local.display()))
				} else {
					http::send("changelog", client.get(source.url.clone()))
						.await
						.map_err(|e| format!("failed to fetch {}: {e}", source.url))
				};

				match content {
					Ok(content) => collected.push(source, content),
					Err(reason) => {
						obs::warn(OP, &format!("skipping {}: {reason}", source.repo));
						collected.skip(source, reason);
					},
				}
			}

			collected
		})
		.await;
	let outcome = if collected.is_empty() { Outcome::Failure } else { Outcome::Success };

	span.record(outcome);
	obs::record_outcome(OP, outcome);

	collected
}
