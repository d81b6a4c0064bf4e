//! Release versioning: version stamping of the live site and the frozen-release browser page.
//!
//! Every release of the site is frozen under `versions/v<X.Y.Z>/`. [`scan_releases`] lists those
//! snapshots newest first, [`release_notes`] pulls a one-line summary for each from the
//! changelog, and [`render`] fills the browser template. [`stamp_html`] and [`stamp_manifest`]
//! write the repository's described version into the live pages and `package.json`.
//!
//! Repository access ([`GitRepo`]) lives behind the `git` feature; everything else works on
//! plain strings and directories.

// std
use std::{cmp::Reverse, fs, sync::LazyLock};
// crates.io
use regex::{NoExpand, Regex};
use serde_json::{Map, Value};
use time::{UtcOffset, format_description::well_known::Rfc3339};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	obs::{Operation, OpSpan},
	timeline::{self, escape_html},
};

/// Placeholder replaced by the described version in live pages.
pub const VERSION_MARKER: &str = "<!-- VERSION -->";
/// Marker in the browser template that receives the rendered releases.
pub const ENTRIES_MARKER: &str = "<!-- VERSION_ENTRIES -->";
/// Shown when a release tag cannot be resolved to a commit.
pub const UNKNOWN_DATE: &str = "Unknown date";

static DATA_VERSION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"data-version="[^"]*""#).expect("Data version pattern is valid.")
});

/// One frozen release directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Release {
	/// Directory name, which is also the release tag (`v0.2.0`).
	pub version: String,
	/// Number of `.html` pages in the snapshot.
	pub pages: usize,
}

/// A release as listed on the browser page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionEntry {
	/// Release tag.
	pub version: String,
	/// Author date of the tagged commit; `None` when the tag could not be resolved.
	pub date: Option<OffsetDateTime>,
	/// Number of pages in the snapshot.
	pub pages: usize,
	/// One-line summary from the changelog.
	pub notes: Option<String>,
}

/// Numeric `(major, minor, patch)` of a release name; missing or non-numeric parts count as zero.
pub fn semver_key(version: &str) -> (u64, u64, u64) {
	let bare = version.strip_prefix('v').unwrap_or(version);
	let mut parts = bare.split('.').map(|part| part.parse().unwrap_or(0));

	(parts.next().unwrap_or(0), parts.next().unwrap_or(0), parts.next().unwrap_or(0))
}

/// Sorts releases newest first by numeric semver; ties keep their order.
pub fn sort_newest_first(releases: &mut [Release]) {
	releases.sort_by_key(|release| Reverse(semver_key(&release.version)));
}

/// Lists the `v*` snapshot directories under `versions_dir`, newest first.
pub fn scan_releases(versions_dir: &Path) -> Result<Vec<Release>> {
	let mut releases = Vec::new();

	for dir in fs::read_dir(versions_dir).map_err(|e| Error::io(versions_dir, e))? {
		let dir = dir.map_err(|e| Error::io(versions_dir, e))?;
		let path = dir.path();
		let Some(version) = dir.file_name().to_str().map(str::to_owned) else {
			continue;
		};

		if !version.starts_with('v') || !path.is_dir() {
			continue;
		}

		releases.push(Release { pages: count_pages(&path)?, version });
	}

	sort_newest_first(&mut releases);

	Ok(releases)
}

fn count_pages(dir: &Path) -> Result<usize> {
	let mut pages = 0;

	for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
		let entry = entry.map_err(|e| Error::io(dir, e))?;

		if entry.file_name().to_string_lossy().ends_with(".html") {
			pages += 1;
		}
	}

	Ok(pages)
}

/// Summary of `version` in `changelog`: the first `### ` title of its section, otherwise the
/// first line with any list bullet removed.
///
/// The section starts at the first `## ` heading mentioning the bare version and runs to the
/// next `## ` heading. Blank lines and `---` rules are ignored.
pub fn release_notes(changelog: &str, version: &str) -> Option<String> {
	let bare = version.strip_prefix('v').unwrap_or(version);
	let heading = Regex::new(&format!("## [^\\n]*{}", regex::escape(bare))).ok()?;
	let found = heading.find(changelog)?;
	let start = found.start() + changelog[found.start()..].find('\n')? + 1;
	let rest = &changelog[start..];
	let section = rest.find("\n## ").map_or(rest, |end| &rest[..end]);
	let lines = section
		.split('\n')
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with("---"))
		.collect::<Vec<_>>();
	let summary = match lines.iter().copied().find_map(|line| line.strip_prefix("### ")) {
		Some(title) => title,
		None => {
			let first = *lines.first()?;

			first.strip_prefix("- ").or_else(|| first.strip_prefix("* ")).unwrap_or(first)
		},
	};

	Some(summary.to_owned())
}

/// Pairs each release with its date and changelog summary, keeping the release order.
pub fn version_entries<F>(
	releases: Vec<Release>,
	changelog: Option<&str>,
	mut date_of: F,
) -> Vec<VersionEntry>
where
	F: FnMut(&str) -> Option<OffsetDateTime>,
{
	releases
		.into_iter()
		.map(|release| VersionEntry {
			date: date_of(&release.version),
			notes: changelog.and_then(|changelog| release_notes(changelog, &release.version)),
			version: release.version,
			pages: release.pages,
		})
		.collect()
}

/// Converts a commit timestamp and its UTC offset in minutes into a date-time.
pub fn commit_time(seconds: i64, offset_minutes: i32) -> Option<OffsetDateTime> {
	let offset = UtcOffset::from_whole_seconds(offset_minutes.checked_mul(60)?).ok()?;

	Some(OffsetDateTime::from_unix_timestamp(seconds).ok()?.to_offset(offset))
}

/// Renders one release as a browser entry; `latest` marks the newest release.
pub fn render_entry(entry: &VersionEntry, latest: bool) -> String {
	let version = escape_html(&entry.version);
	let when = match entry.date {
		Some(date) => match date.format(&Rfc3339) {
			Ok(iso) =>
				format!("<time datetime=\"{iso}\">{}</time>", timeline::long_date(date.date())),
			Err(_) => format!("<time>{}</time>", timeline::long_date(date.date())),
		},
		None => format!("<time>{UNKNOWN_DATE}</time>"),
	};
	let notes = entry
		.notes
		.as_deref()
		.filter(|notes| !notes.is_empty())
		.map(|notes| format!("<p class=\"ver-notes\">{}</p>", escape_html(notes)))
		.unwrap_or_default();

	format!(
		r#"
    <a href="{version}/" class="ver-entry{latest_class}">
      <div class="ver-badge">{version}</div>
      <div class="ver-info">
        <div class="ver-meta">
          {when}
          <span class="ver-files">{pages} page{plural}</span>
          {tag}
        </div>
        {notes}
      </div>
      <span class="ver-arrow">&rarr;</span>
    </a>"#,
		latest_class = if latest { " ver-latest" } else { "" },
		pages = entry.pages,
		plural = if entry.pages == 1 { "" } else { "s" },
		tag = if latest { r#"<span class="ver-tag">latest</span>"# } else { "" },
	)
}

/// Replaces [`ENTRIES_MARKER`] in `template` with the rendered releases, newest first.
pub fn render(template: &str, entries: &[VersionEntry]) -> Result<String, ConfigError> {
	let _guard = OpSpan::new(Operation::Render, "versions").entered();
	let html = entries
		.iter()
		.enumerate()
		.map(|(i, entry)| render_entry(entry, i == 0))
		.collect::<Vec<_>>()
		.join("\n");

	timeline::fill_marker(template, ENTRIES_MARKER, &html)
}

/// Renders `entries` into the template at `template_path` and writes the page to `output_path`.
pub fn write_page(template_path: &Path, output_path: &Path, entries: &[VersionEntry]) -> Result<()> {
	let template = fs::read_to_string(template_path).map_err(|e| Error::io(template_path, e))?;

	timeline::write_output(output_path, render(&template, entries)?)
}

/// Version recorded in `package.json`: the described version without its leading `v`.
pub fn package_version(described: &str) -> &str {
	described.strip_prefix('v').unwrap_or(described)
}

/// Replaces every [`VERSION_MARKER`] and every `data-version` attribute with `version`.
///
/// Returns `None` when the page carries neither.
pub fn stamp_html(html: &str, version: &str) -> Option<String> {
	if !html.contains(VERSION_MARKER) && !DATA_VERSION.is_match(html) {
		return None;
	}

	let version = escape_html(version);
	let attribute = format!("data-version=\"{version}\"");
	let stamped = html.replace(VERSION_MARKER, &version);

	Some(DATA_VERSION.replace_all(&stamped, NoExpand(&attribute)).into_owned())
}

/// Result of rewriting a package manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestStamp {
	/// Version the manifest carried before, if any.
	pub previous: Option<String>,
	/// Rewritten manifest: two-space indented, key order kept, trailing newline.
	pub json: String,
}

/// Sets the top-level `version` of a `package.json` document.
pub fn stamp_manifest(raw: &str, version: &str) -> Result<ManifestStamp, ConfigError> {
	let mut manifest = serde_json::from_str::<Map<String, Value>>(raw)
		.map_err(|source| ConfigError::InvalidManifest { source })?;
	let previous = manifest
		.insert("version".into(), Value::String(version.to_owned()))
		.map(|previous| match previous {
			Value::String(previous) => previous,
			other => other.to_string(),
		});
	let mut json = serde_json::to_string_pretty(&manifest)
		.map_err(|source| ConfigError::InvalidManifest { source })?;

	json.push('\n');

	Ok(ManifestStamp { previous, json })
}

/// Rewrites the manifest at `path` in place and returns the version it carried before.
pub fn stamp_manifest_file(path: &Path, version: &str) -> Result<Option<String>> {
	let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
	let stamp = stamp_manifest(&raw, version)?;

	fs::write(path, stamp.json).map_err(|e| Error::io(path, e))?;

	Ok(stamp.previous)
}

/// Stamps every top-level `.html` page in `site_dir`; returns the rewritten pages by name.
pub fn stamp_site(site_dir: &Path, version: &str) -> Result<Vec<PathBuf>> {
	let _guard = OpSpan::new(Operation::Inject, "stamp_site").entered();
	let mut pages = Vec::new();

	for entry in fs::read_dir(site_dir).map_err(|e| Error::io(site_dir, e))? {
		let path = entry.map_err(|e| Error::io(site_dir, e))?.path();

		if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
			pages.push(path);
		}
	}

	pages.sort();

	let mut stamped = Vec::new();

	for page in pages {
		let html = fs::read_to_string(&page).map_err(|e| Error::io(&page, e))?;

		if let Some(html) = stamp_html(&html, version) {
			fs::write(&page, html).map_err(|e| Error::io(&page, e))?;
			stamped.push(page);
		}
	}

	Ok(stamped)
}

/// Read-only view of the repository the site is released from.
#[cfg(feature = "git")]
pub struct GitRepo(git2::Repository);
#[cfg(feature = "git")]
impl GitRepo {
	/// Opens the repository containing `path`.
	pub fn discover(path: &Path) -> Result<Self> {
		Ok(Self(git2::Repository::discover(path)?))
	}

	/// Describes `HEAD` like `git describe --tags --always`: `v0.1.0` on a tag,
	/// `v0.1.0-3-gabc123f` past one, and the abbreviated commit id without tags.
	pub fn describe(&self) -> Result<String> {
		let _guard = OpSpan::new(Operation::Describe, "describe").entered();
		let mut options = git2::DescribeOptions::new();

		options.describe_tags().show_commit_oid_as_fallback(true);

		let mut format = git2::DescribeFormatOptions::new();

		format.abbreviated_size(7);

		Ok(self.0.describe(&options)?.format(Some(&format))?)
	}

	/// Author date of the commit `tag` points at.
	pub fn tag_date(&self, tag: &str) -> Result<OffsetDateTime> {
		let _guard = OpSpan::new(Operation::Describe, "tag_date").entered();
		let commit = self.0.revparse_single(tag)?.peel_to_commit()?;
		let when = commit.author().when();

		commit_time(when.seconds(), when.offset_minutes())
			.ok_or_else(|| git2::Error::from_str("commit time is out of range").into())
	}
}
#[cfg(feature = "git")]
impl Debug for GitRepo {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("GitRepo").field(&self.0.path()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	const CHANGELOG: &str = "# Changelog

## [0.10.0] - 2026-04-02

### Version browser

- Frozen releases are listed

## v0.2.0

---
- Timeline page
- Signed posting

## 0.1.0
";

	fn release(version: &str) -> Release {
		Release { version: version.into(), pages: 1 }
	}

	fn temp_dir(label: &str) -> PathBuf {
		let unique = format!(
			"journey_publish_versions_{label}_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);
		let dir = env::temp_dir().join(unique);

		fs::create_dir_all(&dir).expect("Failed to create temporary test directory.");

		dir
	}

	#[test]
	fn releases_sort_numerically_newest_first() {
		let mut releases =
			["v0.2.0", "v0.10.0", "v1.0.0", "v0.9.12", "v0.9.2"].map(release).to_vec();

		sort_newest_first(&mut releases);

		let order = releases.iter().map(|r| r.version.as_str()).collect::<Vec<_>>();

		assert_eq!(order, ["v1.0.0", "v0.10.0", "v0.9.12", "v0.9.2", "v0.2.0"]);
	}

	#[test]
	fn malformed_version_parts_count_as_zero() {
		assert_eq!(semver_key("v1.2.3"), (1, 2, 3));
		assert_eq!(semver_key("v2"), (2, 0, 0));
		assert_eq!(semver_key("v1.x.4"), (1, 0, 4));
		assert_eq!(semver_key("1.2.3-rc1"), (1, 2, 0));
	}

	#[test]
	fn notes_prefer_subheading_title() {
		assert_eq!(release_notes(CHANGELOG, "v0.10.0").as_deref(), Some("Version browser"));
	}

	#[test]
	fn notes_fall_back_to_first_bullet() {
		assert_eq!(release_notes(CHANGELOG, "v0.2.0").as_deref(), Some("Timeline page"));
		assert_eq!(
			release_notes("## 1.0.0\n* Starred bullet\n", "v1.0.0").as_deref(),
			Some("Starred bullet")
		);
	}

	#[test]
	fn notes_are_absent_for_empty_or_unknown_sections() {
		assert_eq!(release_notes(CHANGELOG, "v0.1.0"), None);
		assert_eq!(release_notes(CHANGELOG, "v3.0.0"), None);
		assert_eq!(release_notes("## 0.3.0", "v0.3.0"), None);
	}

	#[test]
	fn notes_match_version_dots_literally() {
		assert_eq!(release_notes("## 1x2y3\n- Wrong release\n", "v1.2.3"), None);
	}

	#[test]
	fn stamp_replaces_every_marker_and_attribute() {
		let html = "<footer><!-- VERSION --> | <!-- VERSION --></footer>\
			<body data-version=\"dev\"><main data-version=\"\"></main>";
		let stamped = stamp_html(html, "v0.2.0-3-gabc123f").expect("Page has markers.");

		assert_eq!(
			stamped,
			"<footer>v0.2.0-3-gabc123f | v0.2.0-3-gabc123f</footer>\
			 <body data-version=\"v0.2.0-3-gabc123f\"><main data-version=\"v0.2.0-3-gabc123f\"></main>"
		);
		assert_eq!(stamp_html("<p>no markers</p>", "v1.0.0"), None);
	}

	#[test]
	fn stamp_does_not_expand_replacement_syntax() {
		assert_eq!(
			stamp_html("<b data-version=\"x\"></b>", "$0").as_deref(),
			Some("<b data-version=\"$0\"></b>")
		);
	}

	#[test]
	fn manifest_keeps_key_order_and_reports_previous_version() {
		let stamp = stamp_manifest(
			"{\"name\":\"site\",\"version\":\"0.0.0\",\"private\":true}",
			package_version("v0.2.0"),
		)
		.expect("Manifest should stamp.");

		assert_eq!(stamp.previous.as_deref(), Some("0.0.0"));
		assert_eq!(
			stamp.json,
			"{\n  \"name\": \"site\",\n  \"version\": \"0.2.0\",\n  \"private\": true\n}\n"
		);
		assert!(matches!(stamp_manifest("[]", "1.0.0"), Err(ConfigError::InvalidManifest { .. })));
	}

	#[test]
	fn package_version_drops_leading_v_only() {
		assert_eq!(package_version("v0.1.0-3-gabc123f"), "0.1.0-3-gabc123f");
		assert_eq!(package_version("abc123f"), "abc123f");
	}

	#[test]
	fn commit_time_keeps_author_offset() {
		let date = commit_time(1_772_355_600, 60).expect("Fixture time is in range.");

		assert_eq!(date.format(&Rfc3339).expect("Date should format."), "2026-03-01T10:00:00+01:00");
		assert_eq!(commit_time(0, i32::MAX), None);
	}

	#[test]
	fn entries_render_latest_first_with_plural_pages() {
		let releases = vec![Release { version: "v0.2.0".into(), pages: 3 }, release("v0.1.0")];
		let entries = version_entries(releases, Some(CHANGELOG), |version| {
			(version == "v0.2.0").then(|| commit_time(1_772_355_600, 60)).flatten()
		});
		let page = render("<main><!-- VERSION_ENTRIES --></main>", &entries)
			.expect("Template with marker should render.");

		assert!(page.starts_with("<main>\n    <a href=\"v0.2.0/\" class=\"ver-entry ver-latest\">"));
		assert!(page.contains("<time datetime=\"2026-03-01T10:00:00+01:00\">March 1, 2026</time>"));
		assert!(page.contains("<span class=\"ver-files\">3 pages</span>"));
		assert!(page.contains("<span class=\"ver-tag\">latest</span>"));
		assert!(page.contains("<p class=\"ver-notes\">Timeline page</p>"));
		assert!(page.contains("</a>\n\n    <a href=\"v0.1.0/\" class=\"ver-entry\">"));
		assert!(page.contains("<time>Unknown date</time>"));
		assert!(page.contains("<span class=\"ver-files\">1 page</span>"));
		assert_eq!(page.matches("ver-tag").count(), 1);
		assert_eq!(page.matches("ver-notes").count(), 1);
		assert!(matches!(
			render("<main></main>", &entries),
			Err(ConfigError::MissingPlaceholder { marker: ENTRIES_MARKER })
		));
	}

	#[test]
	fn scan_lists_version_directories_with_page_counts() {
		let dir = temp_dir("scan");

		for (version, pages) in [("v0.2.0", 2), ("v0.10.0", 1), ("draft", 4)] {
			let snapshot = dir.join(version);

			fs::create_dir_all(&snapshot).expect("Failed to create snapshot fixture.");

			for page in 0..pages {
				fs::write(snapshot.join(format!("p{page}.html")), "<p></p>")
					.expect("Failed to write page fixture.");
			}
		}

		fs::write(dir.join("v9.9.9.html"), "").expect("Failed to write stray file fixture.");
		fs::write(dir.join("v0.2.0").join("style.css"), "").expect("Failed to write asset fixture.");

		let releases = scan_releases(&dir).expect("Versions directory should scan.");

		assert_eq!(releases, vec![
			Release { version: "v0.10.0".into(), pages: 1 },
			Release { version: "v0.2.0".into(), pages: 2 },
		]);

		fs::remove_dir_all(&dir).expect("Failed to clean up temporary test directory.");
	}

	#[test]
	fn site_stamping_reports_only_rewritten_pages() {
		let dir = temp_dir("stamp");

		fs::write(dir.join("index.html"), "<footer><!-- VERSION --></footer>")
			.expect("Failed to write page fixture.");
		fs::write(dir.join("about.html"), "<p>static</p>").expect("Failed to write page fixture.");
		fs::write(dir.join("notes.txt"), "<!-- VERSION -->").expect("Failed to write text fixture.");

		let stamped = stamp_site(&dir, "v0.2.0").expect("Site should stamp.");

		assert_eq!(stamped, vec![dir.join("index.html")]);
		assert_eq!(
			fs::read_to_string(dir.join("index.html")).expect("Stamped page should be readable."),
			"<footer>v0.2.0</footer>"
		);
		assert_eq!(
			fs::read_to_string(dir.join("notes.txt")).expect("Text file should be readable."),
			"<!-- VERSION -->"
		);

		fs::remove_dir_all(&dir).expect("Failed to clean up temporary test directory.");
	}

	#[cfg(feature = "git")]
	#[test]
	fn repository_describes_tags_and_dates() {
		let dir = temp_dir("git");
		let repo = git2::Repository::init(&dir).expect("Repository should initialize.");
		let when = git2::Time::new(1_772_355_600, 60);
		let signature =
			git2::Signature::new("Founder", "founder@example.com", &when).expect("Signature is valid.");
		let tree_id = repo
			.index()
			.and_then(|mut index| index.write_tree())
			.expect("Empty tree should write.");
		let tree = repo.find_tree(tree_id).expect("Tree should exist.");
		let commit_id = repo
			.commit(Some("HEAD"), &signature, &signature, "Release", &tree, &[])
			.expect("Commit should be created.");
		let commit = repo.find_commit(commit_id).expect("Commit should exist.");
		let git = GitRepo::discover(&dir).expect("Repository should be discovered.");
		let abbreviated = git.describe().expect("Untagged head should describe as its id.");

		assert_eq!(abbreviated.len(), 7);
		assert!(commit_id.to_string().starts_with(&abbreviated));

		repo.tag_lightweight("v0.1.0", commit.as_object(), false).expect("Tag should be created.");

		assert_eq!(git.describe().expect("Tagged head should describe."), "v0.1.0");
		assert_eq!(
			git.tag_date("v0.1.0").expect("Tag should resolve."),
			commit_time(1_772_355_600, 60).expect("Fixture time is in range.")
		);
		assert!(git.tag_date("v9.9.9").is_err());

		fs::remove_dir_all(&dir).expect("Failed to clean up temporary test directory.");
	}
}
