//! Public timeline page: curation prompt, curated entry parsing, and static HTML rendering.

// std
use std::fs;
// crates.io
use time::{Date, format_description::well_known::Rfc3339, macros::format_description};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ResponseError},
	obs::{Operation, OpSpan},
};
#[cfg(feature = "reqwest")] use crate::llm::MessagesClient;

/// Marker in the page template that receives the rendered entries.
pub const ENTRIES_MARKER: &str = "<!-- TIMELINE_ENTRIES -->";

#[cfg(feature = "reqwest")]
const CURATE_MAX_TOKENS: u32 = 4096;
const SERVICE: &str = "anthropic";

/// One curated milestone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
	/// ISO 8601 timestamp with offset.
	pub timestamp: String,
	/// `City, Country`.
	pub location: String,
	/// Short milestone title.
	pub title: String,
	/// One or two sentences on what happened and why it matters.
	pub description: String,
	/// `brand`, `product`, `infrastructure`, `launch`, or `decision`.
	pub category: String,
	/// Single emoji.
	pub icon: String,
}

/// Builds the curation prompt for `product` over the aggregated changelogs.
pub fn curation_prompt(product: &str, pitch: &str, changelogs: &str) -> String {
	format!(
		"You are curating a public timeline for {product}, {pitch}, built in public.

Below are changelogs from several repositories. Select the entries that are substantial and \
interesting to a public audience: milestones, key decisions, launches, completed phases. Skip \
minor housekeeping such as file renames or config fixes.

Output a JSON array with one item per selected entry:
{{
  \"timestamp\": \"ISO 8601 with timezone\",
  \"location\": \"City, Country\",
  \"title\": \"Short milestone title\",
  \"description\": \"1-2 sentence description of what happened and why it matters\",
  \"category\": \"brand\" | \"product\" | \"infrastructure\" | \"launch\" | \"decision\",
  \"icon\": \"single emoji\"
}}

Sort by timestamp, newest first. Output ONLY the JSON array, no markdown fences, no explanation.

---

{changelogs}"
	)
}

/// Parses the curated entries; the reply must be a bare JSON array, optionally fenced.
pub fn parse_entries(raw: &str) -> Result<Vec<TimelineEntry>, ResponseError> {
	let body = crate::draft::strip_fences(raw);

	crate::error::parse_json(SERVICE, body).map_err(|e| e.with_raw(raw))
}

/// Asks the model to curate the aggregated changelogs.
#[cfg(feature = "reqwest")]
pub async fn curate(
	client: &MessagesClient,
	product: &str,
	pitch: &str,
	changelogs: &str,
) -> Result<Vec<TimelineEntry>> {
	let prompt = curation_prompt(product, pitch, changelogs);
	let raw = client.complete(&prompt, CURATE_MAX_TOKENS).await?;

	Ok(parse_entries(&raw)?)
}

/// Formats an ISO 8601 timestamp (or bare date) as `Month D, YYYY`; unparsable input is
/// returned unchanged.
pub fn format_date(iso: &str) -> String {
	let date = OffsetDateTime::parse(iso, &Rfc3339)
		.map(OffsetDateTime::date)
		.or_else(|_| Date::parse(iso, format_description!("[year]-[month]-[day]")));

	match date {
		Ok(date) => long_date(date),
		Err(_) => iso.to_owned(),
	}
}

/// Formats a calendar date as `Month D, YYYY`.
pub fn long_date(date: Date) -> String {
	format!("{} {}, {}", date.month(), date.day(), date.year())
}

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
	let mut escaped = String::with_capacity(raw.len());

	for c in raw.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}

	escaped
}

/// Renders one entry as a timeline block.
pub fn render_entry(entry: &TimelineEntry) -> String {
	let category = escape_html(&entry.category);

	format!(
		r#"
    <div class="tl-entry" data-category="{category}">
      <div class="tl-marker">
        <span class="tl-icon">{icon}</span>
      </div>
      <div class="tl-content">
        <div class="tl-meta">
          <time datetime="{timestamp}">{date}</time>
          <span class="tl-location">{location}</span>
          <span class="tl-category">{category}</span>
        </div>
        <h3 class="tl-title">{title}</h3>
        <p class="tl-desc">{description}</p>
      </div>
    </div>"#,
		icon = escape_html(&entry.icon),
		timestamp = escape_html(&entry.timestamp),
		date = escape_html(&format_date(&entry.timestamp)),
		location = escape_html(&entry.location),
		title = escape_html(&entry.title),
		description = escape_html(&entry.description),
	)
}

/// Replaces [`ENTRIES_MARKER`] in `template` with the rendered entries.
pub fn render(template: &str, entries: &[TimelineEntry]) -> Result<String, ConfigError> {
	let _guard = OpSpan::new(Operation::Render, "render").entered();
	let html = entries.iter().map(render_entry).collect::<Vec<_>>().join("\n");

	fill_marker(template, ENTRIES_MARKER, &html)
}

/// Replaces the first `marker` in `template` with `html`.
pub(crate) fn fill_marker(
	template: &str,
	marker: &'static str,
	html: &str,
) -> Result<String, ConfigError> {
	if !template.contains(marker) {
		return Err(ConfigError::MissingPlaceholder { marker });
	}

	Ok(template.replacen(marker, html, 1))
}

/// Renders `entries` into the template at `template_path` and writes the page to `output_path`.
pub fn write_page(template_path: &Path, output_path: &Path, entries: &[TimelineEntry]) -> Result<()> {
	let template = fs::read_to_string(template_path).map_err(|e| Error::io(template_path, e))?;

	write_output(output_path, render(&template, entries)?)
}

/// Writes a rendered page, creating its parent directory.
pub(crate) fn write_output(output_path: &Path, html: String) -> Result<()> {
	if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
	}

	fs::write(output_path, html).map_err(|e| Error::io(output_path, e))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn entry() -> TimelineEntry {
		TimelineEntry {
			timestamp: "2026-03-01T10:00:00+01:00".into(),
			location: "Kraków, Poland".into(),
			title: "Timeline <live>".into(),
			description: "Ships & tells \"why\".".into(),
			category: "launch".into(),
			icon: "🚀".into(),
		}
	}

	#[test]
	fn dates_render_long_form() {
		assert_eq!(format_date("2026-03-01T10:00:00+01:00"), "March 1, 2026");
		assert_eq!(format_date("2025-12-24"), "December 24, 2025");
		assert_eq!(format_date("sometime"), "sometime");
	}

	#[test]
	fn entries_are_escaped() {
		let html = render_entry(&entry());

		assert!(html.contains("<h3 class=\"tl-title\">Timeline &lt;live&gt;</h3>"));
		assert!(html.contains("Ships &amp; tells &quot;why&quot;."));
		assert!(html.contains("<time datetime=\"2026-03-01T10:00:00+01:00\">March 1, 2026</time>"));
		assert!(html.contains("data-category=\"launch\""));
	}

	#[test]
	fn render_requires_marker() {
		let page = render("<main><!-- TIMELINE_ENTRIES --></main>", &[entry()])
			.expect("Template with marker should render.");

		assert!(page.starts_with("<main>\n    <div class=\"tl-entry\""));
		assert!(page.ends_with("</div>\n    </div></main>"));
		assert!(matches!(
			render("<main></main>", &[]),
			Err(ConfigError::MissingPlaceholder { marker: ENTRIES_MARKER })
		));
	}

	#[test]
	fn curated_entries_parse() {
		let raw = serde_json::to_string(&vec![entry()]).expect("Fixture should serialize.");
		let parsed = parse_entries(&format!("```json\n{raw}\n```")).expect("Entries should parse.");

		assert_eq!(parsed, vec![entry()]);
		assert!(parse_entries("[{\"title\":\"missing fields\"}]").is_err());
	}

	#[test]
	fn fenced_parse_failure_keeps_the_fences() {
		let reply = "```json\n[{\"title\":\"missing fields\"}]\n```";
		let err = parse_entries(reply).expect_err("Incomplete entries must fail.");

		assert_eq!(err.raw(), reply);
	}

	#[test]
	fn prompt_embeds_changelogs() {
		let prompt =
			curation_prompt("Product", "an AI incubator", "--- SOURCE: site (Journey) ---\n## 0.1.0");

		assert!(prompt.starts_with("You are curating a public timeline for Product, an AI incubator"));
		assert!(prompt.ends_with("---\n\n--- SOURCE: site (Journey) ---\n## 0.1.0"));
	}
}
