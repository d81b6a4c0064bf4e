//! Milestone tweet drafting: prompt construction and reply parsing.

// self
use crate::{_prelude::*, config::Persona, error::ResponseError};
#[cfg(feature = "reqwest")] use crate::llm::MessagesClient;

/// Character budget of a single tweet.
pub const TWEET_LIMIT: usize = 280;

#[cfg(feature = "reqwest")]
const DRAFT_MAX_TOKENS: u32 = 1024;
const SERVICE: &str = "anthropic";

/// What happened in the release being announced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftContext {
	/// Version without the leading `v`.
	pub version: String,
	/// Release notes in free text.
	pub notes: String,
}

/// Drafted texts for the personal post and the product account's quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetDraft {
	/// Tweet posted from the personal account.
	pub personal: String,
	/// Short quote-tweet for the product account.
	pub quote: String,
}
impl TweetDraft {
	/// Parses the model reply; the reply must be the bare JSON object, optionally fenced.
	pub fn parse(raw: &str) -> Result<Self, ResponseError> {
		crate::error::parse_json(SERVICE, strip_fences(raw)).map_err(|e| e.with_raw(raw))
	}

	/// Length of the personal tweet in characters.
	pub fn personal_len(&self) -> usize {
		self.personal.chars().count()
	}

	/// Whether the personal tweet fits in [`TWEET_LIMIT`].
	pub fn fits(&self) -> bool {
		self.personal_len() <= TWEET_LIMIT
	}
}

/// Builds the drafting prompt for one release.
pub fn tweet_prompt(persona: &Persona, ctx: &DraftContext) -> String {
	format!(
		"Draft a tweet for a founder building an AI product in public.

Context:
- Product: {product} ({pitch})
- Poster: @{handle} (the founder, writing in an authentic personal voice)
- Version: v{version}
- What happened: {notes}
- Journey URL: {journey_url}

Rules:
- At most {limit} characters for the personal tweet
- Founder voice, not corporate marketing
- Work the journey URL in naturally
- One hashtag at most, or none
- Brief, punchy, and honest about the process

Also draft a short quote-tweet for @{brand_handle} (the product account) that quotes the \
personal tweet. Keep it product-focused, one or two lines.

Respond ONLY with JSON, no markdown fences:
{{
  \"personal\": \"the tweet text\",
  \"quote\": \"the quote tweet text\"
}}",
		product = persona.product,
		pitch = persona.pitch,
		handle = persona.handle,
		version = ctx.version,
		notes = ctx.notes,
		journey_url = persona.journey_url,
		limit = TWEET_LIMIT,
		brand_handle = persona.brand_handle,
	)
}

/// Asks the model for a draft and parses the reply.
#[cfg(feature = "reqwest")]
pub async fn draft_tweet(
	client: &MessagesClient,
	persona: &Persona,
	ctx: &DraftContext,
) -> Result<TweetDraft> {
	let raw = client.complete(&tweet_prompt(persona, ctx), DRAFT_MAX_TOKENS).await?;

	Ok(TweetDraft::parse(&raw)?)
}

/// Removes a surrounding markdown code fence, with or without a language tag, on one line or
/// several.
pub(crate) fn strip_fences(raw: &str) -> &str {
	let trimmed = raw.trim();
	let Some(inner) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let Some(inner) = inner.strip_suffix("```") else {
		return trimmed;
	};
	let inner = inner.trim();

	match inner.find(['{', '[']) {
		Some(start) if is_fence_tag(&inner[..start]) => inner[start..].trim(),
		_ => inner,
	}
}

fn is_fence_tag(prefix: &str) -> bool {
	prefix.trim().chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
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
	fn prompt_carries_context_and_schema() {
		let ctx = DraftContext { version: "0.1.0".into(), notes: "Timeline launched".into() };
		let prompt = tweet_prompt(&persona(), &ctx);

		assert!(prompt.contains("@founder"));
		assert!(prompt.contains("@product_ai"));
		assert!(prompt.contains("v0.1.0"));
		assert!(prompt.contains("Timeline launched"));
		assert!(prompt.contains("https://journey.example.com"));
		assert!(prompt.contains("\"personal\": \"the tweet text\""));
		assert!(prompt.contains("At most 280 characters"));
	}

	#[test]
	fn parse_accepts_bare_and_fenced_json() {
		let bare = TweetDraft::parse(" {\"personal\":\"hi\",\"quote\":\"yo\"}\n")
			.expect("Bare JSON should parse.");
		let fenced = TweetDraft::parse("```json\n{\"personal\":\"hi\",\"quote\":\"yo\"}\n```")
			.expect("Fenced JSON should parse.");

		assert_eq!(bare, fenced);
		assert_eq!(bare.quote, "yo");
	}

	#[test]
	fn parse_failure_keeps_raw_reply() {
		let err = TweetDraft::parse("Sure! Here is your tweet.").expect_err("Prose must fail.");

		assert_eq!(err.raw(), "Sure! Here is your tweet.");
	}

	#[test]
	fn length_counts_characters() {
		let draft = TweetDraft { personal: "é".repeat(TWEET_LIMIT), quote: String::new() };

		assert_eq!(draft.personal_len(), TWEET_LIMIT);
		assert!(draft.fits());
		assert!(!TweetDraft { personal: "a".repeat(TWEET_LIMIT + 1), quote: String::new() }.fits());
	}

	#[test]
	fn strip_fences_handles_plain_fences() {
		assert_eq!(strip_fences("```\n[1]\n```"), "[1]");
		assert_eq!(strip_fences("```[1]```"), "[1]");
		assert_eq!(strip_fences("[1]"), "[1]");
		assert_eq!(strip_fences("```unterminated"), "```unterminated");
	}

	#[test]
	fn strip_fences_drops_inline_language_tag() {
		assert_eq!(strip_fences("```json {\"personal\":\"hi\"}```"), "{\"personal\":\"hi\"}");
		assert_eq!(strip_fences("```json\n[1]\n```"), "[1]");
		assert_eq!(strip_fences("``` json  [1] ```"), "[1]");

		let draft = TweetDraft::parse("```json {\"personal\":\"hi\",\"quote\":\"yo\"}```")
			.expect("Single-line fenced JSON should parse.");

		assert_eq!(draft.personal, "hi");
	}

	#[test]
	fn strip_fences_keeps_prose_before_json() {
		assert_eq!(strip_fences("```Here you go: {}```"), "Here you go: {}");
	}

	#[test]
	fn fenced_parse_failure_keeps_the_fences() {
		let reply = "```json\n{\"personal\":\"hi\"}\n```";
		let err = TweetDraft::parse(reply).expect_err("Missing quote must fail.");

		assert_eq!(err.raw(), reply);
	}
}
