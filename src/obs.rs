//! Optional observability for signing, posting, completions, collection, rendering, and release
//! versioning.
//!
//! # Feature Flags
//!
//! - `tracing`: every operation runs inside a `journey_publish.op` span carrying `op`, `stage`
//!   (call site), and the final `outcome`.
//! - `metrics`: the `journey_publish_op_total` counter is incremented on entry and on
//!   completion, labeled by `op` and `outcome`; `journey_publish_skipped_sources_total` counts
//!   changelog sources that contributed nothing, labeled by `repo`.
//!
//! Both compile down to no-ops when their feature is off.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// OAuth 1.0a signature computation.
	Sign,
	/// Signed tweet creation call.
	Post,
	/// Language-model completion.
	Complete,
	/// Changelog aggregation across configured sources.
	Collect,
	/// Timeline or version browser rendering.
	Render,
	/// Repository description and release tag lookups.
	Describe,
	/// Version stamping of the package manifest and site pages.
	Inject,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Sign => "sign",
			Operation::Post => "post",
			Operation::Complete => "complete",
			Operation::Collect => "collect",
			Operation::Render => "render",
			Operation::Describe => "describe",
			Operation::Inject => "inject",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`Outcome::Success`] or [`Outcome::Failure`].
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { Outcome::Success } else { Outcome::Failure }
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an [`OpSpan`] for `op`, recording the attempt and the final outcome.
pub async fn observe<T, E, Fut>(
	op: Operation,
	stage: &'static str,
	fut: Fut,
) -> std::result::Result<T, E>
where
	Fut: Future<Output = std::result::Result<T, E>>,
{
	let span = OpSpan::new(op, stage);

	record_outcome(op, Outcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = Outcome::of(&result);

	span.record(outcome);
	record_outcome(op, outcome);

	result
}
