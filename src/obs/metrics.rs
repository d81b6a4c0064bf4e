// self
use crate::obs::{Operation, Outcome};

#[cfg(feature = "metrics")]
const OP_TOTAL: &str = "journey_publish_op_total";
#[cfg(feature = "metrics")]
const SKIPPED_SOURCES_TOTAL: &str = "journey_publish_skipped_sources_total";

#[cfg(feature = "metrics")]
fn describe() {
	static DESCRIBED: std::sync::Once = std::sync::Once::new();

	DESCRIBED.call_once(|| {
		metrics::describe_counter!(
			OP_TOTAL,
			"Publishing operations (signing, posting, completions, collection, rendering) by outcome."
		);
		metrics::describe_counter!(
			SKIPPED_SOURCES_TOTAL,
			"Changelog sources that yielded no text, by repository."
		);
	});
}

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(op: Operation, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		describe();
		metrics::counter!(OP_TOTAL, "op" => op.as_str(), "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}

/// Counts a changelog source that contributed nothing to an aggregation run.
pub fn record_skipped_source(repo: &str) {
	#[cfg(feature = "metrics")]
	{
		describe();
		metrics::counter!(SKIPPED_SOURCES_TOTAL, "repo" => repo.to_owned()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = repo;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_silent() {
		record_outcome(Operation::Complete, Outcome::Failure);
		record_skipped_source("brand");
		record_skipped_source("brand");
	}
}
