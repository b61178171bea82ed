//! Partial-failure policy shared by the discovery and info fan-outs

use anchor_types::AnchorError;
use indexmap::IndexMap;
use std::fmt::Display;
use std::hash::Hash;
use tracing::warn;

/// A batch member whose failure was tolerated
#[derive(Debug)]
pub struct ItemFailure {
	/// Issuer account or transfer server URL
	pub key: String,
	pub error: AnchorError,
}

/// Split batch outcomes into successes and tolerated failures
///
/// `attempted` counts every batch member, including those that settled
/// without a value. When all of them failed, the first failure in input order
/// is handed to `total` and returned as the batch error.
pub(crate) fn apply_partial_failure_policy<K, T>(
	outcomes: IndexMap<K, Result<T, AnchorError>>,
	attempted: usize,
	total: impl FnOnce(usize, AnchorError) -> AnchorError,
) -> Result<(IndexMap<K, T>, Vec<ItemFailure>), AnchorError>
where
	K: Eq + Hash + Clone + Display,
{
	let mut successes = IndexMap::new();
	let mut failures = Vec::new();

	for (key, outcome) in outcomes {
		match outcome {
			Ok(value) => {
				successes.insert(key, value);
			},
			Err(error) => failures.push(ItemFailure {
				key: key.to_string(),
				error,
			}),
		}
	}

	if attempted > 0 && failures.len() == attempted {
		if let Some(first) = failures.into_iter().next() {
			warn!("All {} batch members failed, aborting", attempted);
			return Err(total(attempted, first.error));
		}
		return Ok((successes, Vec::new()));
	}

	for failure in &failures {
		warn!("Tolerating failure for {}: {}", failure.key, failure.error);
	}

	Ok((successes, failures))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ledger_error(issuer: &str) -> AnchorError {
		AnchorError::Ledger {
			issuer: issuer.to_string(),
			reason: "down".to_string(),
		}
	}

	fn wrap(count: usize, source: AnchorError) -> AnchorError {
		AnchorError::AllResolutionsFailed {
			count,
			source: Box::new(source),
		}
	}

	#[test]
	fn test_partial_failures_are_tolerated() {
		let outcomes: IndexMap<String, Result<u32, AnchorError>> = vec![
			("a".to_string(), Ok(1)),
			("b".to_string(), Err(ledger_error("b"))),
			("c".to_string(), Ok(3)),
		]
		.into_iter()
		.collect();

		let (successes, failures) = apply_partial_failure_policy(outcomes, 3, wrap).unwrap();

		assert_eq!(successes.len(), 2);
		assert_eq!(failures.len(), 1);
		assert_eq!(failures[0].key, "b");
	}

	#[test]
	fn test_total_failure_surfaces_first_error() {
		let outcomes: IndexMap<String, Result<u32, AnchorError>> = vec![
			("first".to_string(), Err(ledger_error("first"))),
			("second".to_string(), Err(ledger_error("second"))),
		]
		.into_iter()
		.collect();

		let err = apply_partial_failure_policy(outcomes, 2, wrap).unwrap_err();

		assert!(err.is_total_failure());
		assert!(matches!(err.root_cause(), AnchorError::Ledger { issuer, .. } if issuer == "first"));
	}

	#[test]
	fn test_members_without_value_are_not_failures() {
		// Two attempted, one settled with nothing, one failed
		let outcomes: IndexMap<String, Result<u32, AnchorError>> =
			vec![("b".to_string(), Err(ledger_error("b")))].into_iter().collect();

		let (successes, failures) = apply_partial_failure_policy(outcomes, 2, wrap).unwrap();

		assert!(successes.is_empty());
		assert_eq!(failures.len(), 1);
	}

	#[test]
	fn test_empty_batch_is_not_a_failure() {
		let outcomes: IndexMap<String, Result<u32, AnchorError>> = IndexMap::new();
		let (successes, failures) = apply_partial_failure_policy(outcomes, 0, wrap).unwrap();

		assert!(successes.is_empty());
		assert!(failures.is_empty());
	}
}
