//! Ordered concurrent fan-out
//!
//! Every per-key future is polled together; results are assembled afterwards by
//! walking the input keys, so iteration order never depends on which call
//! finished first.

use futures::future::join_all;
use indexmap::IndexMap;
use std::future::Future;
use std::hash::Hash;

/// Run `f` for every key concurrently and collect the present values in key order
///
/// Keys for which `f` yields `None` are left out. Duplicate keys collapse to
/// the position of their first occurrence with the value of the last one,
/// which is what `IndexMap::insert` does.
pub async fn ordered_concurrent_map<K, V, F, Fut>(keys: Vec<K>, f: F) -> IndexMap<K, V>
where
	K: Eq + Hash + Clone,
	F: Fn(K) -> Fut,
	Fut: Future<Output = Option<V>>,
{
	let results = join_all(keys.iter().cloned().map(&f)).await;

	keys.into_iter()
		.zip(results)
		.filter_map(|(key, value)| value.map(|value| (key, value)))
		.collect()
}
