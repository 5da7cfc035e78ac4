//! `watch`: an effect with an explicit dependency closure.
//!
//! Where `Effect::new` tracks every signal its closure touches, `watch`
//! splits the closure in two: `deps` runs tracked and produces a value, the
//! handler runs untracked with that value. Signals read only by the handler
//! never retrigger the watch. With `defer = true` the handler is skipped on
//! the initial run, so it fires on changes only.

use std::cell::Cell;

use crate::effect::Effect;
use crate::runtime::untrack;

/// Runs `handler` with the value of `deps` every time `deps` changes.
///
/// # Arguments
///
/// * `deps` - Tracked dependency closure; every signal it reads retriggers
///   the watch.
/// * `handler` - Untracked consumer of the deps value.
/// * `defer` - When true, the handler is skipped on the initial run.
///
/// Returns the underlying [`Effect`]; dropping or disposing it stops the
/// watch.
///
/// # Example
///
/// ```ignore
/// let source = Signal::new(0);
/// let _watch = watch(
///     {
///         let source = source.clone();
///         move || source.get()
///     },
///     |value| println!("source changed to {value}"),
///     true,
/// );
/// ```
pub fn watch<T, D, H>(deps: D, mut handler: H, defer: bool) -> Effect
where
	T: 'static,
	D: Fn() -> T + 'static,
	H: FnMut(T) + 'static,
{
	let first_run = Cell::new(true);
	Effect::new(move || {
		let value = deps();
		if first_run.replace(false) && defer {
			return;
		}
		untrack(|| handler(value));
	})
}
