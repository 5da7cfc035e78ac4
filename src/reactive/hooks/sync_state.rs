//! Reactive state mirroring: `use_sync_state`.

use crate::reactive::{on_cleanup, watch};

/// Mirrors a reactive source into a caller-supplied setter.
///
/// Shorthand for [`watch`] with scope-bound teardown: whenever a signal
/// read by `source` changes, `setter` receives the fresh value. With
/// `defer` (the usual choice for syncing local state to props) the setter
/// is skipped on the initial run and fires on changes only; pass `false`
/// to seed the destination immediately.
///
/// # Example
///
/// ```ignore
/// // Keep a locally-editable copy of a prop.
/// let draft = Signal::new(props.name.get_untracked());
/// use_sync_state(
///     {
///         let name = props.name.clone();
///         move || name.get()
///     },
///     {
///         let draft = draft.clone();
///         move |value| draft.set(value)
///     },
///     true,
/// );
/// ```
pub fn use_sync_state<T, F, S>(source: F, setter: S, defer: bool)
where
	T: 'static,
	F: Fn() -> T + 'static,
	S: FnMut(T) + 'static,
{
	let mirror = watch(source, setter, defer);
	on_cleanup(move || mirror.dispose());
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::{Signal, create_scope, with_runtime};
	use serial_test::serial;
	use std::cell::RefCell;
	use std::rc::Rc;

	fn flush() {
		with_runtime(|rt| rt.flush_updates());
	}

	#[test]
	#[serial]
	fn deferred_sync_skips_the_initial_value() {
		let source = Signal::new(1);
		let target = Rc::new(RefCell::new(0));

		let source_read = source.clone();
		let target_write = target.clone();
		let ((), scope) = create_scope(move || {
			use_sync_state(
				move || source_read.get(),
				move |value| *target_write.borrow_mut() = value,
				true,
			);
		});

		assert_eq!(*target.borrow(), 0);

		source.set(5);
		flush();
		assert_eq!(*target.borrow(), 5);

		scope.dispose();
	}

	#[test]
	#[serial]
	fn immediate_sync_seeds_the_destination() {
		let source = Signal::new(7);
		let target = Rc::new(RefCell::new(0));

		let source_read = source.clone();
		let target_write = target.clone();
		let ((), scope) = create_scope(move || {
			use_sync_state(
				move || source_read.get(),
				move |value| *target_write.borrow_mut() = value,
				false,
			);
		});

		assert_eq!(*target.borrow(), 7);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn sync_stops_after_scope_disposal() {
		let source = Signal::new(1);
		let target = Rc::new(RefCell::new(0));

		let source_read = source.clone();
		let target_write = target.clone();
		let ((), scope) = create_scope(move || {
			use_sync_state(
				move || source_read.get(),
				move |value| *target_write.borrow_mut() = value,
				true,
			);
		});

		scope.dispose();
		source.set(9);
		flush();
		assert_eq!(*target.borrow(), 0);
	}

	#[test]
	#[serial]
	fn mirrors_every_change() {
		let source = Signal::new(0);
		let seen = Rc::new(RefCell::new(Vec::new()));

		let source_read = source.clone();
		let seen_write = seen.clone();
		let ((), scope) = create_scope(move || {
			use_sync_state(
				move || source_read.get(),
				move |value| seen_write.borrow_mut().push(value),
				true,
			);
		});

		for value in 1..=3 {
			source.set(value);
			flush();
		}

		assert_eq!(*seen.borrow(), vec![1, 2, 3]);
		scope.dispose();
	}
}
