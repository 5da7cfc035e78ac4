//! Sort-order state: `use_sort_state`.

use crate::reactive::{Memo, Signal};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	/// Ascending order.
	#[default]
	Ascending,
	/// Descending order.
	Descending,
}

impl SortOrder {
	/// Returns the opposite direction.
	pub fn toggle(&self) -> Self {
		match self {
			Self::Ascending => Self::Descending,
			Self::Descending => Self::Ascending,
		}
	}
}

/// Capability record returned by [`use_sort_state`].
///
/// Cloning shares the same order signal.
#[derive(Clone)]
pub struct SortState {
	order: Signal<SortOrder>,
	initial: SortOrder,
	is_ascending: Memo<bool>,
	is_descending: Memo<bool>,
}

/// Tracks an ascending/descending order with toggle and reset.
///
/// # Example
///
/// ```ignore
/// let sort = use_sort_state(SortOrder::Ascending);
/// sort.toggle_order();
/// assert!(sort.is_descending());
/// ```
pub fn use_sort_state(initial: SortOrder) -> SortState {
	let order = Signal::new(initial);

	let order_in_asc = order.clone();
	let is_ascending = Memo::new(move || order_in_asc.get() == SortOrder::Ascending);

	let order_in_desc = order.clone();
	let is_descending = Memo::new(move || order_in_desc.get() == SortOrder::Descending);

	SortState {
		order,
		initial,
		is_ascending,
		is_descending,
	}
}

impl SortState {
	/// Current order (tracked read).
	pub fn order(&self) -> SortOrder {
		self.order.get()
	}

	/// Sets the order directly.
	pub fn set_order(&self, order: SortOrder) {
		self.order.set(order);
	}

	/// Flips the order.
	pub fn toggle_order(&self) {
		self.order.update(|order| *order = order.toggle());
	}

	/// Restores the order the hook was created with.
	pub fn reset_order(&self) {
		self.order.set(self.initial);
	}

	/// Whether the order is ascending (memoized read).
	pub fn is_ascending(&self) -> bool {
		self.is_ascending.get()
	}

	/// Whether the order is descending (memoized read).
	pub fn is_descending(&self) -> bool {
		self.is_descending.get()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::with_runtime;
	use rstest::rstest;
	use serial_test::serial;

	fn flush() {
		with_runtime(|rt| rt.flush_updates());
	}

	#[rstest]
	#[serial]
	fn starts_with_the_given_order() {
		let sort = use_sort_state(SortOrder::Descending);
		assert_eq!(sort.order(), SortOrder::Descending);
		assert!(sort.is_descending());
		assert!(!sort.is_ascending());
	}

	#[rstest]
	#[serial]
	fn toggle_flips_between_directions() {
		let sort = use_sort_state(SortOrder::Ascending);

		sort.toggle_order();
		flush();
		assert_eq!(sort.order(), SortOrder::Descending);
		assert!(sort.is_descending());

		sort.toggle_order();
		flush();
		assert_eq!(sort.order(), SortOrder::Ascending);
		assert!(sort.is_ascending());
	}

	#[rstest]
	#[serial]
	fn reset_restores_the_initial_order() {
		let sort = use_sort_state(SortOrder::Descending);

		sort.set_order(SortOrder::Ascending);
		flush();
		assert!(sort.is_ascending());

		sort.reset_order();
		flush();
		assert_eq!(sort.order(), SortOrder::Descending);
		assert!(sort.is_descending());
	}

	#[rstest]
	#[case(SortOrder::Ascending, SortOrder::Descending)]
	#[case(SortOrder::Descending, SortOrder::Ascending)]
	fn toggle_is_an_involution(#[case] from: SortOrder, #[case] to: SortOrder) {
		assert_eq!(from.toggle(), to);
		assert_eq!(from.toggle().toggle(), from);
	}
}
