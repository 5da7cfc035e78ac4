//! Visibility state: `use_visible_state`.

use crate::reactive::Signal;

/// Capability record returned by [`use_visible_state`].
///
/// Cloning shares the same visibility signal.
#[derive(Clone)]
pub struct VisibleState {
	opened: Signal<bool>,
}

/// Tracks an open/closed flag for modals, dropdowns and similar chrome.
///
/// Starts closed.
///
/// # Example
///
/// ```ignore
/// let menu = use_visible_state();
/// menu.reveal();
/// let chosen = menu.with_hidden(|| pick_item());
/// // the menu is closed again, whatever pick_item returned
/// ```
pub fn use_visible_state() -> VisibleState {
	VisibleState {
		opened: Signal::new(false),
	}
}

impl VisibleState {
	/// Whether the element is open (tracked read).
	pub fn is_opened(&self) -> bool {
		self.opened.get()
	}

	/// Sets the flag directly.
	pub fn set_opened(&self, opened: bool) {
		self.opened.set(opened);
	}

	/// Opens.
	pub fn reveal(&self) {
		self.opened.set(true);
	}

	/// Closes.
	pub fn hide(&self) {
		self.opened.set(false);
	}

	/// Runs `f`, then closes. The action's result is passed through.
	pub fn with_hidden<R>(&self, f: impl FnOnce() -> R) -> R {
		let result = f();
		self.hide();
		result
	}

	/// Runs `f`, then opens. The action's result is passed through.
	pub fn with_revealed<R>(&self, f: impl FnOnce() -> R) -> R {
		let result = f();
		self.reveal();
		result
	}
}
