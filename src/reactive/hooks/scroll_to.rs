//! Trigger-driven scrolling: `use_scroll_to`.

use std::cell::Cell;

use crate::dom::{Element, ScrollPosition};
use crate::reactive::{Effect, Signal, on_cleanup};

/// Options for [`use_scroll_to`].
#[derive(Debug, Clone)]
pub struct UseScrollToOptions {
	/// When true (the default), the initial run does not scroll; only
	/// trigger changes after mount do.
	pub defer: bool,
	/// Position handed to `scroll_to` on each firing.
	pub position: ScrollPosition,
}

impl Default for UseScrollToOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl UseScrollToOptions {
	/// Creates options with deferred initial scroll and default position.
	pub fn new() -> Self {
		Self {
			defer: true,
			position: ScrollPosition::default(),
		}
	}

	/// Toggles skipping the initial run.
	pub fn defer(mut self, defer: bool) -> Self {
		self.defer = defer;
		self
	}

	/// Sets the scroll target position.
	pub fn position(mut self, position: ScrollPosition) -> Self {
		self.position = position;
		self
	}
}

/// Scrolls a referenced element whenever `scroll_trigger` fires.
///
/// Returns the element slot; set it to the scrollable element. Both the
/// slot and the trigger are tracked, so setting the element or writing any
/// signal the trigger reads scrolls to the configured position (subject to
/// `defer` on the very first run).
///
/// # Example
///
/// ```ignore
/// let messages = Signal::new(Vec::new());
/// let pane = use_scroll_to(
///     {
///         let messages = messages.clone();
///         move || messages.get()
///     },
///     UseScrollToOptions::new().position(ScrollPosition::new().top(f64::MAX)),
/// );
/// pane.set(Some(element));
/// ```
pub fn use_scroll_to<T, F>(scroll_trigger: F, options: UseScrollToOptions) -> Signal<Option<Element>>
where
	T: 'static,
	F: Fn() -> T + 'static,
{
	let element = Signal::new(None::<Element>);

	let element_in_effect = element.clone();
	let first_run = Cell::new(true);
	let effect = Effect::new(move || {
		let target = element_in_effect.get();
		let _ = scroll_trigger();

		if first_run.replace(false) && options.defer {
			return;
		}
		if let Some(target) = target {
			target.scroll_to(&options.position);
		}
	});

	on_cleanup(move || effect.dispose());

	element
}
