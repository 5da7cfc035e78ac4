//! Outside-click detection: `use_click_outside`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{Element, Event, EventHandle, EventType, document};
use crate::reactive::{Effect, Signal, on_cleanup};

/// Options for [`use_click_outside`].
#[derive(Default)]
pub struct UseClickOutsideOptions {
	/// Reactive flag gating the listener; `None` means always enabled.
	/// Signals read inside the closure retrigger the wiring when written.
	pub enabled: Option<Box<dyn Fn() -> bool>>,
}

impl UseClickOutsideOptions {
	/// Gates the listener on a reactive flag.
	pub fn enabled(mut self, flag: impl Fn() -> bool + 'static) -> Self {
		self.enabled = Some(Box::new(flag));
		self
	}
}

/// Invokes `callback` for document clicks landing outside a target element.
///
/// Returns the element slot; set it to the element to watch. A
/// document-level click listener is attached while the slot holds an
/// element and the enabled flag is true, and the callback fires with the
/// triggering event whenever the click's composed path does not include the
/// element. The listener is detached when the element changes, the flag
/// turns false, or the owning scope is disposed.
///
/// # Example
///
/// ```ignore
/// let dropdown = use_visible_state();
/// let target = use_click_outside(
///     {
///         let dropdown = dropdown.clone();
///         move |_event| dropdown.hide()
///     },
///     UseClickOutsideOptions::default().enabled({
///         let dropdown = dropdown.clone();
///         move || dropdown.is_opened()
///     }),
/// );
/// // later, once the element exists:
/// target.set(Some(element));
/// ```
pub fn use_click_outside(
	callback: impl Fn(Event) + 'static,
	options: UseClickOutsideOptions,
) -> Signal<Option<Element>> {
	let element = Signal::new(None::<Element>);
	let handle: Rc<RefCell<Option<EventHandle>>> = Rc::new(RefCell::new(None));
	let callback = Rc::new(callback);

	let element_in_effect = element.clone();
	let handle_in_effect = handle.clone();
	let effect = Effect::new(move || {
		let target = element_in_effect.get();
		let listening = options.enabled.as_ref().map(|flag| flag()).unwrap_or(true);

		// Detach the previous listener before (possibly) attaching anew.
		handle_in_effect.borrow_mut().take();

		let Some(target) = target else {
			return;
		};
		if !listening {
			return;
		}

		let doc = match document() {
			Ok(doc) => doc,
			Err(err) => {
				crate::warn_log!("use_click_outside: no document to listen on: {err}");
				return;
			}
		};

		let callback = callback.clone();
		let attached = doc.add_event_listener(EventType::Click, move |event| {
			if !event.path_includes(&target) {
				callback(event);
			}
		});
		crate::debug_log!("use_click_outside: listener attached");
		*handle_in_effect.borrow_mut() = Some(attached);
	});

	on_cleanup(move || {
		effect.dispose();
		handle.borrow_mut().take();
	});

	element
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::reactive::{create_scope, with_runtime};
	use serial_test::serial;
	use std::cell::RefCell as StdRefCell;

	fn flush() {
		with_runtime(|rt| rt.flush_updates());
	}

	#[test]
	#[serial]
	fn fires_for_clicks_outside_the_element() {
		let outside_clicks = Rc::new(StdRefCell::new(0));
		let inside = Element::mock();

		let counter = outside_clicks.clone();
		let (slot, scope) = create_scope(move || {
			use_click_outside(
				move |_| *counter.borrow_mut() += 1,
				UseClickOutsideOptions::default(),
			)
		});

		slot.set(Some(inside.clone()));
		flush();

		let doc = document().unwrap();
		doc.dispatch(&Event::mock(EventType::Click).with_path(vec![inside.clone()]));
		assert_eq!(*outside_clicks.borrow(), 0);

		doc.dispatch(&Event::mock(EventType::Click).with_path(vec![Element::mock()]));
		assert_eq!(*outside_clicks.borrow(), 1);

		scope.dispose();
	}

	#[test]
	#[serial]
	fn no_listener_until_element_is_set() {
		let doc = document().unwrap();
		let before = doc.listener_count(EventType::Click);

		let (slot, scope) = create_scope(|| {
			use_click_outside(|_| {}, UseClickOutsideOptions::default())
		});
		assert_eq!(doc.listener_count(EventType::Click), before);

		slot.set(Some(Element::mock()));
		flush();
		assert_eq!(doc.listener_count(EventType::Click), before + 1);

		scope.dispose();
		assert_eq!(doc.listener_count(EventType::Click), before);
	}

	#[test]
	#[serial]
	fn enabled_flag_attaches_and_detaches() {
		let doc = document().unwrap();
		let before = doc.listener_count(EventType::Click);
		let enabled = crate::reactive::Signal::new(false);

		let enabled_in_options = enabled.clone();
		let (slot, scope) = create_scope(move || {
			use_click_outside(
				|_| {},
				UseClickOutsideOptions::default().enabled(move || enabled_in_options.get()),
			)
		});

		slot.set(Some(Element::mock()));
		flush();
		assert_eq!(doc.listener_count(EventType::Click), before);

		enabled.set(true);
		flush();
		assert_eq!(doc.listener_count(EventType::Click), before + 1);

		enabled.set(false);
		flush();
		assert_eq!(doc.listener_count(EventType::Click), before);

		scope.dispose();
	}

	#[test]
	#[serial]
	fn clearing_the_slot_detaches() {
		let doc = document().unwrap();
		let before = doc.listener_count(EventType::Click);

		let (slot, scope) = create_scope(|| {
			use_click_outside(|_| {}, UseClickOutsideOptions::default())
		});
		slot.set(Some(Element::mock()));
		flush();
		assert_eq!(doc.listener_count(EventType::Click), before + 1);

		slot.set(None);
		flush();
		assert_eq!(doc.listener_count(EventType::Click), before);

		scope.dispose();
	}
}
