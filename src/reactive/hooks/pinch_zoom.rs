//! Pinch-zoom gesture detection: `use_pinch_zoom`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dom::{Element, EventHandle, EventType, TouchPoint};
use crate::reactive::{Effect, Signal, on_cleanup};

/// Options for [`use_pinch_zoom`].
pub struct UsePinchZoomOptions {
	/// Called when the two touch points move apart, with the absolute
	/// pixel distance growth since the previous call.
	pub on_zoom_in: Option<Box<dyn Fn(f64)>>,
	/// Called when the two touch points move together, with the absolute
	/// pixel distance shrinkage since the previous call.
	pub on_zoom_out: Option<Box<dyn Fn(f64)>>,
	/// Whether to cancel the default `touchmove` action while pinching.
	/// Default `true`.
	pub prevent_touch_move: bool,
}

impl Default for UsePinchZoomOptions {
	fn default() -> Self {
		Self {
			on_zoom_in: None,
			on_zoom_out: None,
			prevent_touch_move: true,
		}
	}
}

impl UsePinchZoomOptions {
	/// Sets the zoom-in callback.
	pub fn on_zoom_in(mut self, callback: impl Fn(f64) + 'static) -> Self {
		self.on_zoom_in = Some(Box::new(callback));
		self
	}

	/// Sets the zoom-out callback.
	pub fn on_zoom_out(mut self, callback: impl Fn(f64) + 'static) -> Self {
		self.on_zoom_out = Some(Box::new(callback));
		self
	}

	/// Sets whether `touchmove` default handling is suppressed.
	pub fn prevent_touch_move(mut self, prevent: bool) -> Self {
		self.prevent_touch_move = prevent;
		self
	}
}

fn touch_distance(first: &TouchPoint, second: &TouchPoint) -> f64 {
	(second.page_x - first.page_x).hypot(second.page_y - first.page_y)
}

/// Detects two-finger pinch gestures on a target element.
///
/// Returns the element slot; set it to the element to watch. A two-finger
/// `touchstart` primes the reference distance; every two-finger `touchmove`
/// compares the current distance against it, invokes the matching callback
/// with the absolute delta in pixels, and re-primes. Listeners are detached
/// when the element changes or the owning scope is disposed.
pub fn use_pinch_zoom(options: UsePinchZoomOptions) -> Signal<Option<Element>> {
	let element = Signal::new(None::<Element>);
	let handles: Rc<RefCell<Vec<EventHandle>>> = Rc::new(RefCell::new(Vec::new()));
	let options = Rc::new(options);

	let element_in_effect = element.clone();
	let handles_in_effect = handles.clone();
	let effect = Effect::new(move || {
		let target = element_in_effect.get();

		handles_in_effect.borrow_mut().clear();

		let Some(target) = target else {
			return;
		};

		// Distance between the two contacts at the previous sample.
		let prev_distance = Rc::new(Cell::new(0.0_f64));

		let prime = prev_distance.clone();
		let start_handle = target.add_event_listener(EventType::TouchStart, move |event| {
			let touches = event.touches();
			if let [first, second] = touches.as_slice() {
				prime.set(touch_distance(first, second));
			}
		});

		let prev = prev_distance.clone();
		let options_in_move = options.clone();
		let move_handle = target.add_event_listener(EventType::TouchMove, move |event| {
			let touches = event.touches();
			let [first, second] = touches.as_slice() else {
				return;
			};

			if options_in_move.prevent_touch_move {
				event.prevent_default();
			}

			let current = touch_distance(first, second);
			let growth = (current - prev.get()).abs();

			let mut moved = false;
			if current > prev.get() {
				if let Some(on_zoom_in) = &options_in_move.on_zoom_in {
					on_zoom_in(growth);
				}
				moved = true;
			}
			if prev.get() > current {
				if let Some(on_zoom_out) = &options_in_move.on_zoom_out {
					on_zoom_out(growth);
				}
				moved = true;
			}
			if moved {
				prev.set(current);
			}
		});

		let mut attached = handles_in_effect.borrow_mut();
		attached.push(start_handle);
		attached.push(move_handle);
	});

	on_cleanup(move || {
		effect.dispose();
		handles.borrow_mut().clear();
	});

	element
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::dom::Event;
	use crate::reactive::{create_scope, with_runtime};
	use serial_test::serial;
	use std::cell::RefCell as StdRefCell;

	fn flush() {
		with_runtime(|rt| rt.flush_updates());
	}

	fn touches(points: &[(f64, f64)]) -> Vec<TouchPoint> {
		points
			.iter()
			.map(|&(page_x, page_y)| TouchPoint { page_x, page_y })
			.collect()
	}

	#[test]
	#[serial]
	fn spreading_fingers_reports_zoom_in_delta() {
		let deltas = Rc::new(StdRefCell::new(Vec::new()));
		let element = Element::mock();

		let deltas_in_cb = deltas.clone();
		let (slot, scope) = create_scope(move || {
			use_pinch_zoom(
				UsePinchZoomOptions::default()
					.on_zoom_in(move |delta| deltas_in_cb.borrow_mut().push(delta)),
			)
		});
		slot.set(Some(element.clone()));
		flush();

		// Prime at distance 5 (3-4-5 triangle), then spread to 10.
		element.dispatch(
			&Event::mock(EventType::TouchStart).with_touches(touches(&[(0.0, 0.0), (3.0, 4.0)])),
		);
		element.dispatch(
			&Event::mock(EventType::TouchMove).with_touches(touches(&[(0.0, 0.0), (6.0, 8.0)])),
		);

		assert_eq!(*deltas.borrow(), vec![5.0]);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn closing_fingers_reports_zoom_out_and_reprimes() {
		let zoom_out = Rc::new(StdRefCell::new(Vec::new()));
		let element = Element::mock();

		let zoom_out_in_cb = zoom_out.clone();
		let (slot, scope) = create_scope(move || {
			use_pinch_zoom(
				UsePinchZoomOptions::default()
					.on_zoom_out(move |delta| zoom_out_in_cb.borrow_mut().push(delta)),
			)
		});
		slot.set(Some(element.clone()));
		flush();

		element.dispatch(
			&Event::mock(EventType::TouchStart).with_touches(touches(&[(0.0, 0.0), (6.0, 8.0)])),
		);
		// 10 -> 5, then 5 -> 0: the reference distance follows each sample.
		element.dispatch(
			&Event::mock(EventType::TouchMove).with_touches(touches(&[(0.0, 0.0), (3.0, 4.0)])),
		);
		element.dispatch(
			&Event::mock(EventType::TouchMove).with_touches(touches(&[(0.0, 0.0), (0.0, 0.0)])),
		);

		assert_eq!(*zoom_out.borrow(), vec![5.0, 5.0]);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn single_touch_is_ignored() {
		let calls = Rc::new(StdRefCell::new(0));
		let element = Element::mock();

		let calls_in_cb = calls.clone();
		let (slot, scope) = create_scope(move || {
			use_pinch_zoom(
				UsePinchZoomOptions::default().on_zoom_in(move |_| *calls_in_cb.borrow_mut() += 1),
			)
		});
		slot.set(Some(element.clone()));
		flush();

		element.dispatch(
			&Event::mock(EventType::TouchMove).with_touches(touches(&[(10.0, 10.0)])),
		);

		assert_eq!(*calls.borrow(), 0);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn prevent_touch_move_controls_default_suppression() {
		let element = Element::mock();

		let (slot, scope) = create_scope(|| use_pinch_zoom(UsePinchZoomOptions::default()));
		slot.set(Some(element.clone()));
		flush();

		let event =
			Event::mock(EventType::TouchMove).with_touches(touches(&[(0.0, 0.0), (3.0, 4.0)]));
		element.dispatch(&event);
		assert!(event.default_prevented());
		scope.dispose();

		// Opt out of suppression.
		let (slot, scope) = create_scope(|| {
			use_pinch_zoom(UsePinchZoomOptions::default().prevent_touch_move(false))
		});
		slot.set(Some(element.clone()));
		flush();

		let event =
			Event::mock(EventType::TouchMove).with_touches(touches(&[(0.0, 0.0), (3.0, 4.0)]));
		element.dispatch(&event);
		assert!(!event.default_prevented());
		scope.dispose();
	}

	#[test]
	#[serial]
	fn listeners_detach_on_dispose() {
		let element = Element::mock();

		let (slot, scope) = create_scope(|| use_pinch_zoom(UsePinchZoomOptions::default()));
		slot.set(Some(element.clone()));
		flush();

		assert_eq!(element.listener_count(EventType::TouchStart), 1);
		assert_eq!(element.listener_count(EventType::TouchMove), 1);

		scope.dispose();
		assert_eq!(element.listener_count(EventType::TouchStart), 0);
		assert_eq!(element.listener_count(EventType::TouchMove), 0);
	}
}
