//! Browser-side checks for the DOM adapter.
//!
//! Run with `wasm-pack test --chrome --headless`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use grappelli::dom::{Element, EventType, StorageArea};

wasm_bindgen_test_configure!(run_in_browser);

fn div() -> Element {
	let raw = web_sys::window()
		.unwrap()
		.document()
		.unwrap()
		.create_element("div")
		.unwrap()
		.dyn_into::<web_sys::HtmlElement>()
		.unwrap();
	Element::from(raw)
}

#[wasm_bindgen_test]
fn storage_round_trips_through_local_storage() {
	StorageArea::Local
		.set_item("grappelli-wasm-test", "42")
		.unwrap();
	assert_eq!(
		StorageArea::Local.get_item("grappelli-wasm-test").unwrap(),
		Some("42".to_string())
	);
	StorageArea::Local
		.remove_item("grappelli-wasm-test")
		.unwrap();
	assert_eq!(
		StorageArea::Local.get_item("grappelli-wasm-test").unwrap(),
		None
	);
}

#[wasm_bindgen_test]
fn listener_fires_until_its_handle_drops() {
	use std::cell::RefCell;
	use std::rc::Rc;

	let element = div();
	let clicks = Rc::new(RefCell::new(0));

	let clicks_in_handler = clicks.clone();
	let handle = element.add_event_listener(EventType::Click, move |_| {
		*clicks_in_handler.borrow_mut() += 1;
	});

	element.raw().click();
	assert_eq!(*clicks.borrow(), 1);

	drop(handle);
	element.raw().click();
	assert_eq!(*clicks.borrow(), 1);
}
