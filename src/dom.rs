//! Thin DOM adapter consumed by the hooks.
//!
//! On WASM everything wraps `web-sys`: [`Element`] wraps an `HtmlElement`,
//! [`EventHandle`] owns the listener closure and detaches it on drop, and
//! [`StorageArea`] reaches `localStorage`/`sessionStorage`. On native
//! targets the same surface is backed by in-memory doubles (listener
//! registries, recorded scroll calls, a `HashMap` storage), so hook logic is
//! testable without a browser.

use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
use std::cell::{Cell, RefCell};
#[cfg(not(target_arch = "wasm32"))]
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::rc::{Rc, Weak};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;

/// Errors from the browser environment.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomError {
	/// `window` is absent (not running in a browsing context).
	#[error("browser window is not available")]
	WindowUnavailable,
	/// `document` is absent.
	#[error("document is not available")]
	DocumentUnavailable,
	/// The requested storage area is disabled or inaccessible.
	#[error("{area} storage is not available")]
	StorageUnavailable {
		/// `"local"` or `"session"`.
		area: &'static str,
	},
	/// A storage write was rejected (quota, privacy mode).
	#[error("storage write for key '{key}' failed: {reason}")]
	StorageWrite {
		/// The key being written.
		key: String,
		/// Browser-reported reason.
		reason: String,
	},
}

/// DOM event kinds the hooks attach listeners for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
	Click,
	DblClick,
	MouseDown,
	MouseUp,
	KeyDown,
	KeyUp,
	Input,
	Change,
	Scroll,
	TouchStart,
	TouchMove,
	TouchEnd,
	TouchCancel,
}

impl EventType {
	/// The DOM event name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Click => "click",
			Self::DblClick => "dblclick",
			Self::MouseDown => "mousedown",
			Self::MouseUp => "mouseup",
			Self::KeyDown => "keydown",
			Self::KeyUp => "keyup",
			Self::Input => "input",
			Self::Change => "change",
			Self::Scroll => "scroll",
			Self::TouchStart => "touchstart",
			Self::TouchMove => "touchmove",
			Self::TouchEnd => "touchend",
			Self::TouchCancel => "touchcancel",
		}
	}
}

impl fmt::Display for EventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Scroll animation behavior, mirroring the native `ScrollBehavior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
	#[default]
	Auto,
	Smooth,
	Instant,
}

#[cfg(target_arch = "wasm32")]
impl From<ScrollBehavior> for web_sys::ScrollBehavior {
	fn from(behavior: ScrollBehavior) -> Self {
		match behavior {
			ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
			ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
			ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
		}
	}
}

/// Target coordinates for a `scroll_to` call.
///
/// Unset fields are left to the browser's defaults, as with the native
/// `ScrollToOptions`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrollPosition {
	/// Vertical target in pixels.
	pub top: Option<f64>,
	/// Horizontal target in pixels.
	pub left: Option<f64>,
	/// Animation behavior.
	pub behavior: Option<ScrollBehavior>,
}

impl ScrollPosition {
	/// Creates an empty position (browser defaults).
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the vertical target.
	pub fn top(mut self, top: f64) -> Self {
		self.top = Some(top);
		self
	}

	/// Sets the horizontal target.
	pub fn left(mut self, left: f64) -> Self {
		self.left = Some(left);
		self
	}

	/// Sets the animation behavior.
	pub fn behavior(mut self, behavior: ScrollBehavior) -> Self {
		self.behavior = Some(behavior);
		self
	}
}

/// A single touch contact point, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
	pub page_x: f64,
	pub page_y: f64,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A DOM event as seen by hook callbacks.
#[cfg(target_arch = "wasm32")]
#[derive(Clone)]
pub struct Event {
	raw: web_sys::Event,
}

#[cfg(target_arch = "wasm32")]
impl Event {
	/// The DOM event name (`"click"`, `"touchmove"`, ...).
	pub fn event_type(&self) -> String {
		self.raw.type_()
	}

	/// Cancels the event's default action.
	pub fn prevent_default(&self) {
		self.raw.prevent_default();
	}

	/// Whether the composed event path contains `element`.
	pub fn path_includes(&self, element: &Element) -> bool {
		self.raw.composed_path().includes(element.raw().as_ref(), 0)
	}

	/// Current touch contact points; empty for non-touch events.
	pub fn touches(&self) -> Vec<TouchPoint> {
		let Some(touch_event) = self.raw.dyn_ref::<web_sys::TouchEvent>() else {
			return Vec::new();
		};
		let list = touch_event.touches();
		(0..list.length())
			.filter_map(|index| list.get(index))
			.map(|touch| TouchPoint {
				page_x: f64::from(touch.page_x()),
				page_y: f64::from(touch.page_y()),
			})
			.collect()
	}

	/// The underlying `web_sys` event.
	pub fn raw(&self) -> &web_sys::Event {
		&self.raw
	}
}

#[cfg(target_arch = "wasm32")]
impl From<web_sys::Event> for Event {
	fn from(raw: web_sys::Event) -> Self {
		Self { raw }
	}
}

#[cfg(not(target_arch = "wasm32"))]
struct MockEventInner {
	event_type: &'static str,
	path: RefCell<Vec<Element>>,
	touches: RefCell<Vec<TouchPoint>>,
	default_prevented: Cell<bool>,
}

/// A DOM event as seen by hook callbacks (native test double).
///
/// Built with [`Event::mock`] and dispatched through
/// [`Element::dispatch`] / [`Document::dispatch`].
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct Event {
	inner: Rc<MockEventInner>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Event {
	/// Creates a synthetic event of the given type.
	pub fn mock(event_type: EventType) -> Self {
		Self {
			inner: Rc::new(MockEventInner {
				event_type: event_type.as_str(),
				path: RefCell::new(Vec::new()),
				touches: RefCell::new(Vec::new()),
				default_prevented: Cell::new(false),
			}),
		}
	}

	/// Sets the composed path the event claims to have travelled.
	pub fn with_path(self, path: Vec<Element>) -> Self {
		*self.inner.path.borrow_mut() = path;
		self
	}

	/// Sets the active touch contact points.
	pub fn with_touches(self, touches: Vec<TouchPoint>) -> Self {
		*self.inner.touches.borrow_mut() = touches;
		self
	}

	/// The DOM event name.
	pub fn event_type(&self) -> String {
		self.inner.event_type.to_string()
	}

	/// Cancels the event's default action.
	pub fn prevent_default(&self) {
		self.inner.default_prevented.set(true);
	}

	/// Whether `prevent_default` was called (test observer).
	pub fn default_prevented(&self) -> bool {
		self.inner.default_prevented.get()
	}

	/// Whether the composed event path contains `element`.
	pub fn path_includes(&self, element: &Element) -> bool {
		self.inner
			.path
			.borrow()
			.iter()
			.any(|entry| Rc::ptr_eq(&entry.target, &element.target))
	}

	/// Current touch contact points.
	pub fn touches(&self) -> Vec<TouchPoint> {
		self.inner.touches.borrow().clone()
	}
}

// ---------------------------------------------------------------------------
// Listener targets
// ---------------------------------------------------------------------------

#[cfg(not(target_arch = "wasm32"))]
struct ListenerEntry {
	id: usize,
	event: &'static str,
	handler: Rc<dyn Fn(Event)>,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
struct MockTarget {
	next_listener_id: Cell<usize>,
	listeners: RefCell<Vec<ListenerEntry>>,
	scrolls: RefCell<Vec<ScrollPosition>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl MockTarget {
	fn add_listener(self: &Rc<Self>, event: EventType, handler: Rc<dyn Fn(Event)>) -> EventHandle {
		let id = self.next_listener_id.get();
		self.next_listener_id.set(id + 1);
		self.listeners.borrow_mut().push(ListenerEntry {
			id,
			event: event.as_str(),
			handler,
		});
		EventHandle {
			target: Rc::downgrade(self),
			id,
		}
	}

	fn dispatch(&self, event: &Event) {
		// Snapshot so a handler mutating the listener list cannot alias the
		// RefCell borrow.
		let matching: Vec<Rc<dyn Fn(Event)>> = self
			.listeners
			.borrow()
			.iter()
			.filter(|entry| entry.event == event.event_type())
			.map(|entry| entry.handler.clone())
			.collect();
		for handler in matching {
			handler(event.clone());
		}
	}

	fn listener_count(&self, event: EventType) -> usize {
		self.listeners
			.borrow()
			.iter()
			.filter(|entry| entry.event == event.as_str())
			.count()
	}
}

/// An attached event listener; dropping the handle detaches it.
#[cfg(target_arch = "wasm32")]
pub struct EventHandle {
	target: web_sys::EventTarget,
	event: &'static str,
	closure: Closure<dyn FnMut(web_sys::Event)>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for EventHandle {
	fn drop(&mut self) {
		let _ = self.target.remove_event_listener_with_callback(
			self.event,
			self.closure.as_ref().unchecked_ref(),
		);
	}
}

#[cfg(target_arch = "wasm32")]
fn attach_listener(
	target: &web_sys::EventTarget,
	event: EventType,
	handler: impl Fn(Event) + 'static,
) -> EventHandle {
	let closure = Closure::wrap(Box::new(move |raw: web_sys::Event| {
		handler(Event::from(raw));
	}) as Box<dyn FnMut(web_sys::Event)>);

	if let Err(err) = target
		.add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())
	{
		crate::warn_log!("failed to attach '{}' listener: {err:?}", event);
	}

	EventHandle {
		target: target.clone(),
		event: event.as_str(),
		closure,
	}
}

/// An attached event listener (native registry entry); dropping detaches.
#[cfg(not(target_arch = "wasm32"))]
pub struct EventHandle {
	target: Weak<MockTarget>,
	id: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for EventHandle {
	fn drop(&mut self) {
		if let Some(target) = self.target.upgrade() {
			target
				.listeners
				.borrow_mut()
				.retain(|entry| entry.id != self.id);
		}
	}
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// An element hooks attach listeners to and scroll.
#[cfg(target_arch = "wasm32")]
#[derive(Clone)]
pub struct Element {
	raw: web_sys::HtmlElement,
}

#[cfg(target_arch = "wasm32")]
impl Element {
	/// Attaches `handler` for `event`; the listener lives as long as the
	/// returned handle.
	pub fn add_event_listener(
		&self,
		event: EventType,
		handler: impl Fn(Event) + 'static,
	) -> EventHandle {
		attach_listener(self.raw.as_ref(), event, handler)
	}

	/// Scrolls the element to `position`.
	pub fn scroll_to(&self, position: &ScrollPosition) {
		let options = web_sys::ScrollToOptions::new();
		if let Some(top) = position.top {
			options.set_top(top);
		}
		if let Some(left) = position.left {
			options.set_left(left);
		}
		if let Some(behavior) = position.behavior {
			options.set_behavior(behavior.into());
		}
		self.raw.scroll_to_with_scroll_to_options(&options);
	}

	/// The wrapped `web_sys` element.
	pub fn raw(&self) -> &web_sys::HtmlElement {
		&self.raw
	}
}

#[cfg(target_arch = "wasm32")]
impl From<web_sys::HtmlElement> for Element {
	fn from(raw: web_sys::HtmlElement) -> Self {
		Self { raw }
	}
}

/// An element hooks attach listeners to and scroll (native test double).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct Element {
	target: Rc<MockTarget>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Element {
	/// Creates a detached mock element.
	pub fn mock() -> Self {
		Self {
			target: Rc::new(MockTarget::default()),
		}
	}

	/// Attaches `handler` for `event`; the listener lives as long as the
	/// returned handle.
	pub fn add_event_listener(
		&self,
		event: EventType,
		handler: impl Fn(Event) + 'static,
	) -> EventHandle {
		self.target.add_listener(event, Rc::new(handler))
	}

	/// Records a scroll request.
	pub fn scroll_to(&self, position: &ScrollPosition) {
		self.target.scrolls.borrow_mut().push(position.clone());
	}

	/// Delivers `event` to every matching listener (test driver).
	pub fn dispatch(&self, event: &Event) {
		self.target.dispatch(event);
	}

	/// Number of listeners attached for `event` (test observer).
	pub fn listener_count(&self, event: EventType) -> usize {
		self.target.listener_count(event)
	}

	/// Scroll requests recorded so far (test observer).
	pub fn scroll_calls(&self) -> Vec<ScrollPosition> {
		self.target.scrolls.borrow().clone()
	}
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The document, as a listener target for document-level hooks.
#[cfg(target_arch = "wasm32")]
#[derive(Clone)]
pub struct Document {
	raw: web_sys::Document,
}

#[cfg(target_arch = "wasm32")]
impl Document {
	/// Attaches a document-level listener.
	pub fn add_event_listener(
		&self,
		event: EventType,
		handler: impl Fn(Event) + 'static,
	) -> EventHandle {
		attach_listener(self.raw.as_ref(), event, handler)
	}
}

/// Returns the browsing context's document.
#[cfg(target_arch = "wasm32")]
pub fn document() -> Result<Document, DomError> {
	let window = web_sys::window().ok_or(DomError::WindowUnavailable)?;
	let raw = window.document().ok_or(DomError::DocumentUnavailable)?;
	Ok(Document { raw })
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
	static MOCK_DOCUMENT: Rc<MockTarget> = Rc::new(MockTarget::default());
}

/// The document (native test double, one per thread).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct Document {
	target: Rc<MockTarget>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Document {
	/// Attaches a document-level listener.
	pub fn add_event_listener(
		&self,
		event: EventType,
		handler: impl Fn(Event) + 'static,
	) -> EventHandle {
		self.target.add_listener(event, Rc::new(handler))
	}

	/// Delivers `event` to every matching listener (test driver).
	pub fn dispatch(&self, event: &Event) {
		self.target.dispatch(event);
	}

	/// Number of listeners attached for `event` (test observer).
	pub fn listener_count(&self, event: EventType) -> usize {
		self.target.listener_count(event)
	}
}

/// Returns the per-thread mock document.
#[cfg(not(target_arch = "wasm32"))]
pub fn document() -> Result<Document, DomError> {
	Ok(Document {
		target: MOCK_DOCUMENT.with(Rc::clone),
	})
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Key-value storage target for the persistence hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageArea {
	/// `localStorage` - survives the session.
	#[default]
	Local,
	/// `sessionStorage` - cleared when the session ends.
	Session,
}

#[cfg(target_arch = "wasm32")]
impl StorageArea {
	fn label(&self) -> &'static str {
		match self {
			Self::Local => "local",
			Self::Session => "session",
		}
	}

	fn raw(&self) -> Result<web_sys::Storage, DomError> {
		let window = web_sys::window().ok_or(DomError::WindowUnavailable)?;
		let storage = match self {
			Self::Local => window.local_storage(),
			Self::Session => window.session_storage(),
		};
		storage
			.ok()
			.flatten()
			.ok_or(DomError::StorageUnavailable { area: self.label() })
	}

	/// Writes `value` under `key`.
	pub fn set_item(&self, key: &str, value: &str) -> Result<(), DomError> {
		self.raw()?
			.set_item(key, value)
			.map_err(|err| DomError::StorageWrite {
				key: key.to_string(),
				reason: format!("{err:?}"),
			})
	}

	/// Reads the value under `key`.
	pub fn get_item(&self, key: &str) -> Result<Option<String>, DomError> {
		Ok(self.raw()?.get_item(key).ok().flatten())
	}

	/// Removes the value under `key`.
	pub fn remove_item(&self, key: &str) -> Result<(), DomError> {
		let _ = self.raw()?.remove_item(key);
		Ok(())
	}
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
	static MOCK_LOCAL_STORAGE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
	static MOCK_SESSION_STORAGE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

#[cfg(not(target_arch = "wasm32"))]
impl StorageArea {
	fn with_map<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> R {
		match self {
			Self::Local => MOCK_LOCAL_STORAGE.with(|map| f(&mut map.borrow_mut())),
			Self::Session => MOCK_SESSION_STORAGE.with(|map| f(&mut map.borrow_mut())),
		}
	}

	/// Writes `value` under `key`.
	pub fn set_item(&self, key: &str, value: &str) -> Result<(), DomError> {
		self.with_map(|map| {
			map.insert(key.to_string(), value.to_string());
		});
		Ok(())
	}

	/// Reads the value under `key`.
	pub fn get_item(&self, key: &str) -> Result<Option<String>, DomError> {
		Ok(self.with_map(|map| map.get(key).cloned()))
	}

	/// Removes the value under `key`.
	pub fn remove_item(&self, key: &str) -> Result<(), DomError> {
		self.with_map(|map| {
			map.remove(key);
		});
		Ok(())
	}

	/// Empties this storage area (test isolation).
	pub fn clear(&self) {
		self.with_map(HashMap::clear);
	}
}
