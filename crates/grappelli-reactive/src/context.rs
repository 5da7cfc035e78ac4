//! Typed context: values provided by an ancestor scope, read by descendants.
//!
//! A [`Context<T>`] is a typed key. [`provide_context`] binds a value to the
//! key for the lifetime of the providing scope; [`get_context`] returns the
//! nearest binding. Providing inside a child scope shadows the parent's
//! binding until the child is disposed.
//!
//! # Example
//!
//! ```ignore
//! let theme: Context<String> = create_context();
//!
//! let (_, scope) = create_scope(|| {
//!     provide_context(&theme, "dark".to_string());
//!     assert_eq!(get_context(&theme), Some("dark".to_string()));
//! });
//! scope.dispose();
//! assert_eq!(get_context(&theme), None);
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::scope::on_cleanup;

/// A typed context key.
///
/// Copyable and cheap; the type parameter only pins the value type, so a
/// `Context<T>` can be passed to components by value.
pub struct Context<T> {
	id: usize,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Context<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Context<T> {}

impl<T> Context<T> {
	/// Allocates a fresh context key.
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self {
			id: COUNTER.fetch_add(1, Ordering::Relaxed),
			_marker: PhantomData,
		}
	}
}

impl<T> Default for Context<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Allocates a fresh context key (free-function spelling of
/// [`Context::new`]).
pub fn create_context<T>() -> Context<T> {
	Context::new()
}

thread_local! {
	// Context id -> stack of provided values, innermost last.
	static CONTEXT_VALUES: RefCell<BTreeMap<usize, Vec<Box<dyn Any>>>> =
		RefCell::new(BTreeMap::new());
}

/// Provides `value` for `ctx` until the current scope is disposed.
///
/// Without a current scope the binding attaches to the fallback root scope
/// and lives until `dispose_root`.
pub fn provide_context<T: Clone + 'static>(ctx: &Context<T>, value: T) {
	let id = ctx.id;
	CONTEXT_VALUES.with(|values| {
		values
			.borrow_mut()
			.entry(id)
			.or_default()
			.push(Box::new(value));
	});

	on_cleanup(move || {
		let _ = CONTEXT_VALUES.try_with(|values| {
			let mut values = values.borrow_mut();
			if let Some(stack) = values.get_mut(&id) {
				stack.pop();
				if stack.is_empty() {
					values.remove(&id);
				}
			}
		});
	});
}

/// Returns the nearest value provided for `ctx`, or `None`.
pub fn get_context<T: Clone + 'static>(ctx: &Context<T>) -> Option<T> {
	CONTEXT_VALUES.with(|values| {
		values
			.borrow()
			.get(&ctx.id)
			.and_then(|stack| stack.last())
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	})
}
