//! Ownership scopes: lifetime contexts that teardown callbacks attach to.
//!
//! A scope is opened with [`create_scope`]; everything registered with
//! [`on_cleanup`] while it is current runs exactly once when the scope is
//! disposed. Scopes nest: a child scope created inside a parent is disposed
//! together with the parent, children first.
//!
//! Callbacks registered while no scope is current are not lost: they attach
//! to a thread-local fallback (root) scope, torn down only by an explicit
//! [`dispose_root`] at application shutdown. This mirrors component
//! frameworks where hooks may run outside any component owner (for example
//! in a non-interactive rendering context).
//!
//! # Example
//!
//! ```ignore
//! let (_, scope) = create_scope(|| {
//!     on_cleanup(|| println!("component unmounted"));
//! });
//! scope.dispose(); // prints once; further disposes are no-ops
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

type CleanupFn = Box<dyn FnOnce() + 'static>;

/// Unique identifier for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
	fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(1);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}

	/// The fallback scope owning callbacks registered outside any scope.
	const ROOT: ScopeId = ScopeId(0);
}

#[derive(Default)]
struct ScopeRecord {
	cleanups: Vec<CleanupFn>,
	children: Vec<ScopeId>,
}

thread_local! {
	static SCOPES: RefCell<BTreeMap<ScopeId, ScopeRecord>> = RefCell::new(BTreeMap::new());
	static SCOPE_STACK: RefCell<Vec<ScopeId>> = const { RefCell::new(Vec::new()) };
}

/// Handle to a scope created with [`create_scope`].
///
/// Disposing runs the scope's cleanups (children first, then own cleanups in
/// reverse registration order) exactly once. Dropping the handle disposes
/// the scope as well.
#[must_use = "dropping the handle disposes the scope immediately"]
pub struct ScopeHandle {
	id: ScopeId,
}

impl ScopeHandle {
	/// The scope's id (tests and diagnostics).
	pub fn id(&self) -> ScopeId {
		self.id
	}

	/// Disposes the scope now. Safe to call more than once; later calls,
	/// including the one from Drop, are no-ops.
	pub fn dispose(&self) {
		dispose_scope(self.id);
	}
}

impl Drop for ScopeHandle {
	fn drop(&mut self) {
		dispose_scope(self.id);
	}
}

/// Runs `f` with a fresh scope as the current owner.
///
/// Returns `f`'s result and the handle controlling the scope's lifetime.
/// When a scope is already current, the new scope becomes its child and is
/// disposed with it.
pub fn create_scope<R>(f: impl FnOnce() -> R) -> (R, ScopeHandle) {
	let id = ScopeId::new();

	SCOPES.with(|scopes| {
		scopes.borrow_mut().insert(id, ScopeRecord::default());
	});
	if let Some(parent) = current_scope() {
		SCOPES.with(|scopes| {
			if let Some(record) = scopes.borrow_mut().get_mut(&parent) {
				record.children.push(id);
			}
		});
	}

	SCOPE_STACK.with(|stack| stack.borrow_mut().push(id));
	let result = f();
	SCOPE_STACK.with(|stack| {
		stack.borrow_mut().pop();
	});

	(result, ScopeHandle { id })
}

/// The id of the scope currently on top of the stack, if any.
pub fn current_scope() -> Option<ScopeId> {
	SCOPE_STACK.with(|stack| stack.borrow().last().copied())
}

/// Registers `f` to run when the current scope is disposed.
///
/// Outside any scope, `f` attaches to the fallback root scope instead of
/// being dropped; root cleanups run only on [`dispose_root`].
pub fn on_cleanup(f: impl FnOnce() + 'static) {
	let owner = current_scope().unwrap_or(ScopeId::ROOT);
	SCOPES.with(|scopes| {
		scopes
			.borrow_mut()
			.entry(owner)
			.or_default()
			.cleanups
			.push(Box::new(f));
	});
}

/// Disposes the fallback root scope, running every cleanup registered
/// outside an explicit scope. Intended for application shutdown; a fresh
/// root accumulates afterwards.
pub fn dispose_root() {
	dispose_scope(ScopeId::ROOT);
}

fn dispose_scope(id: ScopeId) {
	// Removing the record first makes disposal exactly-once even when a
	// cleanup re-enters (for example a cleanup dropping a ScopeHandle).
	let record = SCOPES.with(|scopes| scopes.borrow_mut().remove(&id));
	let Some(record) = record else {
		return;
	};

	for child in record.children.iter().rev() {
		dispose_scope(*child);
	}
	for cleanup in record.cleanups.into_iter().rev() {
		cleanup();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::RefCell as StdRefCell;
	use std::rc::Rc;

	use serial_test::serial;

	#[test]
	#[serial]
	fn cleanup_runs_on_dispose() {
		let ran = Rc::new(StdRefCell::new(false));

		let ran_in_cleanup = ran.clone();
		let (_, scope) = create_scope(move || {
			on_cleanup(move || *ran_in_cleanup.borrow_mut() = true);
		});

		assert!(!*ran.borrow());
		scope.dispose();
		assert!(*ran.borrow());
	}

	#[test]
	#[serial]
	fn dispose_is_exactly_once() {
		let runs = Rc::new(StdRefCell::new(0));

		let runs_in_cleanup = runs.clone();
		let (_, scope) = create_scope(move || {
			on_cleanup(move || *runs_in_cleanup.borrow_mut() += 1);
		});

		scope.dispose();
		scope.dispose();
		drop(scope);
		assert_eq!(*runs.borrow(), 1);
	}

	#[test]
	#[serial]
	fn cleanups_run_in_reverse_registration_order() {
		let order = Rc::new(StdRefCell::new(Vec::new()));

		let first = order.clone();
		let second = order.clone();
		let (_, scope) = create_scope(move || {
			on_cleanup(move || first.borrow_mut().push("first"));
			on_cleanup(move || second.borrow_mut().push("second"));
		});

		scope.dispose();
		assert_eq!(*order.borrow(), vec!["second", "first"]);
	}

	#[test]
	#[serial]
	fn child_scope_disposed_with_parent() {
		let order = Rc::new(StdRefCell::new(Vec::new()));

		let parent_log = order.clone();
		let child_log = order.clone();
		let (child_handle, parent) = create_scope(move || {
			on_cleanup(move || parent_log.borrow_mut().push("parent"));
			let (_, child) = create_scope(move || {
				on_cleanup(move || child_log.borrow_mut().push("child"));
			});
			child
		});

		parent.dispose();
		assert_eq!(*order.borrow(), vec!["child", "parent"]);

		// The child handle dropping afterwards is a no-op.
		drop(child_handle);
		assert_eq!(order.borrow().len(), 2);
	}

	#[test]
	#[serial]
	fn handle_drop_disposes() {
		let ran = Rc::new(StdRefCell::new(false));

		let ran_in_cleanup = ran.clone();
		{
			let (_, _scope) = create_scope(move || {
				on_cleanup(move || *ran_in_cleanup.borrow_mut() = true);
			});
		}

		assert!(*ran.borrow());
	}

	#[test]
	#[serial]
	fn orphan_cleanup_attaches_to_root() {
		let ran = Rc::new(StdRefCell::new(false));

		let ran_in_cleanup = ran.clone();
		on_cleanup(move || *ran_in_cleanup.borrow_mut() = true);

		assert!(!*ran.borrow());
		dispose_root();
		assert!(*ran.borrow());
	}

	#[test]
	#[serial]
	fn current_scope_reflects_stack() {
		assert!(current_scope().is_none());
		let ((), scope) = create_scope(|| {
			assert!(current_scope().is_some());
		});
		assert!(current_scope().is_none());
		scope.dispose();
	}
}
