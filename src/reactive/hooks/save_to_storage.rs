//! Storage persistence: `use_save_to_storage`.

use std::cell::Cell;

use serde::Serialize;

use crate::dom::StorageArea;
use crate::reactive::{Effect, create_deferred, on_cleanup};

/// Options for [`use_save_to_storage`].
#[derive(Debug, Clone, Copy)]
pub struct SaveToStorageOptions {
	/// Storage area to write into. Default [`StorageArea::Local`].
	pub storage: StorageArea,
	/// When true, writes are batched to browser idle time instead of
	/// happening synchronously on every change. Default `true`.
	pub deferred: bool,
	/// When false, the value present at hook creation is not written;
	/// only subsequent changes are. Default `true`.
	pub save_initial: bool,
}

impl Default for SaveToStorageOptions {
	fn default() -> Self {
		Self {
			storage: StorageArea::Local,
			deferred: true,
			save_initial: true,
		}
	}
}

impl SaveToStorageOptions {
	/// Selects the storage area.
	pub fn storage(mut self, storage: StorageArea) -> Self {
		self.storage = storage;
		self
	}

	/// Toggles idle-time batching.
	pub fn deferred(mut self, deferred: bool) -> Self {
		self.deferred = deferred;
		self
	}

	/// Toggles the initial write.
	pub fn save_initial(mut self, save_initial: bool) -> Self {
		self.save_initial = save_initial;
		self
	}
}

// Strings, numbers and booleans are stored bare; compound values as JSON
// text. Reading the value back is the caller's concern.
fn encode<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
	let json = serde_json::to_value(value)?;
	Ok(match json {
		serde_json::Value::String(text) => text,
		other => other.to_string(),
	})
}

/// Persists a reactive value under `key` whenever it changes.
///
/// `data` is a reactive accessor: signals it reads retrigger the save. With
/// `deferred` (the default) writes ride on idle time via
/// [`create_deferred`], so bursts of changes collapse into one write.
/// Serialization or storage failures are logged as warnings and never
/// raised - persistence is best-effort by design.
///
/// # Example
///
/// ```ignore
/// let filters = Signal::new(Filters::default());
/// use_save_to_storage(
///     "table-filters",
///     {
///         let filters = filters.clone();
///         move || filters.get()
///     },
///     SaveToStorageOptions::default(),
/// );
/// ```
pub fn use_save_to_storage<T, F>(key: impl Into<String>, data: F, options: SaveToStorageOptions)
where
	T: Serialize + Clone + 'static,
	F: Fn() -> T + 'static,
{
	let key = key.into();

	let read: Box<dyn Fn() -> T> = if options.deferred {
		let deferred = create_deferred(data);
		Box::new(move || deferred.get())
	} else {
		Box::new(data)
	};

	let first_run = Cell::new(true);
	let effect = Effect::new(move || {
		let value = read();
		if first_run.replace(false) && !options.save_initial {
			return;
		}

		let text = match encode(&value) {
			Ok(text) => text,
			Err(err) => {
				crate::warn_log!("use_save_to_storage: failed to serialize '{key}': {err}");
				return;
			}
		};
		if let Err(err) = options.storage.set_item(&key, &text) {
			crate::warn_log!("use_save_to_storage: failed to persist '{key}': {err}");
		}
	});

	on_cleanup(move || effect.dispose());
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::platform::testing;
	use crate::reactive::{Signal, create_scope, with_runtime};
	use serde::Serialize;
	use serial_test::serial;

	fn flush() {
		with_runtime(|rt| rt.flush_updates());
	}

	fn immediate() -> SaveToStorageOptions {
		SaveToStorageOptions::default().deferred(false)
	}

	#[test]
	#[serial]
	fn writes_initial_value_by_default() {
		StorageArea::Local.clear();

		let count = Signal::new(5);
		let count_read = count.clone();
		let ((), scope) = create_scope(move || {
			use_save_to_storage("count", move || count_read.get(), immediate());
		});

		assert_eq!(
			StorageArea::Local.get_item("count").unwrap(),
			Some("5".to_string())
		);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn skips_initial_value_when_asked() {
		StorageArea::Local.clear();

		let count = Signal::new(5);
		let count_read = count.clone();
		let ((), scope) = create_scope(move || {
			use_save_to_storage(
				"count",
				move || count_read.get(),
				immediate().save_initial(false),
			);
		});

		assert_eq!(StorageArea::Local.get_item("count").unwrap(), None);

		count.set(6);
		flush();
		assert_eq!(
			StorageArea::Local.get_item("count").unwrap(),
			Some("6".to_string())
		);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn strings_are_stored_bare() {
		StorageArea::Local.clear();

		let name = Signal::new("arlette".to_string());
		let name_read = name.clone();
		let ((), scope) = create_scope(move || {
			use_save_to_storage("name", move || name_read.get(), immediate());
		});

		// Not "\"arlette\"".
		assert_eq!(
			StorageArea::Local.get_item("name").unwrap(),
			Some("arlette".to_string())
		);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn compound_values_are_stored_as_json() {
		#[derive(Clone, Serialize)]
		struct Filters {
			page: u32,
			query: String,
		}

		StorageArea::Local.clear();

		let filters = Signal::new(Filters {
			page: 2,
			query: "gypsy jazz".to_string(),
		});
		let filters_read = filters.clone();
		let ((), scope) = create_scope(move || {
			use_save_to_storage("filters", move || filters_read.get(), immediate());
		});

		assert_eq!(
			StorageArea::Local.get_item("filters").unwrap(),
			Some(r#"{"page":2,"query":"gypsy jazz"}"#.to_string())
		);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn session_storage_is_honored() {
		StorageArea::Local.clear();
		StorageArea::Session.clear();

		let flag = Signal::new(true);
		let flag_read = flag.clone();
		let ((), scope) = create_scope(move || {
			use_save_to_storage(
				"flag",
				move || flag_read.get(),
				immediate().storage(StorageArea::Session),
			);
		});

		assert_eq!(
			StorageArea::Session.get_item("flag").unwrap(),
			Some("true".to_string())
		);
		assert_eq!(StorageArea::Local.get_item("flag").unwrap(), None);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn deferred_writes_wait_for_idle_time() {
		testing::reset();
		StorageArea::Local.clear();

		let count = Signal::new(1);
		let count_read = count.clone();
		let ((), scope) = create_scope(move || {
			use_save_to_storage("count", move || count_read.get(), SaveToStorageOptions::default());
		});

		// Initial value is written from the mirror's starting state.
		assert_eq!(
			StorageArea::Local.get_item("count").unwrap(),
			Some("1".to_string())
		);

		count.set(2);
		flush();
		// The mirror has not advanced yet.
		assert_eq!(
			StorageArea::Local.get_item("count").unwrap(),
			Some("1".to_string())
		);

		testing::run_idle_callbacks();
		flush();
		assert_eq!(
			StorageArea::Local.get_item("count").unwrap(),
			Some("2".to_string())
		);
		scope.dispose();
	}

	#[test]
	#[serial]
	fn disposed_scope_stops_persisting() {
		StorageArea::Local.clear();

		let count = Signal::new(1);
		let count_read = count.clone();
		let ((), scope) = create_scope(move || {
			use_save_to_storage("count", move || count_read.get(), immediate());
		});
		scope.dispose();

		count.set(99);
		flush();
		assert_eq!(
			StorageArea::Local.get_item("count").unwrap(),
			Some("1".to_string())
		);
	}
}
