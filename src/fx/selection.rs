/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::fx::currency::{coerce_code, is_known, BASE_CODE};
use anyhow::Error;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Name of the single persisted key holding the selected currency code.
pub const STORAGE_KEY: &str = "sb_currency";

pub trait SelectionStore: Send + Sync {
	fn load(&self) -> Result<Option<String>, Error>;
	fn save(&self, code: &str) -> Result<(), Error>;
}

/// Keeps the selection as a one-line file named after the storage key.
pub struct FileStore {
	dir: PathBuf,
}

impl FileStore {
	pub fn new(dir: PathBuf) -> Self {
		Self { dir }
	}

	fn path(&self) -> PathBuf {
		self.dir.join(STORAGE_KEY)
	}
}

impl SelectionStore for FileStore {
	fn load(&self) -> Result<Option<String>, Error> {
		let path = self.path();
		if !path.exists() {
			return Ok(None);
		}

		let content = fs::read_to_string(path)?;
		let code = content.trim();
		Ok((!code.is_empty()).then(|| code.to_string()))
	}

	fn save(&self, code: &str) -> Result<(), Error> {
		fs::create_dir_all(&self.dir)?;
		fs::write(self.path(), code)?;
		Ok(())
	}
}

/// The display currency chosen by the user. Read lazily from the store on
/// first use and written through on every change; the store failing only
/// costs persistence, never the in-memory value.
pub struct Selection {
	store: Box<dyn SelectionStore>,
	current: Mutex<Option<&'static str>>,
}

impl Selection {
	pub fn new(store: Box<dyn SelectionStore>) -> Self {
		Self {
			store,
			current: Mutex::new(None),
		}
	}

	pub fn get(&self) -> &'static str {
		let mut current =
			self.current.lock().unwrap_or_else(PoisonError::into_inner);
		if let Some(code) = *current {
			return code;
		}

		let code = match self.store.load() {
			Ok(Some(saved)) if is_known(&saved) => coerce_code(&saved),
			Ok(Some(saved)) => {
				debug!("ignoring unknown saved currency {}", saved);
				BASE_CODE
			},
			Ok(None) => BASE_CODE,
			Err(e) => {
				warn!("could not read saved currency: {}", e);
				BASE_CODE
			},
		};

		*current = Some(code);
		code
	}

	/// Selects `code`, or the base code if it is not in the catalog, and
	/// returns what was selected.
	pub fn set(&self, code: &str) -> &'static str {
		let code = coerce_code(code);
		*self.current.lock().unwrap_or_else(PoisonError::into_inner) =
			Some(code);

		if let Err(e) = self.store.save(code) {
			warn!("could not save currency selection: {}", e);
		}
		code
	}
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
	use super::SelectionStore;
	use anyhow::{bail, Error};
	use std::sync::{Arc, Mutex};

	/// In-memory store; `broken()` makes every call fail.
	#[derive(Clone, Default)]
	pub struct MemoryStore {
		pub value: Arc<Mutex<Option<String>>>,
		broken: bool,
	}

	impl MemoryStore {
		pub fn with(code: &str) -> Self {
			let store = Self::default();
			*store.value.lock().unwrap() = Some(code.to_string());
			store
		}

		pub fn broken() -> Self {
			Self {
				broken: true,
				..Self::default()
			}
		}
	}

	impl SelectionStore for MemoryStore {
		fn load(&self) -> Result<Option<String>, Error> {
			if self.broken {
				bail!("storage unavailable");
			}
			Ok(self.value.lock().unwrap().clone())
		}

		fn save(&self, code: &str) -> Result<(), Error> {
			if self.broken {
				bail!("storage unavailable");
			}
			*self.value.lock().unwrap() = Some(code.to_string());
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fx::currency::CURRENCIES;

	#[test]
	fn test_defaults_to_base() {
		let selection = Selection::new(Box::new(MemoryStore::default()));
		assert_eq!(selection.get(), BASE_CODE);
	}

	#[test]
	fn test_reads_saved_code() {
		let selection = Selection::new(Box::new(MemoryStore::with("EUR")));
		assert_eq!(selection.get(), "EUR");
	}

	#[test]
	fn test_unknown_saved_code_gives_base() {
		let selection = Selection::new(Box::new(MemoryStore::with("XYZ")));
		assert_eq!(selection.get(), BASE_CODE);
	}

	#[test]
	fn test_round_trip_for_every_currency() {
		let store = MemoryStore::default();
		let selection = Selection::new(Box::new(store.clone()));
		for c in &CURRENCIES {
			assert_eq!(selection.set(c.code), c.code);
			assert_eq!(selection.get(), c.code);
			assert_eq!(store.value.lock().unwrap().as_deref(), Some(c.code));
		}
	}

	#[test]
	fn test_unknown_code_coerced_on_set() {
		let store = MemoryStore::default();
		let selection = Selection::new(Box::new(store.clone()));
		selection.set("USD");
		assert_eq!(selection.set("DOGE"), BASE_CODE);
		assert_eq!(selection.get(), BASE_CODE);
		assert_eq!(store.value.lock().unwrap().as_deref(), Some(BASE_CODE));
	}

	#[test]
	fn test_broken_store_keeps_working_in_memory() {
		let selection = Selection::new(Box::new(MemoryStore::broken()));
		assert_eq!(selection.get(), BASE_CODE);
		selection.set("GBP");
		assert_eq!(selection.get(), "GBP");
	}

	#[test]
	fn test_file_store_persists_across_instances() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested");

		let first = Selection::new(Box::new(FileStore::new(path.clone())));
		assert_eq!(first.get(), BASE_CODE);
		first.set("SGD");

		let contents = fs::read_to_string(path.join(STORAGE_KEY)).unwrap();
		assert_eq!(contents, "SGD");

		let second = Selection::new(Box::new(FileStore::new(path)));
		assert_eq!(second.get(), "SGD");
	}

	#[test]
	fn test_file_store_ignores_blank_file() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join(STORAGE_KEY), "  \n").unwrap();
		let store = FileStore::new(dir.path().to_path_buf());
		assert_eq!(store.load().unwrap(), None);
	}

	#[test]
	fn test_file_store_trims_newline() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join(STORAGE_KEY), "AUD\n").unwrap();
		let selection =
			Selection::new(Box::new(FileStore::new(dir.path().to_path_buf())));
		assert_eq!(selection.get(), "AUD");
	}
}
