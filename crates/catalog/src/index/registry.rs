// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	ops::Deref,
	sync::{Arc, Weak},
};

use parking_lot::RwLock;
use strata_core::{
	Signal,
	interface::{BuildOutcome, IndexAdmission, IndexDef, IndexDriver, IndexRegistry},
};
use strata_type::{
	Result,
	error::diagnostic::index::{
		index_already_registered, index_delete_invalid_status, index_expressions_already_registered,
		index_not_found,
	},
	return_error,
};
use tracing::{debug, error, instrument, warn};

use crate::index::{IndexLease, IndexStatus};

pub(crate) type IndexKey = (String, String);

/// Registry shared by every execution of one process. Clones share state.
#[derive(Clone)]
pub struct MemoryIndexRegistry(Arc<RegistryInner>);

pub struct RegistryInner {
	drivers: RwLock<Drivers>,
	indexes: RwLock<HashMap<IndexKey, Entry>>,
}

#[derive(Default)]
struct Drivers {
	by_id: HashMap<String, Arc<dyn IndexDriver>>,
	default: Option<String>,
}

struct Entry {
	index: Arc<IndexDef>,
	status: IndexStatus,
	leases: usize,
	deleted: Option<Signal>,
}

impl MemoryIndexRegistry {
	pub fn new() -> Self {
		Self::builder().build()
	}

	pub fn builder() -> MemoryIndexRegistryBuilder {
		MemoryIndexRegistryBuilder {
			drivers: Drivers::default(),
		}
	}
}

impl Default for MemoryIndexRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl Deref for MemoryIndexRegistry {
	type Target = RegistryInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

pub struct MemoryIndexRegistryBuilder {
	drivers: Drivers,
}

impl MemoryIndexRegistryBuilder {
	/// Registers a driver. The first registered driver is the default one.
	pub fn with_driver(mut self, driver: Arc<dyn IndexDriver>) -> Self {
		let id = driver.id().to_string();
		if self.drivers.default.is_none() {
			self.drivers.default = Some(id.clone());
		}
		self.drivers.by_id.insert(id, driver);
		self
	}

	pub fn with_default_driver(mut self, id: impl Into<String>) -> Self {
		self.drivers.default = Some(id.into());
		self
	}

	pub fn build(self) -> MemoryIndexRegistry {
		MemoryIndexRegistry(Arc::new(RegistryInner {
			drivers: RwLock::new(self.drivers),
			indexes: RwLock::new(HashMap::new()),
		}))
	}
}

impl MemoryIndexRegistry {
	pub fn register_driver(&self, driver: Arc<dyn IndexDriver>) {
		let mut drivers = self.drivers.write();
		let id = driver.id().to_string();
		if drivers.default.is_none() {
			drivers.default = Some(id.clone());
		}
		drivers.by_id.insert(id, driver);
	}

	pub fn status(&self, database: &str, id: &str) -> Option<IndexStatus> {
		self.indexes.read().get(&key(database, id)).map(|entry| entry.status)
	}

	/// Leases every ready index of `table`. Deleting an index waits for its
	/// leases unless forced.
	#[instrument(name = "catalog::index::ready", level = "trace", skip(self))]
	pub fn ready_indexes(&self, database: &str, table: &str) -> Vec<IndexLease> {
		let mut indexes = self.indexes.write();
		let mut result = Vec::new();
		for (key, entry) in indexes.iter_mut() {
			if entry.status == IndexStatus::Ready && entry.index.database == database && entry.index.table == table {
				entry.leases += 1;
				result.push(IndexLease::new(Arc::downgrade(&self.0), key.clone(), entry.index.clone()));
			}
		}
		result
	}
}

impl RegistryInner {
	fn driver_for(&self, index: &IndexDef) -> Option<Arc<dyn IndexDriver>> {
		self.drivers.read().by_id.get(&index.driver).cloned()
	}

	/// Returns whether the index became ready.
	fn admitted(&self, key: &IndexKey, outcome: BuildOutcome) -> bool {
		let mut indexes = self.indexes.write();
		let Some(entry) = indexes.get_mut(key) else {
			warn!(index = %key.1, "admitted index is no longer registered");
			return false;
		};

		match outcome {
			BuildOutcome::Saved if entry.status == IndexStatus::Building => {
				entry.status = IndexStatus::Ready;
				debug!(index = %key.1, "index is ready");
				true
			}
			BuildOutcome::Saved => {
				warn!(index = %key.1, status = ?entry.status, "saved index is not building");
				false
			}
			BuildOutcome::Failed => {
				debug!(index = %key.1, "index build failed, waiting for deletion");
				false
			}
		}
	}

	/// Removes the index storage and the entry, then fires `deleted`.
	fn remove(&self, key: &IndexKey, index: &IndexDef, deleted: &Signal) -> Result<()> {
		if let Some(driver) = self.driver_for(index) {
			driver.delete(index)?;
		}
		self.indexes.write().remove(key);
		deleted.fire(());
		Ok(())
	}

	pub(crate) fn release(&self, key: &IndexKey) {
		let pending = {
			let mut indexes = self.indexes.write();
			let Some(entry) = indexes.get_mut(key) else {
				return;
			};
			entry.leases = entry.leases.saturating_sub(1);
			if entry.leases > 0 || entry.status != IndexStatus::Deleting {
				return;
			}
			entry.deleted.clone().map(|deleted| (entry.index.clone(), deleted))
		};

		if let Some((index, deleted)) = pending {
			if let Err(err) = self.remove(key, &index, &deleted) {
				error!(index = %index.id, error = %err.message, "unable to delete the index storage");
				self.indexes.write().remove(key);
				deleted.fire(());
			}
		}
	}
}

impl IndexRegistry for MemoryIndexRegistry {
	fn default_driver(&self) -> Option<Arc<dyn IndexDriver>> {
		let drivers = self.drivers.read();
		drivers.default.as_ref().and_then(|id| drivers.by_id.get(id)).cloned()
	}

	fn driver(&self, name: &str) -> Option<Arc<dyn IndexDriver>> {
		self.drivers.read().by_id.get(name).cloned()
	}

	#[instrument(name = "catalog::index::add", level = "debug", skip(self, index), fields(index = %index.id, table = %index.table))]
	fn add_index(&self, index: Arc<IndexDef>) -> Result<IndexAdmission> {
		let key = key(&index.database, &index.id);
		{
			let mut indexes = self.indexes.write();
			if indexes.contains_key(&key) {
				return_error!(index_already_registered(&index.id));
			}

			let expressions = index.expression_keys();
			let duplicate = indexes.values().any(|entry| {
				entry.index.database == index.database
					&& entry.index.table == index.table
					&& entry.index.expression_keys() == expressions
			});
			if duplicate {
				return_error!(index_expressions_already_registered(&index.id, &index.table));
			}

			indexes.insert(
				key.clone(),
				Entry {
					index: index.clone(),
					status: IndexStatus::Building,
					leases: 0,
					deleted: None,
				},
			);
		}

		let admission = IndexAdmission::new();
		let registry: Weak<RegistryInner> = Arc::downgrade(&self.0);
		let ready = admission.ready.clone();
		admission.admitted.subscribe(move |outcome| {
			let promoted = registry.upgrade().is_some_and(|registry| registry.admitted(&key, *outcome));
			if *outcome == BuildOutcome::Saved {
				ready.fire(promoted);
			}
		});

		Ok(admission)
	}

	#[instrument(name = "catalog::index::delete", level = "debug", skip(self))]
	fn delete_index(&self, database: &str, id: &str, force: bool) -> Result<Signal> {
		let key = key(database, id);

		let (index, previous, deleted, now) = {
			let mut indexes = self.indexes.write();
			let Some(entry) = indexes.get_mut(&key) else {
				let mut known: Vec<String> =
					indexes.keys().filter(|(db, _)| db == database).map(|(_, id)| id.clone()).collect();
				known.sort();
				return_error!(index_not_found(id, &known));
			};

			if !force && entry.status != IndexStatus::Ready {
				return_error!(index_delete_invalid_status(id));
			}

			if let Some(deleted) = &entry.deleted {
				if !force || entry.leases == 0 {
					return Ok(deleted.clone());
				}
			}

			let previous = entry.status;
			let deleted = entry.deleted.get_or_insert_with(Signal::new).clone();
			entry.status = IndexStatus::Deleting;
			(entry.index.clone(), previous, deleted, force || entry.leases == 0)
		};

		if !now {
			debug!(index = id, "deletion deferred until the last lease is released");
			return Ok(deleted);
		}

		if let Err(err) = self.remove(&key, &index, &deleted) {
			if let Some(entry) = self.indexes.write().get_mut(&key) {
				entry.status = previous;
				if previous != IndexStatus::Deleting {
					entry.deleted = None;
				}
			}
			return Err(err);
		}

		Ok(deleted)
	}
}

fn key(database: &str, id: &str) -> IndexKey {
	(database.to_string(), id.to_string())
}
