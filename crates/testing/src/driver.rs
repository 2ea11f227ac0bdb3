// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use strata_core::{
	Expression, Value,
	interface::{IndexConfig, IndexDef, IndexDriver, Location, Partition, PartitionIndexKeyValueIter},
};
use strata_type::{Result, error::diagnostic::internal::internal, return_error};
use tracing::debug;

type SaveHook = Arc<dyn Fn(&IndexDef) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
	pub partition: Partition,
	pub values: Vec<Value>,
	pub location: Location,
}

/// Index driver keeping every saved entry in memory.
pub struct MemoryDriver {
	id: String,
	fail_save: bool,
	fail_delete: bool,
	save_hook: Option<SaveHook>,
	state: Mutex<DriverState>,
}

#[derive(Default)]
struct DriverState {
	created: Vec<IndexDef>,
	saved: HashMap<String, Vec<StoredEntry>>,
	deleted: Vec<String>,
}

impl MemoryDriver {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			fail_save: false,
			fail_delete: false,
			save_hook: None,
			state: Mutex::new(DriverState::default()),
		}
	}

	/// Saves consume their input and then fail.
	pub fn failing_save(mut self) -> Self {
		self.fail_save = true;
		self
	}

	pub fn failing_delete(mut self) -> Self {
		self.fail_delete = true;
		self
	}

	/// Runs `hook` at the start of every save, on the saving thread.
	pub fn with_save_hook(mut self, hook: impl Fn(&IndexDef) + Send + Sync + 'static) -> Self {
		self.save_hook = Some(Arc::new(hook));
		self
	}

	pub fn created(&self) -> Vec<IndexDef> {
		self.state.lock().created.clone()
	}

	pub fn entries(&self, id: &str) -> Vec<StoredEntry> {
		self.state.lock().saved.get(id).cloned().unwrap_or_default()
	}

	pub fn is_saved(&self, id: &str) -> bool {
		self.state.lock().saved.contains_key(id)
	}

	/// Ids of every delete request, in call order.
	pub fn deleted(&self) -> Vec<String> {
		self.state.lock().deleted.clone()
	}
}

impl IndexDriver for MemoryDriver {
	fn id(&self) -> &str {
		&self.id
	}

	fn create(
		&self,
		database: &str,
		table: &str,
		name: &str,
		expressions: Vec<Expression>,
		config: IndexConfig,
	) -> Result<IndexDef> {
		let index = IndexDef {
			id: name.to_string(),
			database: database.to_string(),
			table: table.to_string(),
			driver: self.id.clone(),
			expressions,
			config,
		};
		self.state.lock().created.push(index.clone());
		Ok(index)
	}

	fn save(&self, index: &IndexDef, iter: &mut dyn PartitionIndexKeyValueIter) -> Result<()> {
		if let Some(hook) = &self.save_hook {
			hook(index);
		}

		let mut entries = Vec::new();
		while let Some((partition, mut kv)) = iter.next()? {
			let drained = loop {
				match kv.next() {
					Ok(Some((values, location))) => entries.push(StoredEntry {
						partition: partition.clone(),
						values,
						location,
					}),
					Ok(None) => break Ok(()),
					Err(err) => break Err(err),
				}
			};
			kv.close()?;
			drained?;
		}

		if self.fail_save {
			return_error!(internal("index storage rejected the write"));
		}

		debug!(index = %index.id, entries = entries.len(), "saved index entries");
		self.state.lock().saved.insert(index.id.clone(), entries);
		Ok(())
	}

	fn delete(&self, index: &IndexDef) -> Result<()> {
		let mut state = self.state.lock();
		state.deleted.push(index.id.clone());
		if self.fail_delete {
			return_error!(internal("index storage is unavailable"));
		}
		state.saved.remove(&index.id);
		Ok(())
	}
}
