// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::Arc,
	thread,
	time::{Duration, Instant},
};

use parking_lot::Mutex;
use strata_core::{
	Signal,
	interface::{IndexAdmission, IndexDef, IndexDriver, IndexRegistry},
};
use strata_type::{Result, error::diagnostic::internal::internal, return_error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
	pub database: String,
	pub id: String,
	pub force: bool,
}

/// Forwards to another registry and records the requests it sees.
pub struct RecordingRegistry {
	inner: Arc<dyn IndexRegistry>,
	reject_deletes: bool,
	ready_delay: Option<Duration>,
	ready_released: Arc<Mutex<Option<Instant>>>,
	added: Mutex<Vec<String>>,
	deletes: Mutex<Vec<DeleteRequest>>,
}

impl RecordingRegistry {
	pub fn new(inner: Arc<dyn IndexRegistry>) -> Self {
		Self {
			inner,
			reject_deletes: false,
			ready_delay: None,
			ready_released: Arc::new(Mutex::new(None)),
			added: Mutex::new(Vec::new()),
			deletes: Mutex::new(Vec::new()),
		}
	}

	/// Every delete request fails without reaching the wrapped registry.
	pub fn rejecting_deletes(mut self) -> Self {
		self.reject_deletes = true;
		self
	}

	/// Hands `ready` to the builder from another thread, `delay` after the
	/// wrapped registry fired it.
	pub fn delaying_ready(mut self, delay: Duration) -> Self {
		self.ready_delay = Some(delay);
		self
	}

	/// When the delayed `ready` was handed over.
	pub fn ready_released_at(&self) -> Option<Instant> {
		*self.ready_released.lock()
	}

	pub fn added(&self) -> Vec<String> {
		self.added.lock().clone()
	}

	pub fn deletes(&self) -> Vec<DeleteRequest> {
		self.deletes.lock().clone()
	}
}

impl IndexRegistry for RecordingRegistry {
	fn default_driver(&self) -> Option<Arc<dyn IndexDriver>> {
		self.inner.default_driver()
	}

	fn driver(&self, name: &str) -> Option<Arc<dyn IndexDriver>> {
		self.inner.driver(name)
	}

	fn add_index(&self, index: Arc<IndexDef>) -> Result<IndexAdmission> {
		self.added.lock().push(index.id.clone());
		let admission = self.inner.add_index(index)?;
		let Some(delay) = self.ready_delay else {
			return Ok(admission);
		};

		let delayed = IndexAdmission {
			admitted: admission.admitted.clone(),
			ready: Signal::new(),
		};
		let forward = delayed.ready.clone();
		let released = self.ready_released.clone();
		admission.ready.subscribe(move |ready| {
			let ready = *ready;
			thread::spawn(move || {
				thread::sleep(delay);
				*released.lock() = Some(Instant::now());
				forward.fire(ready);
			});
		});
		Ok(delayed)
	}

	fn delete_index(&self, database: &str, id: &str, force: bool) -> Result<Signal> {
		self.deletes.lock().push(DeleteRequest {
			database: database.to_string(),
			id: id.to_string(),
			force,
		});
		if self.reject_deletes {
			return_error!(internal("registry refused the deletion"));
		}
		self.inner.delete_index(database, id, force)
	}
}
