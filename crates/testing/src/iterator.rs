// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};

use strata_core::{
	Value,
	interface::{IndexKeyValueIter, Location, Partition, PartitionIndexKeyValueIter},
};
use strata_type::{Result, error::diagnostic::internal::internal, return_error};

pub type Entries = Vec<(Vec<Value>, Location)>;

/// Counts how often an iterator was closed.
#[derive(Debug, Clone, Default)]
pub struct CloseCounter(Arc<AtomicUsize>);

impl CloseCounter {
	pub fn get(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}

	fn increment(&self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}

pub struct MemoryKeyValueIter {
	entries: VecDeque<(Vec<Value>, Location)>,
	fail_after: Option<usize>,
	yielded: usize,
	closes: CloseCounter,
}

impl MemoryKeyValueIter {
	pub fn new(entries: Entries) -> Self {
		Self {
			entries: entries.into(),
			fail_after: None,
			yielded: 0,
			closes: CloseCounter::default(),
		}
	}

	/// Fails with an internal error once `n` entries were yielded.
	pub fn fail_after(mut self, n: usize) -> Self {
		self.fail_after = Some(n);
		self
	}

	pub fn closes(&self) -> CloseCounter {
		self.closes.clone()
	}
}

impl IndexKeyValueIter for MemoryKeyValueIter {
	fn next(&mut self) -> Result<Option<(Vec<Value>, Location)>> {
		if self.fail_after == Some(self.yielded) {
			return_error!(internal("storage read failed"));
		}
		let entry = self.entries.pop_front();
		if entry.is_some() {
			self.yielded += 1;
		}
		Ok(entry)
	}

	fn close(&mut self) -> Result<()> {
		self.closes.increment();
		Ok(())
	}
}

pub struct MemoryPartitionIter {
	partitions: VecDeque<(Partition, Entries)>,
	fail_after: Option<usize>,
	closes: CloseCounter,
}

impl MemoryPartitionIter {
	pub fn new(partitions: Vec<(Partition, Entries)>) -> Self {
		Self {
			partitions: partitions.into(),
			fail_after: None,
			closes: CloseCounter::default(),
		}
	}

	/// Every partition's iterator fails once it yielded `n` entries.
	pub fn fail_after(mut self, n: usize) -> Self {
		self.fail_after = Some(n);
		self
	}

	pub fn closes(&self) -> CloseCounter {
		self.closes.clone()
	}

	pub fn sharing_closes(mut self, closes: CloseCounter) -> Self {
		self.closes = closes;
		self
	}
}

impl PartitionIndexKeyValueIter for MemoryPartitionIter {
	fn next(&mut self) -> Result<Option<(Partition, Box<dyn IndexKeyValueIter>)>> {
		let Some((partition, entries)) = self.partitions.pop_front() else {
			return Ok(None);
		};
		let mut iter = MemoryKeyValueIter::new(entries);
		iter.fail_after = self.fail_after;
		Ok(Some((partition, Box::new(iter))))
	}

	fn close(&mut self) -> Result<()> {
		self.closes.increment();
		Ok(())
	}
}
