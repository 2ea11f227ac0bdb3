// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Instant,
};

use parking_lot::Mutex;
use strata_core::{
	Value,
	interface::{IndexKeyValueIter, Location, Partition, PartitionIndexKeyValueIter},
};
use strata_type::{Error, Result};
use tracing::{Span, debug, debug_span, field};

/// Row counter shared by every partition of one index build. Every
/// `batch_size` rows it reports the batch and starts a new iterator span.
pub struct Progress {
	index: String,
	table: String,
	batch_size: u64,
	rows: AtomicU64,
	batch: Mutex<Batch>,
}

struct Batch {
	span: Span,
	started: Instant,
}

impl Progress {
	pub fn new(index: impl Into<String>, table: impl Into<String>, batch_size: u64) -> Self {
		let index = index.into();
		let table = table.into();
		let span = iterator_span(&index, &table, 0);
		Self {
			index,
			table,
			batch_size: batch_size.max(1),
			rows: AtomicU64::new(0),
			batch: Mutex::new(Batch {
				span,
				started: Instant::now(),
			}),
		}
	}

	pub fn rows(&self) -> u64 {
		self.rows.load(Ordering::Acquire)
	}

	fn row(&self) {
		let rows = self.rows.fetch_add(1, Ordering::AcqRel) + 1;
		if rows % self.batch_size != 0 {
			return;
		}

		let mut batch = self.batch.lock();
		debug!(
			parent: &batch.span,
			index = %self.index,
			rows,
			duration = ?batch.started.elapsed(),
			"indexed batch of rows"
		);
		batch.span = iterator_span(&self.index, &self.table, rows);
		batch.started = Instant::now();
	}

	fn fail(&self, err: &Error) {
		let mut batch = self.batch.lock();
		batch.span.record("error", field::display(&err.message));
		batch.span = Span::none();
	}
}

fn iterator_span(index: &str, table: &str, start: u64) -> Span {
	debug_span!("plan::create_index::iterator", index, table, start, error = field::Empty)
}

/// Counts rows across every partition it hands out.
pub struct ProgressPartitionKeyValueIter {
	inner: Box<dyn PartitionIndexKeyValueIter>,
	progress: Arc<Progress>,
	closed: bool,
}

impl ProgressPartitionKeyValueIter {
	pub fn new(inner: Box<dyn PartitionIndexKeyValueIter>, progress: Arc<Progress>) -> Self {
		Self {
			inner,
			progress,
			closed: false,
		}
	}

	pub fn progress(&self) -> Arc<Progress> {
		self.progress.clone()
	}
}

impl PartitionIndexKeyValueIter for ProgressPartitionKeyValueIter {
	fn next(&mut self) -> Result<Option<(Partition, Box<dyn IndexKeyValueIter>)>> {
		match self.inner.next() {
			Ok(Some((partition, iter))) => {
				debug!(index = %self.progress.index, %partition, "indexing partition");
				Ok(Some((partition, Box::new(ProgressKeyValueIter::new(iter, self.progress.clone())))))
			}
			Ok(None) => Ok(None),
			Err(err) => {
				self.progress.fail(&err);
				Err(err)
			}
		}
	}

	fn close(&mut self) -> Result<()> {
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		self.inner.close()
	}
}

pub struct ProgressKeyValueIter {
	inner: Box<dyn IndexKeyValueIter>,
	progress: Arc<Progress>,
	closed: bool,
}

impl ProgressKeyValueIter {
	pub fn new(inner: Box<dyn IndexKeyValueIter>, progress: Arc<Progress>) -> Self {
		Self {
			inner,
			progress,
			closed: false,
		}
	}
}

impl IndexKeyValueIter for ProgressKeyValueIter {
	fn next(&mut self) -> Result<Option<(Vec<Value>, Location)>> {
		match self.inner.next() {
			Ok(Some(entry)) => {
				self.progress.row();
				Ok(Some(entry))
			}
			Ok(None) => Ok(None),
			Err(err) => {
				self.progress.fail(&err);
				Err(err)
			}
		}
	}

	fn close(&mut self) -> Result<()> {
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		self.inner.close()
	}
}

#[cfg(test)]
mod tests {
	use strata_core::Value;
	use strata_testing::iterator::{MemoryKeyValueIter, MemoryPartitionIter};

	use super::*;

	fn entries(n: i64) -> Vec<(Vec<Value>, Location)> {
		(0..n).map(|i| (vec![Value::int8(i)], vec![i as u8])).collect()
	}

	fn drain(iter: &mut dyn PartitionIndexKeyValueIter) -> Result<()> {
		while let Some((_, mut kv)) = iter.next()? {
			while kv.next()?.is_some() {}
			kv.close()?;
		}
		Ok(())
	}

	#[test]
	fn test_counts_rows_across_partitions() {
		let base = MemoryPartitionIter::new(vec![(Partition(vec![1]), entries(3)), (Partition(vec![2]), entries(4))]);
		let mut iter = ProgressPartitionKeyValueIter::new(Box::new(base), Arc::new(Progress::new("idx", "t", 2)));

		drain(&mut iter).unwrap();

		assert_eq!(iter.progress().rows(), 7);
	}

	#[test]
	fn test_error_is_propagated_unchanged() {
		let base = MemoryKeyValueIter::new(entries(3)).fail_after(2);
		let progress = Arc::new(Progress::new("idx", "t", 10));
		let mut iter = ProgressKeyValueIter::new(Box::new(base), progress.clone());

		assert!(iter.next().unwrap().is_some());
		assert!(iter.next().unwrap().is_some());
		assert_eq!(iter.next().unwrap_err().code(), "INTERNAL_ERROR");
		assert_eq!(progress.rows(), 2);
	}

	#[test]
	fn test_closes_wrapped_iterator_once() {
		let base = MemoryKeyValueIter::new(entries(1));
		let closes = base.closes();
		let mut iter = ProgressKeyValueIter::new(Box::new(base), Arc::new(Progress::new("idx", "t", 10)));

		iter.close().unwrap();
		iter.close().unwrap();

		assert_eq!(closes.get(), 1);
	}
}
