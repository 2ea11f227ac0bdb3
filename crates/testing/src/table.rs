// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use parking_lot::Mutex;
use strata_core::{
	Row, Schema,
	interface::{
		ChecksumableTable, IndexableTable, Partition, PartitionIndexKeyValueIter, RowIter, RowsIter, Table,
	},
};
use strata_type::{Result, error, error::diagnostic::query::column_not_found};

use crate::iterator::{CloseCounter, Entries, MemoryPartitionIter};

/// A table with rows and nothing else: neither indexable nor checksumable.
pub struct PlainTable {
	name: String,
	schema: Schema,
	rows: Vec<Row>,
}

impl PlainTable {
	pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<Row>) -> Self {
		Self {
			name: name.into(),
			schema,
			rows,
		}
	}
}

impl Table for PlainTable {
	fn name(&self) -> &str {
		&self.name
	}

	fn schema(&self) -> Schema {
		self.schema.clone()
	}

	fn scan(&self) -> Result<Box<dyn RowIter>> {
		Ok(Box::new(RowsIter::new(self.rows.clone())))
	}
}

/// An indexable table splitting its rows round-robin over partitions.
pub struct MemoryTable {
	inner: PlainTable,
	partitions: usize,
	checksum: Option<String>,
	fail_after: Option<usize>,
	closes: CloseCounter,
	requested: Mutex<Vec<Vec<String>>>,
}

impl MemoryTable {
	pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<Row>) -> Self {
		Self {
			inner: PlainTable::new(name, schema, rows),
			partitions: 1,
			checksum: None,
			fail_after: None,
			closes: CloseCounter::default(),
			requested: Mutex::new(Vec::new()),
		}
	}

	pub fn with_partitions(mut self, partitions: usize) -> Self {
		self.partitions = partitions.max(1);
		self
	}

	pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
		self.checksum = Some(checksum.into());
		self
	}

	/// Makes every partition fail after yielding `n` rows.
	pub fn fail_after(mut self, n: usize) -> Self {
		self.fail_after = Some(n);
		self
	}

	/// Close count of the partition iterators handed out.
	pub fn closes(&self) -> CloseCounter {
		self.closes.clone()
	}

	/// The column lists index builds asked for, in call order.
	pub fn requested_columns(&self) -> Vec<Vec<String>> {
		self.requested.lock().clone()
	}
}

impl Table for MemoryTable {
	fn name(&self) -> &str {
		self.inner.name()
	}

	fn schema(&self) -> Schema {
		self.inner.schema()
	}

	fn scan(&self) -> Result<Box<dyn RowIter>> {
		self.inner.scan()
	}

	fn as_indexable(&self) -> Option<&dyn IndexableTable> {
		Some(self)
	}

	fn as_checksumable(&self) -> Option<&dyn ChecksumableTable> {
		self.checksum.as_ref().map(|_| self as &dyn ChecksumableTable)
	}
}

impl IndexableTable for MemoryTable {
	fn index_key_values(&self, columns: &[String]) -> Result<Box<dyn PartitionIndexKeyValueIter>> {
		self.requested.lock().push(columns.to_vec());

		let schema = &self.inner.schema;
		let positions = columns
			.iter()
			.map(|name| {
				schema.iter()
					.position(|c| &c.name == name)
					.ok_or_else(|| error!(column_not_found(name.clone())))
			})
			.collect::<Result<Vec<_>>>()?;

		let mut partitions: Vec<Entries> = vec![Vec::new(); self.partitions];
		for (idx, row) in self.inner.rows.iter().enumerate() {
			let values = positions.iter().map(|&p| row[p].clone()).collect();
			partitions[idx % self.partitions].push((values, (idx as u32).to_be_bytes().to_vec()));
		}

		let partitions =
			partitions.into_iter().enumerate().map(|(idx, entries)| (Partition(vec![idx as u8]), entries)).collect();

		let mut iter = MemoryPartitionIter::new(partitions).sharing_closes(self.closes.clone());
		if let Some(n) = self.fail_after {
			iter = iter.fail_after(n);
		}
		Ok(Box::new(iter))
	}
}

impl ChecksumableTable for MemoryTable {
	fn checksum(&self) -> Result<String> {
		Ok(self.checksum.clone().unwrap_or_default())
	}
}

/// Decorates another table without exposing any capability itself.
pub struct WrapperTable {
	name: String,
	inner: Arc<dyn Table>,
}

impl WrapperTable {
	pub fn new(inner: Arc<dyn Table>) -> Self {
		Self {
			name: inner.name().to_string(),
			inner,
		}
	}
}

impl Table for WrapperTable {
	fn name(&self) -> &str {
		&self.name
	}

	fn schema(&self) -> Schema {
		self.inner.schema()
	}

	fn scan(&self) -> Result<Box<dyn RowIter>> {
		self.inner.scan()
	}

	fn underlying(&self) -> Option<&dyn Table> {
		Some(self.inner.as_ref())
	}
}
