// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use strata_type::{Result, Row, Value};

/// Opaque storage coordinate of a row inside a partition.
pub type Location = Vec<u8>;

/// Opaque partition key of an indexable table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition(pub Vec<u8>);

impl Display for Partition {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for byte in &self.0 {
			write!(f, "{:02x}", byte)?;
		}
		Ok(())
	}
}

/// Streams `(values, location)` pairs of one partition.
pub trait IndexKeyValueIter: Send {
	fn next(&mut self) -> Result<Option<(Vec<Value>, Location)>>;

	fn close(&mut self) -> Result<()>;
}

/// Streams the partitions of a table, each with its own key/value iterator.
pub trait PartitionIndexKeyValueIter: Send {
	fn next(&mut self) -> Result<Option<(Partition, Box<dyn IndexKeyValueIter>)>>;

	fn close(&mut self) -> Result<()>;
}

pub trait RowIter: Send {
	fn next(&mut self) -> Result<Option<Row>>;

	fn close(&mut self) -> Result<()> {
		Ok(())
	}
}

/// A row iterator over rows that are already materialized.
pub struct RowsIter {
	rows: std::vec::IntoIter<Row>,
}

impl RowsIter {
	pub fn new(rows: Vec<Row>) -> Self {
		Self {
			rows: rows.into_iter(),
		}
	}

	pub fn empty() -> Self {
		Self::new(Vec::new())
	}
}

impl RowIter for RowsIter {
	fn next(&mut self) -> Result<Option<Row>> {
		Ok(self.rows.next())
	}
}

pub fn rows_to_row_iter(rows: Vec<Row>) -> Box<dyn RowIter> {
	Box::new(RowsIter::new(rows))
}

/// Drains an iterator and closes it, also when draining fails.
pub fn collect_rows(mut iter: Box<dyn RowIter>) -> Result<Vec<Row>> {
	let mut rows = Vec::new();
	let drained = loop {
		match iter.next() {
			Ok(Some(row)) => rows.push(row),
			Ok(None) => break Ok(()),
			Err(err) => break Err(err),
		}
	};
	let closed = iter.close();
	drained?;
	closed?;
	Ok(rows)
}
