// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use strata_core::{
	Expression, Row, Value,
	interface::{IndexKeyValueIter, Location, Partition, PartitionIndexKeyValueIter},
};
use strata_type::Result;

/// Evaluates the prepared index expressions over the raw column values of
/// every partition.
pub struct EvalPartitionKeyValueIter {
	inner: Box<dyn PartitionIndexKeyValueIter>,
	expressions: Arc<Vec<Expression>>,
	closed: bool,
}

impl EvalPartitionKeyValueIter {
	pub fn new(inner: Box<dyn PartitionIndexKeyValueIter>, expressions: Vec<Expression>) -> Self {
		Self {
			inner,
			expressions: Arc::new(expressions),
			closed: false,
		}
	}
}

impl PartitionIndexKeyValueIter for EvalPartitionKeyValueIter {
	fn next(&mut self) -> Result<Option<(Partition, Box<dyn IndexKeyValueIter>)>> {
		let Some((partition, iter)) = self.inner.next()? else {
			return Ok(None);
		};
		Ok(Some((partition, Box::new(EvalKeyValueIter::new(iter, self.expressions.clone())))))
	}

	fn close(&mut self) -> Result<()> {
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		self.inner.close()
	}
}

pub struct EvalKeyValueIter {
	inner: Box<dyn IndexKeyValueIter>,
	expressions: Arc<Vec<Expression>>,
	closed: bool,
}

impl EvalKeyValueIter {
	pub fn new(inner: Box<dyn IndexKeyValueIter>, expressions: Arc<Vec<Expression>>) -> Self {
		Self {
			inner,
			expressions,
			closed: false,
		}
	}
}

impl IndexKeyValueIter for EvalKeyValueIter {
	fn next(&mut self) -> Result<Option<(Vec<Value>, Location)>> {
		let Some((values, location)) = self.inner.next()? else {
			return Ok(None);
		};

		let row = Row::new(values);
		let values = self.expressions.iter().map(|e| e.evaluate(&row)).collect::<Result<Vec<_>>>()?;
		Ok(Some((values, location)))
	}

	fn close(&mut self) -> Result<()> {
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		self.inner.close()
	}
}
