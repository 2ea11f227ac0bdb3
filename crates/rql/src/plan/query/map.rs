// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_core::{Column, ExecutionContext, Expression, Row, Schema, interface::RowIter};
use strata_type::Result;

use crate::plan::PlanRef;

/// Projection: one output column per expression.
#[derive(Debug, Clone)]
pub struct MapNode {
	pub projections: Vec<Expression>,
	pub input: PlanRef,
}

impl MapNode {
	pub(crate) fn schema(&self) -> Schema {
		self.projections.iter().map(|e| Column::new(e.name(), e.source(), e.ty(), e.nullable())).collect()
	}

	pub(crate) fn execute(&self, ctx: &ExecutionContext, outer: &Row) -> Result<Box<dyn RowIter>> {
		Ok(Box::new(MapIter {
			input: self.input.execute(ctx, outer)?,
			projections: self.projections.clone(),
			outer: outer.clone(),
		}))
	}
}

struct MapIter {
	input: Box<dyn RowIter>,
	projections: Vec<Expression>,
	outer: Row,
}

impl RowIter for MapIter {
	fn next(&mut self) -> Result<Option<Row>> {
		let Some(row) = self.input.next()? else {
			return Ok(None);
		};

		let assembled = self.outer.concat(&row);
		let values = self.projections.iter().map(|e| e.evaluate(&assembled)).collect::<Result<Vec<_>>>()?;
		Ok(Some(Row::new(values)))
	}

	fn close(&mut self) -> Result<()> {
		self.input.close()
	}
}
