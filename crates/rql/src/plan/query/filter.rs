// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_core::{ExecutionContext, Expression, Row, Value, interface::RowIter};
use strata_type::Result;

use crate::plan::PlanRef;

#[derive(Debug, Clone)]
pub struct FilterNode {
	pub condition: Expression,
	pub input: PlanRef,
}

impl FilterNode {
	pub(crate) fn execute(&self, ctx: &ExecutionContext, outer: &Row) -> Result<Box<dyn RowIter>> {
		Ok(Box::new(FilterIter {
			input: self.input.execute(ctx, outer)?,
			condition: self.condition.clone(),
			outer: outer.clone(),
		}))
	}
}

struct FilterIter {
	input: Box<dyn RowIter>,
	condition: Expression,
	outer: Row,
}

impl RowIter for FilterIter {
	fn next(&mut self) -> Result<Option<Row>> {
		while let Some(row) = self.input.next()? {
			// undefined filters the row out like false
			if self.condition.evaluate(&self.outer.concat(&row))? == Value::Boolean(true) {
				return Ok(Some(row));
			}
		}
		Ok(None)
	}

	fn close(&mut self) -> Result<()> {
		self.input.close()
	}
}
