// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use strata_core::{
	ExecutionContext, Row,
	interface::{RowIter, collect_rows, rows_to_row_iter},
};
use strata_type::Result;

use crate::plan::PlanRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyKind {
	Exists,
	NotExists,
}

impl Display for ApplyKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ApplyKind::Exists => f.write_str("EXISTS"),
			ApplyKind::NotExists => f.write_str("NOT EXISTS"),
		}
	}
}

/// Correlated semi join. `right` is a nested query block evaluated once per
/// left row, with that row appended to the outer scope.
#[derive(Debug, Clone)]
pub struct ApplyNode {
	pub kind: ApplyKind,
	pub left: PlanRef,
	pub right: PlanRef,
}

impl ApplyNode {
	pub(crate) fn execute(&self, ctx: &ExecutionContext, outer: &Row) -> Result<Box<dyn RowIter>> {
		let mut result = Vec::new();

		for row in collect_rows(self.left.execute(ctx, outer)?)? {
			let mut nested = self.right.execute(ctx, &outer.concat(&row))?;
			let exists = nested.next();
			nested.close()?;

			let exists = exists?.is_some();
			if exists == (self.kind == ApplyKind::Exists) {
				result.push(row);
			}
		}

		Ok(rows_to_row_iter(result))
	}
}
