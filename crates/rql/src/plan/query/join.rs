// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_core::{
	ExecutionContext, Expression, Row, Value,
	interface::{RowIter, collect_rows, rows_to_row_iter},
};
use strata_type::Result;

use crate::plan::PlanRef;

#[derive(Debug, Clone)]
pub struct JoinInnerNode {
	pub left: PlanRef,
	pub right: PlanRef,
	pub on: Expression,
}

#[derive(Debug, Clone)]
pub struct JoinLeftNode {
	pub left: PlanRef,
	pub right: PlanRef,
	pub on: Expression,
}

#[derive(Debug, Clone)]
pub struct JoinRightNode {
	pub left: PlanRef,
	pub right: PlanRef,
	pub on: Expression,
}

#[derive(Clone, Copy, PartialEq)]
enum Keep {
	Matched,
	Left,
	Right,
}

impl JoinInnerNode {
	pub(crate) fn execute(&self, ctx: &ExecutionContext, outer: &Row) -> Result<Box<dyn RowIter>> {
		nested_loop(ctx, outer, &self.left, &self.right, &self.on, Keep::Matched)
	}
}

impl JoinLeftNode {
	pub(crate) fn execute(&self, ctx: &ExecutionContext, outer: &Row) -> Result<Box<dyn RowIter>> {
		nested_loop(ctx, outer, &self.left, &self.right, &self.on, Keep::Left)
	}
}

impl JoinRightNode {
	pub(crate) fn execute(&self, ctx: &ExecutionContext, outer: &Row) -> Result<Box<dyn RowIter>> {
		nested_loop(ctx, outer, &self.left, &self.right, &self.on, Keep::Right)
	}
}

fn nested_loop(
	ctx: &ExecutionContext,
	outer: &Row,
	left: &PlanRef,
	right: &PlanRef,
	on: &Expression,
	keep: Keep,
) -> Result<Box<dyn RowIter>> {
	let left_rows = collect_rows(left.execute(ctx, outer)?)?;
	let right_rows = collect_rows(right.execute(ctx, outer)?)?;
	let left_width = left.schema().len();
	let right_width = right.schema().len();

	let mut result = Vec::new();
	let mut right_matched = vec![false; right_rows.len()];

	for l in &left_rows {
		let mut matched = false;
		for (idx, r) in right_rows.iter().enumerate() {
			let joined = l.concat(r);
			if on.evaluate(&outer.concat(&joined))? == Value::Boolean(true) {
				matched = true;
				right_matched[idx] = true;
				result.push(joined);
			}
		}
		if !matched && keep == Keep::Left {
			result.push(l.concat(&undefined(right_width)));
		}
	}

	if keep == Keep::Right {
		for (r, matched) in right_rows.iter().zip(right_matched) {
			if !matched {
				result.push(undefined(left_width).concat(r));
			}
		}
	}

	Ok(rows_to_row_iter(result))
}

fn undefined(width: usize) -> Row {
	Row::new(vec![Value::Undefined; width])
}
