// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod create;
mod explain;
mod query;

use std::sync::Arc;

pub use create::CreateIndexNode;
pub use explain::explain_logical_plan;
pub use query::{
	AliasNode, ApplyKind, ApplyNode, FilterNode, JoinInnerNode, JoinLeftNode, JoinRightNode, MapNode, TableScanNode,
};
use strata_core::{
	ExecutionContext, Expression, Row, Schema,
	interface::{PrivilegeChecker, RowIter},
};
use strata_type::{
	Error, Result,
	error::diagnostic::plan::{invalid_children_number, invalid_expressions_number},
	return_error,
};

pub type PlanRef = Arc<LogicalPlan>;

/// Immutable logical plan tree. Rebuilding a node through `with_children` or
/// `with_expressions` returns a new node and leaves the original untouched.
#[derive(Debug, Clone)]
pub enum LogicalPlan {
	TableScan(TableScanNode),
	Alias(AliasNode),
	Filter(FilterNode),
	Map(MapNode),
	JoinInner(JoinInnerNode),
	JoinLeft(JoinLeftNode),
	JoinRight(JoinRightNode),
	Apply(ApplyNode),
	CreateIndex(CreateIndexNode),
}

impl LogicalPlan {
	pub fn kind(&self) -> &'static str {
		match self {
			LogicalPlan::TableScan(_) => "TableScan",
			LogicalPlan::Alias(_) => "Alias",
			LogicalPlan::Filter(_) => "Filter",
			LogicalPlan::Map(_) => "Map",
			LogicalPlan::JoinInner(_) => "JoinInner",
			LogicalPlan::JoinLeft(_) => "JoinLeft",
			LogicalPlan::JoinRight(_) => "JoinRight",
			LogicalPlan::Apply(_) => "Apply",
			LogicalPlan::CreateIndex(_) => "CreateIndex",
		}
	}

	/// True iff every child and every expression of this node is resolved.
	pub fn resolved(&self) -> bool {
		self.children().iter().all(|child| child.resolved())
			&& self.expressions().iter().all(Expression::resolved)
	}

	/// Row layout this node produces for its parent.
	pub fn schema(&self) -> Schema {
		match self {
			LogicalPlan::TableScan(node) => node.table.schema(),
			LogicalPlan::Alias(node) => node.input.schema().with_source(&node.alias),
			LogicalPlan::Filter(node) => node.input.schema(),
			LogicalPlan::Map(node) => node.schema(),
			LogicalPlan::JoinInner(node) => node.left.schema().concat(&node.right.schema()),
			LogicalPlan::JoinLeft(node) => node.left.schema().concat(&node.right.schema().nullable()),
			LogicalPlan::JoinRight(node) => node.left.schema().nullable().concat(&node.right.schema()),
			LogicalPlan::Apply(node) => node.left.schema(),
			LogicalPlan::CreateIndex(_) => Schema::empty(),
		}
	}

	pub fn children(&self) -> Vec<PlanRef> {
		match self {
			LogicalPlan::TableScan(_) => vec![],
			LogicalPlan::Alias(node) => vec![node.input.clone()],
			LogicalPlan::Filter(node) => vec![node.input.clone()],
			LogicalPlan::Map(node) => vec![node.input.clone()],
			LogicalPlan::JoinInner(node) => vec![node.left.clone(), node.right.clone()],
			LogicalPlan::JoinLeft(node) => vec![node.left.clone(), node.right.clone()],
			LogicalPlan::JoinRight(node) => vec![node.left.clone(), node.right.clone()],
			LogicalPlan::Apply(node) => vec![node.left.clone(), node.right.clone()],
			LogicalPlan::CreateIndex(node) => vec![node.input.clone()],
		}
	}

	pub fn with_children(&self, children: Vec<PlanRef>) -> Result<LogicalPlan> {
		Ok(match self {
			LogicalPlan::TableScan(node) => {
				let [] = arity::<0>(self, children)?;
				LogicalPlan::TableScan(node.clone())
			}
			LogicalPlan::Alias(node) => {
				let [input] = arity::<1>(self, children)?;
				LogicalPlan::Alias(AliasNode {
					alias: node.alias.clone(),
					input,
				})
			}
			LogicalPlan::Filter(node) => {
				let [input] = arity::<1>(self, children)?;
				LogicalPlan::Filter(FilterNode {
					condition: node.condition.clone(),
					input,
				})
			}
			LogicalPlan::Map(node) => {
				let [input] = arity::<1>(self, children)?;
				LogicalPlan::Map(MapNode {
					projections: node.projections.clone(),
					input,
				})
			}
			LogicalPlan::JoinInner(node) => {
				let [left, right] = arity::<2>(self, children)?;
				LogicalPlan::JoinInner(JoinInnerNode {
					left,
					right,
					on: node.on.clone(),
				})
			}
			LogicalPlan::JoinLeft(node) => {
				let [left, right] = arity::<2>(self, children)?;
				LogicalPlan::JoinLeft(JoinLeftNode {
					left,
					right,
					on: node.on.clone(),
				})
			}
			LogicalPlan::JoinRight(node) => {
				let [left, right] = arity::<2>(self, children)?;
				LogicalPlan::JoinRight(JoinRightNode {
					left,
					right,
					on: node.on.clone(),
				})
			}
			LogicalPlan::Apply(node) => {
				let [left, right] = arity::<2>(self, children)?;
				LogicalPlan::Apply(ApplyNode {
					kind: node.kind,
					left,
					right,
				})
			}
			LogicalPlan::CreateIndex(node) => {
				let [input] = arity::<1>(self, children)?;
				LogicalPlan::CreateIndex(CreateIndexNode {
					input,
					..node.clone()
				})
			}
		})
	}

	/// The node's own expressions, in a fixed order.
	pub fn expressions(&self) -> Vec<Expression> {
		match self {
			LogicalPlan::TableScan(_) | LogicalPlan::Alias(_) | LogicalPlan::Apply(_) => vec![],
			LogicalPlan::Filter(node) => vec![node.condition.clone()],
			LogicalPlan::Map(node) => node.projections.clone(),
			LogicalPlan::JoinInner(node) => vec![node.on.clone()],
			LogicalPlan::JoinLeft(node) => vec![node.on.clone()],
			LogicalPlan::JoinRight(node) => vec![node.on.clone()],
			LogicalPlan::CreateIndex(node) => node.expressions.clone(),
		}
	}

	pub fn with_expressions(&self, expressions: Vec<Expression>) -> Result<LogicalPlan> {
		let expected = self.expressions().len();
		if expressions.len() != expected {
			return_error!(invalid_expressions_number(self.kind(), expressions.len(), expected));
		}

		Ok(match self {
			LogicalPlan::TableScan(_) | LogicalPlan::Alias(_) | LogicalPlan::Apply(_) => self.clone(),
			LogicalPlan::Filter(node) => {
				let [condition] = single(self, expressions)?;
				LogicalPlan::Filter(FilterNode {
					condition,
					input: node.input.clone(),
				})
			}
			LogicalPlan::JoinInner(node) => {
				let [on] = single(self, expressions)?;
				LogicalPlan::JoinInner(JoinInnerNode {
					on,
					..node.clone()
				})
			}
			LogicalPlan::JoinLeft(node) => {
				let [on] = single(self, expressions)?;
				LogicalPlan::JoinLeft(JoinLeftNode {
					on,
					..node.clone()
				})
			}
			LogicalPlan::JoinRight(node) => {
				let [on] = single(self, expressions)?;
				LogicalPlan::JoinRight(JoinRightNode {
					on,
					..node.clone()
				})
			}
			LogicalPlan::Map(node) => LogicalPlan::Map(MapNode {
				projections: expressions,
				input: node.input.clone(),
			}),
			LogicalPlan::CreateIndex(node) => LogicalPlan::CreateIndex(CreateIndexNode {
				expressions,
				..node.clone()
			}),
		})
	}

	pub fn check_privileges(&self, ctx: &ExecutionContext, checker: &dyn PrivilegeChecker) -> bool {
		match self {
			LogicalPlan::TableScan(node) => node.check_privileges(ctx, checker),
			LogicalPlan::CreateIndex(node) => node.check_privileges(ctx, checker),
			_ => self.children().iter().all(|child| child.check_privileges(ctx, checker)),
		}
	}

	/// Runs the node. `outer` carries the values of every enclosing scope
	/// level; expressions evaluate against `outer ++ local`.
	pub fn execute(&self, ctx: &ExecutionContext, outer: &Row) -> Result<Box<dyn RowIter>> {
		match self {
			LogicalPlan::TableScan(node) => node.execute(),
			LogicalPlan::Alias(node) => node.input.execute(ctx, outer),
			LogicalPlan::Filter(node) => node.execute(ctx, outer),
			LogicalPlan::Map(node) => node.execute(ctx, outer),
			LogicalPlan::JoinInner(node) => node.execute(ctx, outer),
			LogicalPlan::JoinLeft(node) => node.execute(ctx, outer),
			LogicalPlan::JoinRight(node) => node.execute(ctx, outer),
			LogicalPlan::Apply(node) => node.execute(ctx, outer),
			LogicalPlan::CreateIndex(node) => node.execute(ctx),
		}
	}
}

fn arity<const N: usize>(node: &LogicalPlan, children: Vec<PlanRef>) -> Result<[PlanRef; N]> {
	let got = children.len();
	children.try_into().map_err(|_| Error(invalid_children_number(node.kind(), got, N)))
}

fn single(node: &LogicalPlan, expressions: Vec<Expression>) -> Result<[Expression; 1]> {
	let got = expressions.len();
	expressions.try_into().map_err(|_| Error(invalid_expressions_number(node.kind(), got, 1)))
}
