// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use strata_core::Expression;

use crate::plan::LogicalPlan;

enum Entry<'a> {
	Leaf(String),
	Node(&'a LogicalPlan),
}

pub fn explain_logical_plan(plan: &LogicalPlan) -> String {
	let mut output = String::new();
	output.push_str(&label(plan));
	output.push('\n');
	render_entries(&entries(plan), "", &mut output);
	output
}

fn render_entries(items: &[Entry<'_>], prefix: &str, output: &mut String) {
	for (idx, entry) in items.iter().enumerate() {
		let is_last = idx + 1 == items.len();
		let branch = if is_last {
			"└── "
		} else {
			"├── "
		};
		let child_prefix = format!(
			"{}{}",
			prefix,
			if is_last {
				"    "
			} else {
				"│   "
			}
		);

		match entry {
			Entry::Leaf(text) => {
				output.push_str(&format!("{}{}{}\n", prefix, branch, text));
			}
			Entry::Node(plan) => {
				output.push_str(&format!("{}{}{}\n", prefix, branch, label(plan)));
				render_entries(&entries(plan), &child_prefix, output);
			}
		}
	}
}

fn label(plan: &LogicalPlan) -> String {
	match plan {
		LogicalPlan::TableScan(node) => format!("Table({})", node.table.name()),
		LogicalPlan::Alias(node) => format!("Alias({})", node.alias),
		LogicalPlan::Filter(node) => format!("Filter({})", node.condition),
		LogicalPlan::Map(node) => format!("Map({})", join(&node.projections)),
		LogicalPlan::JoinInner(node) => format!("InnerJoin({})", node.on),
		LogicalPlan::JoinLeft(node) => format!("LeftJoin({})", node.on),
		LogicalPlan::JoinRight(node) => format!("RightJoin({})", node.on),
		LogicalPlan::Apply(node) => format!("Apply({})", node.kind),
		LogicalPlan::CreateIndex(node) => format!("CreateIndex({})", node.name),
	}
}

fn entries(plan: &LogicalPlan) -> Vec<Entry<'_>> {
	match plan {
		LogicalPlan::CreateIndex(node) => {
			vec![
				Entry::Leaf(format!("USING {}", node.driver)),
				Entry::Leaf(format!("Expressions ({})", join(&node.expressions))),
				Entry::Node(node.input.as_ref()),
			]
		}
		LogicalPlan::TableScan(_) => vec![],
		LogicalPlan::Alias(node) => vec![Entry::Node(node.input.as_ref())],
		LogicalPlan::Filter(node) => vec![Entry::Node(node.input.as_ref())],
		LogicalPlan::Map(node) => vec![Entry::Node(node.input.as_ref())],
		LogicalPlan::JoinInner(node) => vec![Entry::Node(node.left.as_ref()), Entry::Node(node.right.as_ref())],
		LogicalPlan::JoinLeft(node) => vec![Entry::Node(node.left.as_ref()), Entry::Node(node.right.as_ref())],
		LogicalPlan::JoinRight(node) => vec![Entry::Node(node.left.as_ref()), Entry::Node(node.right.as_ref())],
		LogicalPlan::Apply(node) => vec![Entry::Node(node.left.as_ref()), Entry::Node(node.right.as_ref())],
	}
}

fn join(expressions: &[Expression]) -> String {
	expressions.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}

impl Display for LogicalPlan {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(explain_logical_plan(self).trim_end())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use strata_core::{Column, Expression, Schema, Type};
	use strata_testing::table::PlainTable;

	use crate::plan::{CreateIndexNode, LogicalPlan, TableScanNode};

	#[test]
	fn test_create_index() {
		let table = PlainTable::new(
			"t",
			Schema::new(vec![Column::typed::<i64>("a", "t"), Column::typed::<i64>("b", "t")]),
			vec![],
		);
		let scan = Arc::new(LogicalPlan::TableScan(TableScanNode::new("db", Arc::new(table))));
		let a = Expression::column(0, "a", "t", Type::Int8, false);
		let b = Expression::column(1, "b", "t", Type::Int8, false);

		let plan = LogicalPlan::CreateIndex(
			CreateIndexNode::new("idx", scan, vec![Expression::add(a.clone(), b), a]).with_driver("memory"),
		);

		assert_eq!(
			plan.to_string(),
			"CreateIndex(idx)\n├── USING memory\n├── Expressions (t.a + t.b, t.a)\n└── Table(t)"
		);
	}

	#[test]
	fn test_create_index_without_driver() {
		let table = PlainTable::new("t", Schema::new(vec![Column::typed::<i64>("a", "t")]), vec![]);
		let scan = Arc::new(LogicalPlan::TableScan(TableScanNode::new("db", Arc::new(table))));
		let a = Expression::column(0, "a", "t", Type::Int8, false);

		let plan = LogicalPlan::CreateIndex(CreateIndexNode::new("idx", scan, vec![a]));

		assert_eq!(plan.to_string(), "CreateIndex(idx)\n├── USING \n├── Expressions (t.a)\n└── Table(t)");
	}
}
