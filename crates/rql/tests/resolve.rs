// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use strata_catalog::MemoryIndexRegistry;
use strata_core::{
	Column, ExecutionContext, Expression, Row, Schema, Type, Value,
	interface::{Table, collect_rows},
};
use strata_rql::{
	LogicalPlan, PlanRef, Scope,
	plan::{AliasNode, ApplyKind, ApplyNode, FilterNode, JoinInnerNode, JoinLeftNode, MapNode, TableScanNode},
	resolve_plan,
};
use strata_testing::{init_tracing, table::PlainTable};

fn x() -> PlanRef {
	scan(PlainTable::new(
		"x",
		Schema::new(vec![Column::typed::<i64>("id", "x"), Column::typed::<String>("v", "x")]),
		vec![
			Row::new(vec![Value::int8(1), Value::utf8("a")]),
			Row::new(vec![Value::int8(2), Value::utf8("b")]),
			Row::new(vec![Value::int8(3), Value::utf8("c")]),
		],
	))
}

fn y() -> PlanRef {
	scan(PlainTable::new(
		"y",
		Schema::new(vec![Column::typed::<i64>("id", "y"), Column::typed::<i64>("w", "y")]),
		vec![Row::new(vec![Value::int8(1), Value::int8(10)]), Row::new(vec![Value::int8(3), Value::int8(30)])],
	))
}

fn z() -> PlanRef {
	scan(PlainTable::new(
		"z",
		Schema::new(vec![Column::typed::<i64>("id", "z")]),
		vec![Row::new(vec![Value::int8(3)])],
	))
}

fn scan(table: PlainTable) -> PlanRef {
	let table: Arc<dyn Table> = Arc::new(table);
	Arc::new(LogicalPlan::TableScan(TableScanNode::new("db", table)))
}

/// A column whose ordinal is a placeholder until resolution.
fn col(name: &str, source: &str) -> Expression {
	Expression::column(usize::MAX, name, source, Type::Int8, false)
}

fn filter(condition: Expression, input: PlanRef) -> PlanRef {
	Arc::new(LogicalPlan::Filter(FilterNode {
		condition,
		input,
	}))
}

fn apply(kind: ApplyKind, left: PlanRef, right: PlanRef) -> PlanRef {
	Arc::new(LogicalPlan::Apply(ApplyNode {
		kind,
		left,
		right,
	}))
}

fn ordinals(expression: &Expression) -> Vec<(String, usize)> {
	let mut result = Vec::new();
	expression.walk(&mut |e| {
		if let Expression::Column(column) = e {
			result.push((column.qualified_name(), column.ordinal));
		}
	});
	result
}

fn run(plan: &PlanRef) -> Vec<Row> {
	let ctx = ExecutionContext::new("db", Arc::new(MemoryIndexRegistry::new()));
	collect_rows(plan.execute(&ctx, &Row::empty()).unwrap()).unwrap()
}

fn ids(rows: &[Row]) -> Vec<Value> {
	rows.iter().map(|row| row[0].clone()).collect()
}

mod correlated {
	use super::*;

	fn exists(kind: ApplyKind) -> PlanRef {
		let right = filter(Expression::equal(col("id", "y"), col("id", "x")), y());
		apply(kind, x(), right)
	}

	#[test]
	fn test_outer_column_resolves_below_the_nested_block() {
		init_tracing();
		let resolved = resolve_plan(&exists(ApplyKind::Exists), &Scope::new()).unwrap();

		let LogicalPlan::Apply(node) = resolved.as_ref() else {
			panic!("expected apply");
		};
		let LogicalPlan::Filter(filter) = node.right.as_ref() else {
			panic!("expected filter");
		};
		assert_eq!(ordinals(&filter.condition), vec![("y.id".to_string(), 2), ("x.id".to_string(), 0)]);
		assert!(resolved.resolved());
	}

	#[test]
	fn test_exists() {
		let resolved = resolve_plan(&exists(ApplyKind::Exists), &Scope::new()).unwrap();
		assert_eq!(ids(&run(&resolved)), vec![Value::int8(1), Value::int8(3)]);
	}

	#[test]
	fn test_not_exists() {
		let resolved = resolve_plan(&exists(ApplyKind::NotExists), &Scope::new()).unwrap();
		assert_eq!(ids(&run(&resolved)), vec![Value::int8(2)]);
	}

	#[test]
	fn test_two_levels_up() {
		// x WHERE EXISTS (y WHERE y.id = x.id AND EXISTS (z WHERE z.id = x.id))
		let inner = filter(Expression::equal(col("id", "z"), col("id", "x")), z());
		let middle = apply(ApplyKind::Exists, filter(Expression::equal(col("id", "y"), col("id", "x")), y()), inner);
		let plan = apply(ApplyKind::Exists, x(), middle);

		let resolved = resolve_plan(&plan, &Scope::new()).unwrap();

		let LogicalPlan::Apply(outer) = resolved.as_ref() else {
			panic!("expected apply");
		};
		let LogicalPlan::Apply(middle) = outer.right.as_ref() else {
			panic!("expected apply");
		};
		let LogicalPlan::Filter(inner) = middle.right.as_ref() else {
			panic!("expected filter");
		};
		assert_eq!(ordinals(&inner.condition), vec![("z.id".to_string(), 4), ("x.id".to_string(), 0)]);

		assert_eq!(ids(&run(&resolved)), vec![Value::int8(3)]);
	}

	#[test]
	fn test_filter_above_apply_sees_only_left() {
		let plan = filter(Expression::equal(col("v", "x"), Expression::constant("c")), exists(ApplyKind::Exists));

		let resolved = resolve_plan(&plan, &Scope::new()).unwrap();

		let LogicalPlan::Filter(node) = resolved.as_ref() else {
			panic!("expected filter");
		};
		assert_eq!(ordinals(&node.condition), vec![("x.v".to_string(), 1)]);
		assert_eq!(ids(&run(&resolved)), vec![Value::int8(3)]);
	}

	#[test]
	fn test_unknown_column() {
		let right = filter(Expression::equal(col("id", "y"), col("id", "q")), y());
		let err = resolve_plan(&apply(ApplyKind::Exists, x(), right), &Scope::new()).unwrap_err();

		assert_eq!(err.code(), "QUERY_001");
		assert!(err.message.contains("q.id"));
	}
}

mod join {
	use super::*;

	#[test]
	fn test_condition_spans_both_sides() {
		let plan = Arc::new(LogicalPlan::JoinInner(JoinInnerNode {
			left: x(),
			right: y(),
			on: Expression::equal(col("id", "x"), col("id", "y")),
		}));

		let resolved = resolve_plan(&plan, &Scope::new()).unwrap();

		let LogicalPlan::JoinInner(node) = resolved.as_ref() else {
			panic!("expected join");
		};
		assert_eq!(ordinals(&node.on), vec![("x.id".to_string(), 0), ("y.id".to_string(), 2)]);

		let rows = run(&resolved);
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[1].len(), 4);
		assert_eq!(rows[1][3], Value::int8(30));
	}

	#[test]
	fn test_left_join_pads_missing_rows() {
		let plan = Arc::new(LogicalPlan::JoinLeft(JoinLeftNode {
			left: x(),
			right: y(),
			on: Expression::equal(col("id", "x"), col("id", "y")),
		}));

		let rows = run(&resolve_plan(&plan, &Scope::new()).unwrap());

		assert_eq!(rows.len(), 3);
		assert_eq!(rows[1][0], Value::int8(2));
		assert_eq!(rows[1][2], Value::Undefined);
		assert_eq!(rows[1][3], Value::Undefined);
	}

	#[test]
	fn test_condition_inside_nested_block() {
		// x WHERE EXISTS (y JOIN z ON z.id = y.id AND y.id = x.id)
		let join = Arc::new(LogicalPlan::JoinInner(JoinInnerNode {
			left: y(),
			right: z(),
			on: Expression::and(
				Expression::equal(col("id", "z"), col("id", "y")),
				Expression::equal(col("id", "y"), col("id", "x")),
			),
		}));
		let plan = apply(ApplyKind::Exists, x(), join);

		let resolved = resolve_plan(&plan, &Scope::new()).unwrap();

		let LogicalPlan::Apply(node) = resolved.as_ref() else {
			panic!("expected apply");
		};
		let LogicalPlan::JoinInner(join) = node.right.as_ref() else {
			panic!("expected join");
		};
		assert_eq!(
			ordinals(&join.on),
			vec![
				("z.id".to_string(), 4),
				("y.id".to_string(), 2),
				("y.id".to_string(), 2),
				("x.id".to_string(), 0),
			]
		);
		assert_eq!(ids(&run(&resolved)), vec![Value::int8(3)]);
	}
}

mod alias {
	use super::*;

	#[test]
	fn test_alias_requalifies_columns() {
		let aliased = Arc::new(LogicalPlan::Alias(AliasNode {
			alias: "u".to_string(),
			input: x(),
		}));
		let plan = Arc::new(LogicalPlan::Map(MapNode {
			projections: vec![Expression::add(col("id", "u"), Expression::constant(100i64))],
			input: filter(Expression::greater_than(col("id", "u"), Expression::constant(1i64)), aliased),
		}));

		let resolved = resolve_plan(&plan, &Scope::new()).unwrap();
		let rows = run(&resolved);

		assert_eq!(ids(&rows), vec![Value::int8(102), Value::int8(103)]);
	}

	#[test]
	fn test_original_name_is_hidden() {
		let aliased = Arc::new(LogicalPlan::Alias(AliasNode {
			alias: "u".to_string(),
			input: x(),
		}));
		let plan = filter(Expression::equal(col("id", "x"), Expression::constant(1i64)), aliased);

		let err = resolve_plan(&plan, &Scope::new()).unwrap_err();
		assert_eq!(err.code(), "QUERY_001");
	}
}

#[test]
fn test_resolution_keeps_the_original_plan() {
	let plan = filter(Expression::equal(col("id", "x"), Expression::constant(1i64)), x());

	let resolved = resolve_plan(&plan, &Scope::new()).unwrap();

	let LogicalPlan::Filter(original) = plan.as_ref() else {
		panic!("expected filter");
	};
	assert_eq!(ordinals(&original.condition), vec![("x.id".to_string(), usize::MAX)]);
	assert_eq!(run(&resolved).len(), 1);
}
