// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_core::{Expression, Schema};
use strata_type::{Result, error::diagnostic::query::column_not_found, return_error};

use crate::resolve::Scope;

/// Rewrites every column of `expression` to its position in the assembled row
/// `scope ++ schema`.
///
/// A column found in `schema` at `i` lands at `scope.width() + i`. Otherwise
/// the levels are searched inner to outer; a match at `i` in a level after
/// having scanned `offset` columns (that level included) lands at
/// `scope.width() - offset + i`.
pub fn fix_field_indexes(scope: &Scope, schema: &Schema, expression: Expression) -> Result<Expression> {
	let width = scope.width();

	expression.transform_up(&mut |e| {
		let Expression::Column(column) = e else {
			return Ok(e);
		};

		if let Some(i) = schema.position(&column.name, &column.source) {
			return Ok(Expression::Column(column.with_ordinal(width + i)));
		}

		let mut offset = 0;
		for level in scope.levels() {
			offset += level.len();
			if let Some(i) = level.position(&column.name, &column.source) {
				return Ok(Expression::Column(column.with_ordinal(width - offset + i)));
			}
		}

		return_error!(column_not_found(column.qualified_name()))
	})
}

/// Applies [`fix_field_indexes`] to every expression, keeping order and length.
pub fn fix_field_indexes_on_expressions(
	scope: &Scope,
	schema: &Schema,
	expressions: Vec<Expression>,
) -> Result<Vec<Expression>> {
	expressions.into_iter().map(|e| fix_field_indexes(scope, schema, e)).collect()
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use strata_core::{Column, Expression, Schema, Type};
	use strata_testing::table::PlainTable;

	use super::*;
	use crate::plan::{LogicalPlan, PlanRef, TableScanNode};

	fn layout(source: &str, columns: &[&str]) -> Schema {
		Schema::new(columns.iter().map(|c| Column::typed::<i64>(*c, source)).collect())
	}

	fn scan(source: &str, columns: &[&str]) -> PlanRef {
		let table = PlainTable::new(source, layout(source, columns), vec![]);
		Arc::new(LogicalPlan::TableScan(TableScanNode::new("db", Arc::new(table))))
	}

	fn col(name: &str, source: &str) -> Expression {
		Expression::column(0, name, source, Type::Int8, false)
	}

	fn ordinal(expression: &Expression) -> usize {
		match expression {
			Expression::Column(c) => c.ordinal,
			other => panic!("not a column: {other}"),
		}
	}

	mod local {
		use super::*;

		#[test]
		fn test_without_scope() {
			let result = fix_field_indexes(&Scope::new(), &layout("t", &["a", "b"]), col("b", "t")).unwrap();
			assert_eq!(ordinal(&result), 1);
		}

		#[test]
		fn test_shifted_by_scope_width() {
			let scope = Scope::new().push(vec![scan("o", &["x", "y", "z"])]);
			let result = fix_field_indexes(&scope, &layout("t", &["a", "b"]), col("b", "t")).unwrap();
			assert_eq!(ordinal(&result), 4);
		}

		#[test]
		fn test_local_beats_outer() {
			let scope = Scope::new().push(vec![scan("t", &["a"])]);
			let result = fix_field_indexes(&scope, &layout("t", &["b", "a"]), col("a", "t")).unwrap();
			assert_eq!(ordinal(&result), 2);
		}
	}

	mod scoped {
		use super::*;

		#[test]
		fn test_single_level() {
			let scope = Scope::new().push(vec![scan("o", &["x", "y"])]);
			let result = fix_field_indexes(&scope, &layout("t", &["a"]), col("y", "o")).unwrap();
			assert_eq!(ordinal(&result), 1);
		}

		#[test]
		fn test_outer_levels_take_the_lowest_ordinals() {
			// row: o1.p o1.q | o2.x o2.y o2.z | t.a
			let scope = Scope::new().push(vec![scan("o1", &["p", "q"])]).push(vec![scan("o2", &["x", "y", "z"])]);
			let schema = layout("t", &["a"]);

			let inner = fix_field_indexes(&scope, &schema, col("z", "o2")).unwrap();
			let outer = fix_field_indexes(&scope, &schema, col("q", "o1")).unwrap();
			let local = fix_field_indexes(&scope, &schema, col("a", "t")).unwrap();

			assert_eq!(ordinal(&inner), 4);
			assert_eq!(ordinal(&outer), 1);
			assert_eq!(ordinal(&local), 5);
		}

		#[test]
		fn test_inner_level_shadows_outer_level() {
			let scope = Scope::new().push(vec![scan("o", &["x"])]).push(vec![scan("o", &["w", "x"])]);
			let result = fix_field_indexes(&scope, &layout("t", &["a"]), col("x", "o")).unwrap();
			assert_eq!(ordinal(&result), 2);
		}

		#[test]
		fn test_level_made_of_several_nodes() {
			let scope = Scope::new().push(vec![scan("l", &["a"]), scan("r", &["b", "c"])]);
			let result = fix_field_indexes(&scope, &Schema::empty(), col("c", "r")).unwrap();
			assert_eq!(ordinal(&result), 2);
		}
	}

	mod missing {
		use super::*;

		#[test]
		fn test_unknown_column() {
			let scope = Scope::new().push(vec![scan("o", &["x"])]);
			let err = fix_field_indexes(&scope, &layout("t", &["a"]), col("nope", "t")).unwrap_err();
			assert_eq!(err.code(), "QUERY_001");
			assert!(err.message.contains("t.nope"));
		}

		#[test]
		fn test_source_mismatch_is_not_a_match() {
			let err = fix_field_indexes(&Scope::new(), &layout("t", &["a"]), col("a", "u")).unwrap_err();
			assert_eq!(err.code(), "QUERY_001");
		}
	}

	mod expressions {
		use super::*;

		#[test]
		fn test_nested_columns() {
			let schema = layout("t", &["a", "b"]);
			let expr = Expression::add(col("b", "t"), Expression::mul(col("a", "t"), col("b", "t")));

			let result = fix_field_indexes(&Scope::new(), &schema, expr).unwrap();

			let mut ordinals = vec![];
			result.walk(&mut |e| {
				if let Expression::Column(c) = e {
					ordinals.push(c.ordinal);
				}
			});
			assert_eq!(ordinals, vec![1, 0, 1]);
		}

		#[test]
		fn test_keeps_order_and_length() {
			let schema = layout("t", &["a", "b"]);
			let result = fix_field_indexes_on_expressions(
				&Scope::new(),
				&schema,
				vec![col("b", "t"), Expression::constant(1i64), col("a", "t")],
			)
			.unwrap();

			assert_eq!(result.len(), 3);
			assert_eq!(ordinal(&result[0]), 1);
			assert_eq!(result[1], Expression::constant(1i64));
			assert_eq!(ordinal(&result[2]), 0);
		}

		#[test]
		fn test_first_failure_aborts() {
			let schema = layout("t", &["a"]);
			let err = fix_field_indexes_on_expressions(&Scope::new(), &schema, vec![col("a", "t"), col("x", "t")])
				.unwrap_err();
			assert!(err.message.contains("t.x"));
		}
	}
}
