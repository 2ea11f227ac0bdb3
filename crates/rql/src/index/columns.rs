// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use strata_core::Expression;
use strata_type::Result;

/// Collapses the column leaves of `expressions` into the minimal list of raw
/// columns, in first-seen order, and rewrites each leaf to its position in
/// that list.
pub fn columns_and_prepare_expressions(expressions: &[Expression]) -> Result<(Vec<String>, Vec<Expression>)> {
	let mut positions: IndexMap<String, usize> = IndexMap::new();

	let prepared = expressions
		.iter()
		.cloned()
		.map(|expression| {
			expression.transform_up(&mut |e| match e {
				Expression::Column(column) => {
					let next = positions.len();
					let ordinal = *positions.entry(column.name.clone()).or_insert(next);
					Ok(Expression::Column(column.with_ordinal(ordinal)))
				}
				other => Ok(other),
			})
		})
		.collect::<Result<Vec<_>>>()?;

	Ok((positions.into_keys().collect(), prepared))
}

#[cfg(test)]
mod tests {
	use strata_core::{Expression, Type};

	use super::*;

	fn col(ordinal: usize, name: &str) -> Expression {
		Expression::column(ordinal, name, "t", Type::Int8, false)
	}

	fn ordinals(expression: &Expression) -> Vec<usize> {
		let mut result = vec![];
		expression.walk(&mut |e| {
			if let Expression::Column(c) = e {
				result.push(c.ordinal);
			}
		});
		result
	}

	#[test]
	fn test_deduplicates_by_name() {
		let expressions = vec![Expression::add(col(4, "a"), col(7, "b")), col(4, "a")];

		let (columns, prepared) = columns_and_prepare_expressions(&expressions).unwrap();

		assert_eq!(columns, vec!["a", "b"]);
		assert_eq!(ordinals(&prepared[0]), vec![0, 1]);
		assert_eq!(ordinals(&prepared[1]), vec![0]);
	}

	#[test]
	fn test_first_seen_order() {
		let expressions = vec![col(0, "c"), Expression::mul(col(1, "a"), col(0, "c"))];

		let (columns, prepared) = columns_and_prepare_expressions(&expressions).unwrap();

		assert_eq!(columns, vec!["c", "a"]);
		assert_eq!(ordinals(&prepared[1]), vec![1, 0]);
	}

	#[test]
	fn test_expressions_without_columns() {
		let (columns, prepared) = columns_and_prepare_expressions(&[Expression::constant(1i64)]).unwrap();
		assert!(columns.is_empty());
		assert_eq!(prepared, vec![Expression::constant(1i64)]);
	}
}
