// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use strata_type::{
	Result, Row, Value,
	error::diagnostic::evaluate::{division_by_zero, field_out_of_range, operator_not_applicable},
	internal_error, return_error,
};

use crate::expression::{BinaryExpression, ConstantExpression, Expression};

impl Expression {
	/// Evaluates the expression against a concrete row. Column ordinals index
	/// directly into `row`.
	pub fn evaluate(&self, row: &Row) -> Result<Value> {
		match self {
			Expression::Column(column) => match row.get(column.ordinal) {
				Some(value) => Ok(value.clone()),
				None => return_error!(field_out_of_range(
					&column.qualified_name(),
					column.ordinal,
					row.len()
				)),
			},
			Expression::Unresolved(column) => {
				return_error!(internal_error!("unresolved column {} reached evaluation", column.name))
			}
			Expression::Constant(ConstantExpression(value)) => Ok(value.clone()),
			Expression::Alias(alias) => alias.expression.evaluate(row),
			Expression::Add(b) => arithmetic("+", b, row, i64::checked_add, |l, r| l + r),
			Expression::Sub(b) => arithmetic("-", b, row, i64::checked_sub, |l, r| l - r),
			Expression::Mul(b) => arithmetic("*", b, row, i64::checked_mul, |l, r| l * r),
			Expression::Div(b) => divide(b, row),
			Expression::Equal(b) => compare("=", b, row, |o| o == Ordering::Equal),
			Expression::NotEqual(b) => compare("!=", b, row, |o| o != Ordering::Equal),
			Expression::LessThan(b) => compare("<", b, row, |o| o == Ordering::Less),
			Expression::LessThanEqual(b) => compare("<=", b, row, |o| o != Ordering::Greater),
			Expression::GreaterThan(b) => compare(">", b, row, |o| o == Ordering::Greater),
			Expression::GreaterThanEqual(b) => compare(">=", b, row, |o| o != Ordering::Less),
			Expression::And(b) => {
				let left = boolean("AND", b.left.evaluate(row)?)?;
				if left == Some(false) {
					return Ok(Value::Boolean(false));
				}
				let right = boolean("AND", b.right.evaluate(row)?)?;
				Ok(match (left, right) {
					(_, Some(false)) => Value::Boolean(false),
					(Some(true), Some(true)) => Value::Boolean(true),
					_ => Value::Undefined,
				})
			}
			Expression::Or(b) => {
				let left = boolean("OR", b.left.evaluate(row)?)?;
				if left == Some(true) {
					return Ok(Value::Boolean(true));
				}
				let right = boolean("OR", b.right.evaluate(row)?)?;
				Ok(match (left, right) {
					(_, Some(true)) => Value::Boolean(true),
					(Some(false), Some(false)) => Value::Boolean(false),
					_ => Value::Undefined,
				})
			}
			Expression::Not(u) => Ok(match boolean("NOT", u.expression.evaluate(row)?)? {
				Some(v) => Value::Boolean(!v),
				None => Value::Undefined,
			}),
			Expression::Negate(u) => match u.expression.evaluate(row)? {
				Value::Undefined => Ok(Value::Undefined),
				Value::Int4(v) => match v.checked_neg() {
					Some(v) => Ok(Value::Int4(v)),
					None => return_error!(operator_not_applicable(
						"-",
						strata_type::Type::Int4,
						strata_type::Type::Int4
					)),
				},
				Value::Int8(v) => match v.checked_neg() {
					Some(v) => Ok(Value::Int8(v)),
					None => return_error!(operator_not_applicable(
						"-",
						strata_type::Type::Int8,
						strata_type::Type::Int8
					)),
				},
				Value::Float8(v) => Ok(Value::Float8(-v)),
				other => return_error!(operator_not_applicable("-", other.get_type(), other.get_type())),
			},
			Expression::IsNull(u) => Ok(Value::Boolean(u.expression.evaluate(row)?.is_undefined())),
		}
	}
}

fn arithmetic(
	operator: &str,
	b: &BinaryExpression,
	row: &Row,
	integer: impl Fn(i64, i64) -> Option<i64>,
	float: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
	let left = b.left.evaluate(row)?;
	let right = b.right.evaluate(row)?;

	if left.is_undefined() || right.is_undefined() {
		return Ok(Value::Undefined);
	}

	if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
		return match integer(l, r) {
			Some(v) => Ok(Value::Int8(v)),
			None => return_error!(operator_not_applicable(operator, left.get_type(), right.get_type())),
		};
	}

	match (left.as_f64(), right.as_f64()) {
		(Some(l), Some(r)) => Ok(Value::Float8(float(l, r))),
		_ => return_error!(operator_not_applicable(operator, left.get_type(), right.get_type())),
	}
}

fn divide(b: &BinaryExpression, row: &Row) -> Result<Value> {
	let left = b.left.evaluate(row)?;
	let right = b.right.evaluate(row)?;

	if left.is_undefined() || right.is_undefined() {
		return Ok(Value::Undefined);
	}

	match (left.as_f64(), right.as_f64()) {
		(Some(_), Some(r)) if r == 0.0 => return_error!(division_by_zero()),
		(Some(l), Some(r)) => Ok(Value::Float8(l / r)),
		_ => return_error!(operator_not_applicable("/", left.get_type(), right.get_type())),
	}
}

fn compare(operator: &str, b: &BinaryExpression, row: &Row, accept: impl Fn(Ordering) -> bool) -> Result<Value> {
	let left = b.left.evaluate(row)?;
	let right = b.right.evaluate(row)?;

	if left.is_undefined() || right.is_undefined() {
		return Ok(Value::Undefined);
	}

	let ordering = match (&left, &right) {
		(Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
		(Value::Utf8(l), Value::Utf8(r)) => Some(l.cmp(r)),
		(Value::Blob(l), Value::Blob(r)) => Some(l.cmp(r)),
		(Value::Json(l), Value::Json(r)) if operator == "=" || operator == "!=" => Some(if l == r {
			Ordering::Equal
		} else {
			Ordering::Less
		}),
		_ => match (left.as_i64(), right.as_i64()) {
			(Some(l), Some(r)) => Some(l.cmp(&r)),
			_ => match (left.as_f64(), right.as_f64()) {
				(Some(l), Some(r)) => l.partial_cmp(&r),
				_ => return_error!(operator_not_applicable(operator, left.get_type(), right.get_type())),
			},
		},
	};

	Ok(match ordering {
		Some(ordering) => Value::Boolean(accept(ordering)),
		// NaN compares as unknown
		None => Value::Undefined,
	})
}

fn boolean(operator: &str, value: Value) -> Result<Option<bool>> {
	match value {
		Value::Boolean(v) => Ok(Some(v)),
		Value::Undefined => Ok(None),
		other => return_error!(operator_not_applicable(operator, other.get_type(), other.get_type())),
	}
}
