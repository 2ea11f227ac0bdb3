// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_type::Result;

use crate::expression::{AliasExpression, BinaryExpression, Expression, UnaryExpression};

impl Expression {
	/// Rebuilds the tree bottom-up, handing every node to `f` after its
	/// children were rewritten. The first error aborts the rewrite.
	pub fn transform_up<F>(self, f: &mut F) -> Result<Expression>
	where
		F: FnMut(Expression) -> Result<Expression>,
	{
		let rebuilt = match self {
			Expression::Column(_) | Expression::Unresolved(_) | Expression::Constant(_) => self,
			Expression::Alias(AliasExpression {
				alias,
				expression,
			}) => Expression::Alias(AliasExpression {
				alias,
				expression: Box::new(expression.transform_up(f)?),
			}),
			Expression::Add(b) => Expression::Add(b.transform_up(f)?),
			Expression::Sub(b) => Expression::Sub(b.transform_up(f)?),
			Expression::Mul(b) => Expression::Mul(b.transform_up(f)?),
			Expression::Div(b) => Expression::Div(b.transform_up(f)?),
			Expression::Equal(b) => Expression::Equal(b.transform_up(f)?),
			Expression::NotEqual(b) => Expression::NotEqual(b.transform_up(f)?),
			Expression::LessThan(b) => Expression::LessThan(b.transform_up(f)?),
			Expression::LessThanEqual(b) => Expression::LessThanEqual(b.transform_up(f)?),
			Expression::GreaterThan(b) => Expression::GreaterThan(b.transform_up(f)?),
			Expression::GreaterThanEqual(b) => Expression::GreaterThanEqual(b.transform_up(f)?),
			Expression::And(b) => Expression::And(b.transform_up(f)?),
			Expression::Or(b) => Expression::Or(b.transform_up(f)?),
			Expression::Not(u) => Expression::Not(u.transform_up(f)?),
			Expression::Negate(u) => Expression::Negate(u.transform_up(f)?),
			Expression::IsNull(u) => Expression::IsNull(u.transform_up(f)?),
		};
		f(rebuilt)
	}

	/// Visits every node in pre-order.
	pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expression)) {
		f(self);
		for child in self.children() {
			child.walk(f);
		}
	}
}

impl BinaryExpression {
	fn transform_up<F>(self, f: &mut F) -> Result<BinaryExpression>
	where
		F: FnMut(Expression) -> Result<Expression>,
	{
		Ok(BinaryExpression {
			left: Box::new(self.left.transform_up(f)?),
			right: Box::new(self.right.transform_up(f)?),
		})
	}
}

impl UnaryExpression {
	fn transform_up<F>(self, f: &mut F) -> Result<UnaryExpression>
	where
		F: FnMut(Expression) -> Result<Expression>,
	{
		Ok(UnaryExpression {
			expression: Box::new(self.expression.transform_up(f)?),
		})
	}
}
