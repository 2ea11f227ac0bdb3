// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod evaluate;
mod transform;

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use strata_type::{Type, Value};

/// A symbolic expression. Expressions are immutable: rewrites produce new trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
	Column(ColumnExpression),

	Unresolved(UnresolvedColumnExpression),

	Constant(ConstantExpression),

	Alias(AliasExpression),

	Add(BinaryExpression),

	Sub(BinaryExpression),

	Mul(BinaryExpression),

	Div(BinaryExpression),

	Equal(BinaryExpression),

	NotEqual(BinaryExpression),

	LessThan(BinaryExpression),

	LessThanEqual(BinaryExpression),

	GreaterThan(BinaryExpression),

	GreaterThanEqual(BinaryExpression),

	And(BinaryExpression),

	Or(BinaryExpression),

	Not(UnaryExpression),

	Negate(UnaryExpression),

	IsNull(UnaryExpression),
}

/// A column reference bound to a position of the row it is evaluated against.
///
/// The ordinal is a placeholder until the field-index resolver rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnExpression {
	pub ordinal: usize,
	pub name: String,
	pub source: String,
	pub ty: Type,
	pub nullable: bool,
}

impl ColumnExpression {
	pub fn with_ordinal(&self, ordinal: usize) -> Self {
		Self {
			ordinal,
			..self.clone()
		}
	}

	pub fn qualified_name(&self) -> String {
		qualified(&self.source, &self.name)
	}
}

/// A symbolic name that has not been bound to any column yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedColumnExpression {
	pub name: String,
	pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantExpression(pub Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasExpression {
	pub alias: String,
	pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
	pub left: Box<Expression>,
	pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
	pub expression: Box<Expression>,
}

impl Expression {
	pub fn column(
		ordinal: usize,
		name: impl Into<String>,
		source: impl Into<String>,
		ty: Type,
		nullable: bool,
	) -> Self {
		Expression::Column(ColumnExpression {
			ordinal,
			name: name.into(),
			source: source.into(),
			ty,
			nullable,
		})
	}

	pub fn unresolved(name: impl Into<String>, source: Option<&str>) -> Self {
		Expression::Unresolved(UnresolvedColumnExpression {
			name: name.into(),
			source: source.map(str::to_string),
		})
	}

	pub fn constant(value: impl Into<Value>) -> Self {
		Expression::Constant(ConstantExpression(value.into()))
	}

	pub fn alias(expression: Expression, alias: impl Into<String>) -> Self {
		Expression::Alias(AliasExpression {
			alias: alias.into(),
			expression: Box::new(expression),
		})
	}

	pub fn add(left: Expression, right: Expression) -> Self {
		Expression::Add(BinaryExpression::new(left, right))
	}

	pub fn sub(left: Expression, right: Expression) -> Self {
		Expression::Sub(BinaryExpression::new(left, right))
	}

	pub fn mul(left: Expression, right: Expression) -> Self {
		Expression::Mul(BinaryExpression::new(left, right))
	}

	pub fn div(left: Expression, right: Expression) -> Self {
		Expression::Div(BinaryExpression::new(left, right))
	}

	pub fn equal(left: Expression, right: Expression) -> Self {
		Expression::Equal(BinaryExpression::new(left, right))
	}

	pub fn not_equal(left: Expression, right: Expression) -> Self {
		Expression::NotEqual(BinaryExpression::new(left, right))
	}

	pub fn less_than(left: Expression, right: Expression) -> Self {
		Expression::LessThan(BinaryExpression::new(left, right))
	}

	pub fn greater_than(left: Expression, right: Expression) -> Self {
		Expression::GreaterThan(BinaryExpression::new(left, right))
	}

	pub fn and(left: Expression, right: Expression) -> Self {
		Expression::And(BinaryExpression::new(left, right))
	}

	pub fn or(left: Expression, right: Expression) -> Self {
		Expression::Or(BinaryExpression::new(left, right))
	}

	pub fn not(expression: Expression) -> Self {
		Expression::Not(UnaryExpression::new(expression))
	}

	pub fn is_null(expression: Expression) -> Self {
		Expression::IsNull(UnaryExpression::new(expression))
	}

	/// True iff no unresolved column remains anywhere in the tree.
	pub fn resolved(&self) -> bool {
		match self {
			Expression::Unresolved(_) => false,
			Expression::Column(_) | Expression::Constant(_) => true,
			_ => self.children().iter().all(|child| child.resolved()),
		}
	}

	pub fn children(&self) -> Vec<&Expression> {
		match self {
			Expression::Column(_) | Expression::Unresolved(_) | Expression::Constant(_) => vec![],
			Expression::Alias(alias) => vec![alias.expression.as_ref()],
			Expression::Add(b)
			| Expression::Sub(b)
			| Expression::Mul(b)
			| Expression::Div(b)
			| Expression::Equal(b)
			| Expression::NotEqual(b)
			| Expression::LessThan(b)
			| Expression::LessThanEqual(b)
			| Expression::GreaterThan(b)
			| Expression::GreaterThanEqual(b)
			| Expression::And(b)
			| Expression::Or(b) => vec![b.left.as_ref(), b.right.as_ref()],
			Expression::Not(u) | Expression::Negate(u) | Expression::IsNull(u) => vec![u.expression.as_ref()],
		}
	}

	/// The value kind this expression produces.
	pub fn ty(&self) -> Type {
		match self {
			Expression::Column(column) => column.ty,
			Expression::Unresolved(_) => Type::Undefined,
			Expression::Constant(ConstantExpression(value)) => value.get_type(),
			Expression::Alias(alias) => alias.expression.ty(),
			Expression::Div(_) => Type::Float8,
			Expression::Add(b) | Expression::Sub(b) | Expression::Mul(b) => {
				if b.left.ty().is_integer() && b.right.ty().is_integer() {
					Type::Int8
				} else {
					Type::Float8
				}
			}
			Expression::Equal(_)
			| Expression::NotEqual(_)
			| Expression::LessThan(_)
			| Expression::LessThanEqual(_)
			| Expression::GreaterThan(_)
			| Expression::GreaterThanEqual(_)
			| Expression::And(_)
			| Expression::Or(_)
			| Expression::Not(_)
			| Expression::IsNull(_) => Type::Boolean,
			Expression::Negate(u) => u.expression.ty(),
		}
	}

	pub fn nullable(&self) -> bool {
		match self {
			Expression::Column(column) => column.nullable,
			Expression::Unresolved(_) => true,
			Expression::Constant(ConstantExpression(value)) => value.is_undefined(),
			Expression::IsNull(_) => false,
			_ => self.children().iter().any(|child| child.nullable()),
		}
	}

	/// The column name this expression contributes to a row layout.
	pub fn name(&self) -> String {
		match self {
			Expression::Column(column) => column.name.clone(),
			Expression::Unresolved(column) => column.name.clone(),
			Expression::Alias(alias) => alias.alias.clone(),
			_ => self.to_string(),
		}
	}

	/// The source qualifier this expression contributes to a row layout.
	pub fn source(&self) -> String {
		match self {
			Expression::Column(column) => column.source.clone(),
			Expression::Unresolved(column) => column.source.clone().unwrap_or_default(),
			_ => String::new(),
		}
	}
}

impl BinaryExpression {
	pub fn new(left: Expression, right: Expression) -> Self {
		Self {
			left: Box::new(left),
			right: Box::new(right),
		}
	}
}

impl UnaryExpression {
	pub fn new(expression: Expression) -> Self {
		Self {
			expression: Box::new(expression),
		}
	}
}

fn qualified(source: &str, name: &str) -> String {
	if source.is_empty() {
		name.to_string()
	} else {
		format!("{}.{}", source, name)
	}
}

impl Display for Expression {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Expression::Column(column) => f.write_str(&column.qualified_name()),
			Expression::Unresolved(column) => {
				f.write_str(&qualified(column.source.as_deref().unwrap_or_default(), &column.name))
			}
			Expression::Constant(ConstantExpression(value)) => Display::fmt(value, f),
			Expression::Alias(alias) => write!(f, "{} as {}", alias.expression, alias.alias),
			Expression::Add(b) => write!(f, "{} + {}", b.left, b.right),
			Expression::Sub(b) => write!(f, "{} - {}", b.left, b.right),
			Expression::Mul(b) => write!(f, "({} * {})", b.left, b.right),
			Expression::Div(b) => write!(f, "({} / {})", b.left, b.right),
			Expression::Equal(b) => write!(f, "{} = {}", b.left, b.right),
			Expression::NotEqual(b) => write!(f, "{} != {}", b.left, b.right),
			Expression::LessThan(b) => write!(f, "{} < {}", b.left, b.right),
			Expression::LessThanEqual(b) => write!(f, "{} <= {}", b.left, b.right),
			Expression::GreaterThan(b) => write!(f, "{} > {}", b.left, b.right),
			Expression::GreaterThanEqual(b) => write!(f, "{} >= {}", b.left, b.right),
			Expression::And(b) => write!(f, "({} AND {})", b.left, b.right),
			Expression::Or(b) => write!(f, "({} OR {})", b.left, b.right),
			Expression::Not(u) => write!(f, "NOT({})", u.expression),
			Expression::Negate(u) => write!(f, "-{}", u.expression),
			Expression::IsNull(u) => write!(f, "{} IS NULL", u.expression),
		}
	}
}
