// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};
use strata_type::{GetType, Type};

/// A named, typed slot of a row layout. `(name, source)` is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	pub source: String,
	pub ty: Type,
	pub nullable: bool,
}

impl Column {
	pub fn new(name: impl Into<String>, source: impl Into<String>, ty: Type, nullable: bool) -> Self {
		Self {
			name: name.into(),
			source: source.into(),
			ty,
			nullable,
		}
	}

	pub fn typed<T: GetType>(name: impl Into<String>, source: impl Into<String>) -> Self {
		Self::new(name, source, T::get_type(), false)
	}

	pub fn matches(&self, name: &str, source: &str) -> bool {
		self.name == name && self.source == source
	}
}

impl Display for Column {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if self.source.is_empty() {
			write!(f, "{} {}", self.name, self.ty)
		} else {
			write!(f, "{}.{} {}", self.source, self.name, self.ty)
		}
	}
}

/// Ordered row layout. Positions are stable once a layout is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema(Vec<Column>);

impl Schema {
	pub fn new(columns: Vec<Column>) -> Self {
		Self(columns)
	}

	pub fn empty() -> Self {
		Self(Vec::new())
	}

	pub fn concat(&self, other: &Schema) -> Schema {
		let mut columns = Vec::with_capacity(self.0.len() + other.0.len());
		columns.extend_from_slice(&self.0);
		columns.extend_from_slice(&other.0);
		Schema(columns)
	}

	/// Exact `(name, source)` lookup; the first matching position wins.
	pub fn position(&self, name: &str, source: &str) -> Option<usize> {
		self.0.iter().position(|c| c.matches(name, source))
	}

	/// Re-qualifies every column with `source`, as a table or subquery alias does.
	pub fn with_source(&self, source: &str) -> Schema {
		Schema(
			self.0.iter()
				.map(|c| Column {
					source: source.to_string(),
					..c.clone()
				})
				.collect(),
		)
	}

	/// Marks every column nullable, used for the outer side of a join.
	pub fn nullable(&self) -> Schema {
		Schema(
			self.0.iter()
				.map(|c| Column {
					nullable: true,
					..c.clone()
				})
				.collect(),
		)
	}
}

impl Deref for Schema {
	type Target = [Column];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<Column>> for Schema {
	fn from(columns: Vec<Column>) -> Self {
		Self(columns)
	}
}

impl FromIterator<Column> for Schema {
	fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(vec![
			Column::typed::<i64>("a", "t"),
			Column::typed::<i64>("b", "t"),
			Column::typed::<i64>("a", "u"),
		])
	}

	mod position {
		use super::*;

		#[test]
		fn test_matches_name_and_source() {
			let schema = schema();
			assert_eq!(schema.position("a", "t"), Some(0));
			assert_eq!(schema.position("a", "u"), Some(2));
		}

		#[test]
		fn test_source_is_part_of_identity() {
			assert_eq!(schema().position("b", "u"), None);
		}
	}

	mod with_source {
		use super::*;

		#[test]
		fn test_requalifies_every_column() {
			let aliased = schema().with_source("x");
			assert!(aliased.iter().all(|c| c.source == "x"));
			assert_eq!(aliased.position("a", "x"), Some(0));
		}
	}

	#[test]
	fn test_concat() {
		let joined = schema().concat(&schema().nullable());
		assert_eq!(joined.len(), 6);
		assert!(!joined[0].nullable);
		assert!(joined[3].nullable);
	}
}
