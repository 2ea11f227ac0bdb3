// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};

use crate::Value;

/// An ordered sequence of values laid out according to a row layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(Vec<Value>);

impl Row {
	pub fn new(values: Vec<Value>) -> Self {
		Self(values)
	}

	pub fn empty() -> Self {
		Self(Vec::new())
	}

	/// Appends `other` behind this row, producing the assembled row `self ++ other`.
	pub fn concat(&self, other: &Row) -> Row {
		let mut values = Vec::with_capacity(self.0.len() + other.0.len());
		values.extend_from_slice(&self.0);
		values.extend_from_slice(&other.0);
		Row(values)
	}

	pub fn into_values(self) -> Vec<Value> {
		self.0
	}
}

impl Deref for Row {
	type Target = [Value];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<Value>> for Row {
	fn from(values: Vec<Value>) -> Self {
		Self(values)
	}
}

impl Display for Row {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("[")?;
		for (idx, value) in self.0.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			Display::fmt(value, f)?;
		}
		f.write_str("]")
	}
}
