// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod get;

pub use get::GetType;

/// The kind of a value produced by a column or an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	/// A boolean: true or false.
	Boolean,
	/// A 4-byte signed integer
	Int4,
	/// An 8-byte signed integer
	Int8,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text
	Utf8,
	/// A binary large object
	Blob,
	/// A structured JSON document
	Json,
	/// Value is not defined (think null in common programming languages)
	Undefined,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int4 | Type::Int8 | Type::Float8)
	}

	pub fn is_integer(&self) -> bool {
		matches!(self, Type::Int4 | Type::Int8)
	}

	pub fn is_blob(&self) -> bool {
		matches!(self, Type::Blob)
	}

	pub fn is_json(&self) -> bool {
		matches!(self, Type::Json)
	}

	/// Large and opaque kinds cannot be used as index keys.
	pub fn is_indexable(&self) -> bool {
		!self.is_blob() && !self.is_json()
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int4 => f.write_str("INT4"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Blob => f.write_str("BLOB"),
			Type::Json => f.write_str("JSON"),
			Type::Undefined => f.write_str("UNDEFINED"),
		}
	}
}
