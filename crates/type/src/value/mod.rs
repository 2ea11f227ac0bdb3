// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod row;
mod r#type;

pub use row::Row;
pub use r#type::{GetType, Type};

/// A value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point
	Float8(f64),
	/// A UTF-8 encoded text
	Utf8(String),
	/// A binary large object (BLOB)
	Blob(Vec<u8>),
	/// A structured JSON document
	Json(serde_json::Value),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		Value::Float8(v.into())
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn blob(v: impl Into<Vec<u8>>) -> Self {
		Value::Blob(v.into())
	}

	pub fn json(v: serde_json::Value) -> Self {
		Value::Json(v)
	}

	pub fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int4(_) => Type::Int4,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
			Value::Blob(_) => Type::Blob,
			Value::Json(_) => Type::Json,
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Widens any integer value to `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int4(v) => Some(*v as i64),
			Value::Int8(v) => Some(*v),
			_ => None,
		}
	}

	/// Widens any numeric value to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int4(v) => Some(*v as f64),
			Value::Int8(v) => Some(*v as f64),
			Value::Float8(v) => Some(*v),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Boolean(v) => Display::fmt(v, f),
			Value::Int4(v) => Display::fmt(v, f),
			Value::Int8(v) => Display::fmt(v, f),
			Value::Float8(v) => Display::fmt(v, f),
			Value::Utf8(v) => write!(f, "\"{}\"", v),
			Value::Blob(v) => {
				f.write_str("0x")?;
				for byte in v {
					write!(f, "{:02x}", byte)?;
				}
				Ok(())
			}
			Value::Json(v) => Display::fmt(v, f),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int4(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_type() {
		assert_eq!(Value::int8(1).get_type(), Type::Int8);
		assert_eq!(Value::blob(vec![1u8]).get_type(), Type::Blob);
		assert_eq!(Value::json(serde_json::json!({"a": 1})).get_type(), Type::Json);
		assert_eq!(Value::Undefined.get_type(), Type::Undefined);
	}

	#[test]
	fn test_widening() {
		assert_eq!(Value::int4(7).as_i64(), Some(7));
		assert_eq!(Value::int8(7).as_f64(), Some(7.0));
		assert_eq!(Value::utf8("7").as_f64(), None);
	}

	#[test]
	fn test_display() {
		assert_eq!(Value::blob(vec![0xde, 0xad]).to_string(), "0xdead");
		assert_eq!(Value::utf8("x").to_string(), "\"x\"");
	}
}
