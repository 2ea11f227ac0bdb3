// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::Type;

pub trait GetType {
	fn get_type() -> Type;
}

impl GetType for bool {
	fn get_type() -> Type {
		Type::Boolean
	}
}

impl GetType for i32 {
	fn get_type() -> Type {
		Type::Int4
	}
}

impl GetType for i64 {
	fn get_type() -> Type {
		Type::Int8
	}
}

impl GetType for f64 {
	fn get_type() -> Type {
		Type::Float8
	}
}

impl GetType for String {
	fn get_type() -> Type {
		Type::Utf8
	}
}

impl GetType for Vec<u8> {
	fn get_type() -> Type {
		Type::Blob
	}
}

impl GetType for serde_json::Value {
	fn get_type() -> Type {
		Type::Json
	}
}
