// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn column_not_found(name: impl Into<String>) -> Diagnostic {
	let name = name.into();
	Diagnostic {
		code: "QUERY_001".to_string(),
		message: format!("column not found: {}", name),
		label: Some("this column does not exist in the current context".to_string()),
		help: Some("check for typos or ensure the column is defined in the input or an enclosing query".to_string()),
		notes: vec![],
		cause: None,
	}
}
