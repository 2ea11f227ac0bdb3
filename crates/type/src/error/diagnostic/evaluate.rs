// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::{Type, error::diagnostic::Diagnostic};

pub fn field_out_of_range(name: &str, ordinal: usize, width: usize) -> Diagnostic {
	Diagnostic {
		code: "EVAL_001".to_string(),
		message: format!("column {} refers to position {} of a row with {} values", name, ordinal, width),
		label: Some("column position outside the row".to_string()),
		help: Some("resolve field indexes against the row layout the expression runs on".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn operator_not_applicable(operator: &str, left: Type, right: Type) -> Diagnostic {
	Diagnostic {
		code: "EVAL_002".to_string(),
		message: format!("cannot apply {} to {} and {}", operator, left, right),
		label: Some("incompatible operand kinds".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn division_by_zero() -> Diagnostic {
	Diagnostic {
		code: "EVAL_003".to_string(),
		message: "division by zero".to_string(),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
