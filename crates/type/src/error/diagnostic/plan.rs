// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn invalid_children_number(node: &str, got: usize, expected: usize) -> Diagnostic {
	Diagnostic {
		code: "PLAN_001".to_string(),
		message: format!("{} expects {} children, got {}", node, expected, got),
		label: Some("plan node rebuilt with the wrong arity".to_string()),
		help: None,
		notes: vec!["plan nodes must be rebuilt with exactly their declared number of inputs".to_string()],
		cause: None,
	}
}

pub fn invalid_expressions_number(node: &str, got: usize, expected: usize) -> Diagnostic {
	Diagnostic {
		code: "PLAN_001".to_string(),
		message: format!("{} expects {} expressions, got {}", node, expected, got),
		label: Some("plan node rebuilt with the wrong number of expressions".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}
