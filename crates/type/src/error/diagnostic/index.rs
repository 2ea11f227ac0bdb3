// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

pub fn index_already_registered(id: &str) -> Diagnostic {
	Diagnostic {
		code: "INDEX_004".to_string(),
		message: format!("index {:?} is already registered", id),
		label: Some("duplicate index".to_string()),
		help: Some("choose a different index name".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn index_expressions_already_registered(id: &str, table: &str) -> Diagnostic {
	Diagnostic {
		code: "INDEX_004".to_string(),
		message: format!("an index with the same expressions as {:?} already exists on table {}", id, table),
		label: Some("duplicate index".to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn index_not_found(id: &str, known: &[String]) -> Diagnostic {
	Diagnostic {
		code: "INDEX_005".to_string(),
		message: format!("index {:?} was not found", id),
		label: None,
		help: None,
		notes: if known.is_empty() {
			vec![]
		} else {
			vec![format!("registered indexes: {}", known.join(", "))]
		},
		cause: None,
	}
}

pub fn index_delete_invalid_status(id: &str) -> Diagnostic {
	Diagnostic {
		code: "INDEX_006".to_string(),
		message: format!("index {:?} cannot be deleted while it is not ready", id),
		label: None,
		help: Some("wait for the build to finish or force the deletion".to_string()),
		notes: vec![],
		cause: None,
	}
}
