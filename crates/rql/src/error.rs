// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_type::{Diagnostic, Error, IntoDiagnostic, Type};

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
	#[error("table {table} is not indexable")]
	NotIndexable {
		table: String,
	},

	#[error("index driver {driver:?} is not registered")]
	InvalidDriver {
		driver: String,
	},

	#[error("expression {expression} with type {ty} cannot be indexed")]
	ExprTypeNotIndexable {
		expression: String,
		ty: Type,
	},

	#[error("index {index} was deleted while it was being built")]
	Dropped {
		index: String,
	},

	#[error("unable to build index {index}")]
	BuildFailed {
		index: String,
		save: Error,
		deletion: Error,
	},
}

impl IntoDiagnostic for IndexError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			IndexError::NotIndexable {
				table,
			} => Diagnostic {
				code: "INDEX_001".to_string(),
				message: format!("table {} is not indexable", table),
				label: Some("table does not support secondary indexes".to_string()),
				help: Some("create the index on a base table whose storage can stream its rows".to_string()),
				notes: vec![],
				cause: None,
			},

			IndexError::InvalidDriver {
				driver,
			} => Diagnostic {
				code: "INDEX_002".to_string(),
				message: format!("invalid index driver {:?}", driver),
				label: Some("unknown index driver".to_string()),
				help: Some("register the driver with the index registry or omit USING".to_string()),
				notes: vec![],
				cause: None,
			},

			IndexError::ExprTypeNotIndexable {
				expression,
				ty,
			} => Diagnostic {
				code: "INDEX_003".to_string(),
				message: format!("expression {} with type {} cannot be indexed", expression, ty),
				label: Some("large or opaque values cannot be indexed".to_string()),
				help: None,
				notes: vec!["BLOB and JSON expressions are never indexable".to_string()],
				cause: None,
			},

			IndexError::Dropped {
				index,
			} => Diagnostic {
				code: "INDEX_008".to_string(),
				message: format!("index {} was deleted while it was being built", index),
				label: Some("the saved entries were discarded".to_string()),
				help: Some("create the index again".to_string()),
				notes: vec![],
				cause: None,
			},

			IndexError::BuildFailed {
				index,
				save,
				deletion,
			} => Diagnostic {
				code: "INDEX_007".to_string(),
				message: format!("unable to build index {}", index),
				label: Some("the index could not be saved and was not removed".to_string()),
				help: Some("drop the index manually before creating it again".to_string()),
				notes: vec![format!("deleting the failed index also failed: {}", deletion.message)],
				cause: Some(Box::new(save.diagnostic())),
			},
		}
	}
}

impl From<IndexError> for Error {
	fn from(err: IndexError) -> Self {
		Error(err.into_diagnostic())
	}
}
