// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Creates an internal error diagnostic with source location
pub fn internal_with_context(reason: impl Into<String>, file: &str, line: u32, module_path: &str) -> Diagnostic {
	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		message: format!("Internal error: {}", reason.into()),
		label: Some(format!("Internal invariant violated at {}:{}", file, line)),
		help: Some("This is an internal error that should never occur in normal operation.".to_string()),
		notes: vec![format!("Module: {}", module_path)],
		cause: None,
	}
}

/// Simplified internal error without detailed context
pub fn internal(reason: impl Into<String>) -> Diagnostic {
	internal_with_context(reason, "unknown", 0, "unknown")
}

/// Macro to create an internal error with automatic source location capture
#[macro_export]
macro_rules! internal_error {
	($reason:expr) => {
		$crate::error::diagnostic::internal::internal_with_context($reason, file!(), line!(), module_path!())
	};
	($fmt:expr, $($arg:tt)*) => {
		$crate::error::diagnostic::internal::internal_with_context(
			format!($fmt, $($arg)*),
			file!(),
			line!(),
			module_path!()
		)
	};
}
