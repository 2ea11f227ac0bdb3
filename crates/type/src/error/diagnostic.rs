// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use serde::{Deserialize, Serialize};

pub mod evaluate;
pub mod index;
pub mod internal;
pub mod plan;
pub mod query;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn with_cause(mut self, cause: Diagnostic) -> Self {
		self.cause = Some(Box::new(cause));
		self
	}

	pub fn with_note(mut self, note: impl Into<String>) -> Self {
		self.notes.push(note.into());
		self
	}
}

/// Renders a diagnostic and its cause chain as plain text.
pub fn render(diagnostic: &Diagnostic) -> String {
	let mut out = String::new();
	render_into(&mut out, diagnostic, 0);
	out
}

fn render_into(out: &mut String, diagnostic: &Diagnostic, depth: usize) {
	let indent = "  ".repeat(depth);
	let _ = writeln!(out, "{indent}Error {}: {}", diagnostic.code, diagnostic.message);
	if let Some(label) = &diagnostic.label {
		let _ = writeln!(out, "{indent}  = {label}");
	}
	if let Some(help) = &diagnostic.help {
		let _ = writeln!(out, "{indent}  help: {help}");
	}
	for note in &diagnostic.notes {
		let _ = writeln!(out, "{indent}  note: {note}");
	}
	if let Some(cause) = &diagnostic.cause {
		let _ = writeln!(out, "{indent}  caused by:");
		render_into(out, cause, depth + 2);
	}
}
