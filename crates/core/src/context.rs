// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interface::{Identity, IndexRegistry};

pub const DEFAULT_INDEX_BATCH_SIZE: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
	/// Rows between two progress reports of an index build.
	pub index_batch_size: u64,
}

impl ExecutionConfig {
	pub fn with_index_batch_size(mut self, index_batch_size: u64) -> Self {
		self.index_batch_size = index_batch_size.max(1);
		self
	}
}

impl Default for ExecutionConfig {
	fn default() -> Self {
		Self {
			index_batch_size: DEFAULT_INDEX_BATCH_SIZE,
		}
	}
}

/// A warning recorded on the session, surfaced to the client next to the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
	pub code: String,
	pub message: String,
}

/// Per-execution collaborators. Plan nodes never mutate themselves; every side
/// effect of an execution goes through the context.
pub struct ExecutionContext {
	database: String,
	identity: Identity,
	registry: Arc<dyn IndexRegistry>,
	config: ExecutionConfig,
	warnings: Mutex<Vec<Warning>>,
}

impl ExecutionContext {
	pub fn new(database: impl Into<String>, registry: Arc<dyn IndexRegistry>) -> Self {
		Self {
			database: database.into(),
			identity: Identity::root(),
			registry,
			config: ExecutionConfig::default(),
			warnings: Mutex::new(Vec::new()),
		}
	}

	pub fn with_config(mut self, config: ExecutionConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_identity(mut self, identity: Identity) -> Self {
		self.identity = identity;
		self
	}

	pub fn database(&self) -> &str {
		&self.database
	}

	pub fn identity(&self) -> &Identity {
		&self.identity
	}

	pub fn registry(&self) -> &Arc<dyn IndexRegistry> {
		&self.registry
	}

	pub fn config(&self) -> &ExecutionConfig {
		&self.config
	}

	pub fn warn(&self, code: impl Into<String>, message: impl Into<String>) {
		let warning = Warning {
			code: code.into(),
			message: message.into(),
		};
		warn!(database = %self.database, code = %warning.code, "{}", warning.message);
		self.warnings.lock().push(warning);
	}

	pub fn warnings(&self) -> Vec<Warning> {
		self.warnings.lock().clone()
	}
}
