// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeMap,
	fmt::{Display, Formatter},
	sync::Arc,
};

use serde::{Deserialize, Serialize};
use strata_type::Result;

use crate::{Expression, Signal, interface::PartitionIndexKeyValueIter};

/// Config key under which the table checksum is recorded at build time.
pub const CHECKSUM_KEY: &str = "checksum";

pub type IndexConfig = BTreeMap<String, String>;

/// Descriptor of a secondary index. The id equals the index name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDef {
	pub id: String,
	pub database: String,
	pub table: String,
	pub driver: String,
	pub expressions: Vec<Expression>,
	pub config: IndexConfig,
}

impl IndexDef {
	pub fn name(&self) -> &str {
		&self.id
	}

	/// Canonical rendering of the expressions, used to detect duplicate indexes.
	pub fn expression_keys(&self) -> Vec<String> {
		self.expressions.iter().map(|e| e.to_string()).collect()
	}

	pub fn checksum(&self) -> Option<&str> {
		self.config.get(CHECKSUM_KEY).map(String::as_str)
	}
}

impl Display for IndexDef {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{} ON {} USING {}", self.database, self.id, self.table, self.driver)
	}
}

/// How a build ended, reported to the registry through the admission signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
	Saved,
	Failed,
}

/// Handshake channels handed out when an index is admitted to a registry.
///
/// The builder fires `admitted` once its save finished. After `Saved` the
/// registry fires `ready` with `true` once the index became visible to
/// readers, or `false` if the index left the registry before it could.
#[derive(Debug, Clone)]
pub struct IndexAdmission {
	pub admitted: Signal<BuildOutcome>,
	pub ready: Signal<bool>,
}

impl IndexAdmission {
	pub fn new() -> Self {
		Self {
			admitted: Signal::new(),
			ready: Signal::new(),
		}
	}
}

impl Default for IndexAdmission {
	fn default() -> Self {
		Self::new()
	}
}

/// Storage backend of an index.
pub trait IndexDriver: Send + Sync {
	fn id(&self) -> &str;

	fn create(
		&self,
		database: &str,
		table: &str,
		name: &str,
		expressions: Vec<Expression>,
		config: IndexConfig,
	) -> Result<IndexDef>;

	/// Consumes `iter` and durably stores its entries. The caller closes the iterator.
	fn save(&self, index: &IndexDef, iter: &mut dyn PartitionIndexKeyValueIter) -> Result<()>;

	fn delete(&self, index: &IndexDef) -> Result<()>;
}

/// Shared catalog of drivers and indexes.
pub trait IndexRegistry: Send + Sync {
	fn default_driver(&self) -> Option<Arc<dyn IndexDriver>>;

	fn driver(&self, name: &str) -> Option<Arc<dyn IndexDriver>>;

	/// Admits an index in a building, invisible state.
	fn add_index(&self, index: Arc<IndexDef>) -> Result<IndexAdmission>;

	/// Requests deletion. The returned signal fires once the index is gone.
	fn delete_index(&self, database: &str, id: &str, force: bool) -> Result<Signal>;
}
