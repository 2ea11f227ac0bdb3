// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
};

use strata_core::{
	ExecutionContext,
	interface::{PrivilegeChecker, PrivilegeType, PrivilegedOperation, RowIter, Table},
};
use strata_type::Result;

/// A table that was already resolved against the catalog.
#[derive(Clone)]
pub struct TableScanNode {
	pub database: String,
	pub table: Arc<dyn Table>,
}

impl TableScanNode {
	pub fn new(database: impl Into<String>, table: Arc<dyn Table>) -> Self {
		Self {
			database: database.into(),
			table,
		}
	}

	pub(crate) fn check_privileges(&self, ctx: &ExecutionContext, checker: &dyn PrivilegeChecker) -> bool {
		checker.user_has_privileges(
			ctx,
			&PrivilegedOperation::new(&self.database, self.table.name(), vec![PrivilegeType::Select]),
		)
	}

	pub(crate) fn execute(&self) -> Result<Box<dyn RowIter>> {
		self.table.scan()
	}
}

impl Debug for TableScanNode {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TableScanNode").field("database", &self.database).field("table", &self.table.name()).finish()
	}
}
