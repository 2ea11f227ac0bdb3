// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use parking_lot::Mutex;
use strata_core::{
	ExecutionContext,
	interface::{Identity, PrivilegeChecker, PrivilegeType, PrivilegedOperation},
};

/// Grants exactly the `(database, table, privilege)` triples it was given and
/// records every operation it was asked about, with the asking identity.
#[derive(Default)]
pub struct AllowList {
	granted: HashSet<(String, String, PrivilegeType)>,
	asked: Mutex<Vec<(Identity, PrivilegedOperation)>>,
}

impl AllowList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn grant(mut self, database: &str, table: &str, privilege: PrivilegeType) -> Self {
		self.granted.insert((database.to_string(), table.to_string(), privilege));
		self
	}

	pub fn asked(&self) -> Vec<(Identity, PrivilegedOperation)> {
		self.asked.lock().clone()
	}
}

impl PrivilegeChecker for AllowList {
	fn user_has_privileges(&self, ctx: &ExecutionContext, operation: &PrivilegedOperation) -> bool {
		self.asked.lock().push((ctx.identity().clone(), operation.clone()));
		operation.privileges.iter().all(|privilege| {
			self.granted.contains(&(operation.database.clone(), operation.table.clone(), *privilege))
		})
	}
}
