// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt;

use crate::ExecutionContext;

pub type IdentityId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
	Anonymous {},
	System {
		id: IdentityId,
		name: String,
	},
	User {
		id: IdentityId,
		name: String,
	},
}

impl Identity {
	pub fn root() -> Self {
		Self::System {
			id: 0,
			name: "root".to_string(),
		}
	}

	pub fn user(id: IdentityId, name: impl Into<String>) -> Self {
		Self::User {
			id,
			name: name.into(),
		}
	}
}

impl fmt::Display for Identity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Anonymous {} => write!(f, "anonymous"),
			Self::System {
				id,
				..
			} => write!(f, "system:{}", id),
			Self::User {
				id,
				..
			} => write!(f, "user:{}", id),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeType {
	Select,
	Insert,
	Update,
	Delete,
	Create,
	Drop,
	Index,
}

impl fmt::Display for PrivilegeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			PrivilegeType::Select => "SELECT",
			PrivilegeType::Insert => "INSERT",
			PrivilegeType::Update => "UPDATE",
			PrivilegeType::Delete => "DELETE",
			PrivilegeType::Create => "CREATE",
			PrivilegeType::Drop => "DROP",
			PrivilegeType::Index => "INDEX",
		})
	}
}

/// The target and privileges a plan node needs to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegedOperation {
	pub database: String,
	pub table: String,
	pub column: Option<String>,
	pub privileges: Vec<PrivilegeType>,
}

impl PrivilegedOperation {
	pub fn new(database: impl Into<String>, table: impl Into<String>, privileges: Vec<PrivilegeType>) -> Self {
		Self {
			database: database.into(),
			table: table.into(),
			column: None,
			privileges,
		}
	}
}

/// Privilege policy. Plan nodes only describe what they need.
pub trait PrivilegeChecker: Send + Sync {
	fn user_has_privileges(&self, ctx: &ExecutionContext, operation: &PrivilegedOperation) -> bool;
}
