// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::plan::PlanRef;

/// Renames the source of every column of its input, as `FROM t AS x` or a
/// derived table does.
#[derive(Debug, Clone)]
pub struct AliasNode {
	pub alias: String,
	pub input: PlanRef,
}
