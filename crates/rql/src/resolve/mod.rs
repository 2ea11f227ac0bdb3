// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Rewrites column references into positions of the assembled row:
//! enclosing scope levels first, outermost lowest, then the node's own input.

mod field;
mod plan;
mod scope;

pub use field::{fix_field_indexes, fix_field_indexes_on_expressions};
pub use plan::{fix_node_field_indexes, resolve_plan};
pub use scope::Scope;
