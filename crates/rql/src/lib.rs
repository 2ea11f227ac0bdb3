// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::IndexError;
pub use plan::{LogicalPlan, PlanRef};
pub use resolve::{Scope, fix_field_indexes, fix_field_indexes_on_expressions, fix_node_field_indexes, resolve_plan};
pub use strata_type::Result;

pub mod error;
pub mod index;
pub mod plan;
pub mod resolve;
