// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use strata_core::{Expression, Schema};
use strata_type::{Error, Result};
use tracing::{instrument, trace};

use crate::{
	plan::{LogicalPlan, PlanRef},
	resolve::{Scope, fix_field_indexes},
};

const COLUMN_NOT_FOUND: &str = "QUERY_001";

/// Resolves the node's own expressions against the layouts of its direct
/// children. Every expression takes the first child layout it resolves
/// against; joins resolve their condition against `left ++ right` only.
pub fn fix_node_field_indexes(node: &PlanRef, scope: &Scope) -> Result<PlanRef> {
	let expressions = node.expressions();
	let children = node.children();
	if expressions.is_empty() || children.is_empty() {
		return Ok(node.clone());
	}

	let layouts = match node.as_ref() {
		LogicalPlan::JoinInner(_) | LogicalPlan::JoinLeft(_) | LogicalPlan::JoinRight(_) => {
			vec![node.schema()]
		}
		_ => children.iter().map(|child| child.schema()).collect(),
	};

	let expressions =
		expressions.into_iter().map(|e| fix_against_any(scope, &layouts, e)).collect::<Result<Vec<_>>>()?;

	Ok(Arc::new(node.with_expressions(expressions)?))
}

fn fix_against_any(scope: &Scope, layouts: &[Schema], expression: Expression) -> Result<Expression> {
	let mut missing: Option<Error> = None;
	for layout in layouts {
		match fix_field_indexes(scope, layout, expression.clone()) {
			Ok(resolved) => return Ok(resolved),
			Err(err) if err.code() == COLUMN_NOT_FOUND => missing = Some(err),
			Err(err) => return Err(err),
		}
	}

	match missing {
		Some(err) => Err(err),
		// no layouts means no children, which callers never pass
		None => fix_field_indexes(scope, &Schema::empty(), expression),
	}
}

/// Resolves a whole plan bottom-up. Each node sees the scope in force at its
/// position; the nested block of an `Apply` additionally sees the apply's
/// left input as its innermost level.
#[instrument(name = "rql::resolve::plan", level = "trace", skip_all)]
pub fn resolve_plan(plan: &PlanRef, scope: &Scope) -> Result<PlanRef> {
	trace!(node = plan.kind(), depth = scope.depth(), "resolving field indexes");

	match plan.as_ref() {
		LogicalPlan::Apply(node) => {
			let left = resolve_plan(&node.left, scope)?;
			let nested = scope.push(vec![left.clone()]);
			let right = resolve_plan(&node.right, &nested)?;
			Ok(Arc::new(plan.with_children(vec![left, right])?))
		}
		_ => {
			let children = plan.children();
			let rebuilt = if children.is_empty() {
				plan.clone()
			} else {
				let children =
					children.iter().map(|child| resolve_plan(child, scope)).collect::<Result<Vec<_>>>()?;
				Arc::new(plan.with_children(children)?)
			};
			fix_node_field_indexes(&rebuilt, scope)
		}
	}
}
