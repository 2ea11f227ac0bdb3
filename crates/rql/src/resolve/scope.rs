// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use once_cell::sync::OnceCell;
use strata_core::Schema;

use crate::plan::PlanRef;

/// Chain of enclosing query blocks, innermost first. Cloning is cheap and
/// pushing never changes the scope it was pushed onto.
#[derive(Debug, Clone, Default)]
pub struct Scope {
	head: Option<Arc<Level>>,
}

#[derive(Debug)]
struct Level {
	nodes: Vec<PlanRef>,
	layout: OnceCell<Schema>,
	parent: Option<Arc<Level>>,
}

impl Level {
	fn layout(&self) -> &Schema {
		self.layout.get_or_init(|| {
			self.nodes.iter().fold(Schema::empty(), |layout, node| layout.concat(&node.schema()))
		})
	}
}

impl Scope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a nested level whose layout is the concatenation of `nodes`' layouts.
	pub fn push(&self, nodes: Vec<PlanRef>) -> Scope {
		Scope {
			head: Some(Arc::new(Level {
				nodes,
				layout: OnceCell::new(),
				parent: self.head.clone(),
			})),
		}
	}

	/// Opens a nested level made of the children of `node`.
	pub fn push_node(&self, node: &PlanRef) -> Scope {
		self.push(node.children())
	}

	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	/// Number of levels.
	pub fn depth(&self) -> usize {
		self.levels().count()
	}

	/// Total number of columns visible from enclosing levels.
	pub fn width(&self) -> usize {
		self.levels().map(|layout| layout.len()).sum()
	}

	/// Level layouts, innermost first.
	pub fn levels(&self) -> impl Iterator<Item = &Schema> {
		std::iter::successors(self.head.as_deref(), |level| level.parent.as_deref()).map(Level::layout)
	}
}
