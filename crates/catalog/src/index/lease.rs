// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Debug, Formatter},
	ops::Deref,
	sync::{Arc, Weak},
};

use strata_core::interface::IndexDef;

use crate::index::registry::{IndexKey, RegistryInner};

/// A reader's reference on a ready index. Dropping the last lease of an index
/// that is being deleted completes the deletion.
pub struct IndexLease {
	registry: Weak<RegistryInner>,
	key: IndexKey,
	index: Arc<IndexDef>,
}

impl IndexLease {
	pub(crate) fn new(registry: Weak<RegistryInner>, key: IndexKey, index: Arc<IndexDef>) -> Self {
		Self {
			registry,
			key,
			index,
		}
	}
}

impl Deref for IndexLease {
	type Target = IndexDef;

	fn deref(&self) -> &Self::Target {
		&self.index
	}
}

impl Debug for IndexLease {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("IndexLease").field(&self.index.id).finish()
	}
}

impl Drop for IndexLease {
	fn drop(&mut self) {
		if let Some(registry) = self.registry.upgrade() {
			registry.release(&self.key);
		}
	}
}
