// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod lease;
mod registry;

pub use lease::IndexLease;
pub use registry::{MemoryIndexRegistry, MemoryIndexRegistryBuilder};

/// Visibility of a registered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
	/// Admitted, not visible to readers.
	Building,
	Ready,
	/// Invisible, waiting for outstanding leases before removal.
	Deleting,
}
