// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_type::Result;

use crate::{
	Schema,
	interface::{PartitionIndexKeyValueIter, RowIter},
};

/// A table as seen by the plan. Optional capabilities are exposed through the
/// `as_*` accessors; wrappers expose the table they decorate via `underlying`.
pub trait Table: Send + Sync {
	fn name(&self) -> &str;

	/// Row layout of the table; every column is sourced by the table name.
	fn schema(&self) -> Schema;

	fn scan(&self) -> Result<Box<dyn RowIter>>;

	fn as_indexable(&self) -> Option<&dyn IndexableTable> {
		None
	}

	fn as_checksumable(&self) -> Option<&dyn ChecksumableTable> {
		None
	}

	fn underlying(&self) -> Option<&dyn Table> {
		None
	}
}

/// Tables able to stream raw column values per partition for an index build.
pub trait IndexableTable: Send + Sync {
	fn index_key_values(&self, columns: &[String]) -> Result<Box<dyn PartitionIndexKeyValueIter>>;
}

/// Tables able to report a content checksum.
pub trait ChecksumableTable: Send + Sync {
	fn checksum(&self) -> Result<String>;
}

/// Looks for a capability on `table`, unwrapping wrapper tables until one
/// exposes it or no further table is wrapped.
pub fn find_capability<'a, C: ?Sized>(
	table: &'a dyn Table,
	capability_of: impl Fn(&'a dyn Table) -> Option<&'a C>,
) -> Option<&'a C> {
	let mut current = Some(table);
	while let Some(table) = current {
		if let Some(capability) = capability_of(table) {
			return Some(capability);
		}
		current = table.underlying();
	}
	None
}

pub fn indexable(table: &dyn Table) -> Option<&dyn IndexableTable> {
	find_capability(table, |t| t.as_indexable())
}

pub fn checksumable(table: &dyn Table) -> Option<&dyn ChecksumableTable> {
	find_capability(table, |t| t.as_checksumable())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::interface::RowsIter;

	struct Base;

	impl Table for Base {
		fn name(&self) -> &str {
			"base"
		}

		fn schema(&self) -> Schema {
			Schema::empty()
		}

		fn scan(&self) -> Result<Box<dyn RowIter>> {
			Ok(Box::new(RowsIter::empty()))
		}

		fn as_checksumable(&self) -> Option<&dyn ChecksumableTable> {
			Some(self)
		}
	}

	impl ChecksumableTable for Base {
		fn checksum(&self) -> Result<String> {
			Ok("base".to_string())
		}
	}

	struct Wrapper(Base);

	impl Table for Wrapper {
		fn name(&self) -> &str {
			"wrapper"
		}

		fn schema(&self) -> Schema {
			self.0.schema()
		}

		fn scan(&self) -> Result<Box<dyn RowIter>> {
			self.0.scan()
		}

		fn underlying(&self) -> Option<&dyn Table> {
			Some(&self.0)
		}
	}

	struct Twice(Wrapper);

	impl Table for Twice {
		fn name(&self) -> &str {
			"twice"
		}

		fn schema(&self) -> Schema {
			self.0.schema()
		}

		fn scan(&self) -> Result<Box<dyn RowIter>> {
			self.0.scan()
		}

		fn underlying(&self) -> Option<&dyn Table> {
			Some(&self.0)
		}
	}

	#[test]
	fn test_direct_capability() {
		assert!(checksumable(&Base).is_some());
		assert!(indexable(&Base).is_none());
	}

	#[test]
	fn test_unwraps_recursively() {
		let table = Twice(Wrapper(Base));
		assert_eq!(checksumable(&table).unwrap().checksum().unwrap(), "base");
		assert!(indexable(&table).is_none());
	}
}
