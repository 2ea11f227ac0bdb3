// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{sync::Arc, thread, time::Duration};

use crossbeam_channel::bounded;
use strata_catalog::{IndexStatus, MemoryIndexRegistry};
use strata_core::{
	Expression, Type,
	interface::{BuildOutcome, IndexConfig, IndexDef, IndexRegistry},
};
use strata_testing::driver::MemoryDriver;

fn index(id: &str, column: &str) -> Arc<IndexDef> {
	Arc::new(IndexDef {
		id: id.to_string(),
		database: "db".to_string(),
		table: "t".to_string(),
		driver: "memory".to_string(),
		expressions: vec![Expression::column(0, column, "t", Type::Int8, false)],
		config: IndexConfig::new(),
	})
}

fn registry() -> (MemoryIndexRegistry, Arc<MemoryDriver>) {
	let driver = Arc::new(MemoryDriver::new("memory"));
	let registry = MemoryIndexRegistry::builder().with_driver(driver.clone()).build();
	(registry, driver)
}

mod drivers {
	use super::*;

	#[test]
	fn test_first_driver_is_default() {
		let registry = MemoryIndexRegistry::builder()
			.with_driver(Arc::new(MemoryDriver::new("memory")))
			.with_driver(Arc::new(MemoryDriver::new("btree")))
			.build();

		assert_eq!(registry.default_driver().unwrap().id(), "memory");
		assert_eq!(registry.driver("btree").unwrap().id(), "btree");
		assert!(registry.driver("hash").is_none());
	}

	#[test]
	fn test_explicit_default() {
		let registry = MemoryIndexRegistry::builder()
			.with_driver(Arc::new(MemoryDriver::new("memory")))
			.with_driver(Arc::new(MemoryDriver::new("btree")))
			.with_default_driver("btree")
			.build();

		assert_eq!(registry.default_driver().unwrap().id(), "btree");
	}

	#[test]
	fn test_no_driver() {
		assert!(MemoryIndexRegistry::new().default_driver().is_none());
	}
}

mod add_index {
	use super::*;

	#[test]
	fn test_building_index_is_invisible() {
		let (registry, _) = registry();
		let _admission = registry.add_index(index("idx", "a")).unwrap();

		assert_eq!(registry.status("db", "idx"), Some(IndexStatus::Building));
		assert!(registry.ready_indexes("db", "t").is_empty());
	}

	#[test]
	fn test_saved_makes_index_ready() {
		let (registry, _) = registry();
		let admission = registry.add_index(index("idx", "a")).unwrap();

		admission.admitted.fire(BuildOutcome::Saved);

		assert_eq!(admission.ready.peek(), Some(true));
		assert_eq!(registry.status("db", "idx"), Some(IndexStatus::Ready));
		assert_eq!(registry.ready_indexes("db", "t").len(), 1);
	}

	#[test]
	fn test_failed_stays_invisible() {
		let (registry, _) = registry();
		let admission = registry.add_index(index("idx", "a")).unwrap();

		admission.admitted.fire(BuildOutcome::Failed);

		assert!(!admission.ready.is_fired());
		assert_eq!(registry.status("db", "idx"), Some(IndexStatus::Building));
		assert!(registry.ready_indexes("db", "t").is_empty());
	}

	#[test]
	fn test_saved_after_removal_is_not_ready() {
		let (registry, _) = registry();
		let admission = registry.add_index(index("idx", "a")).unwrap();
		registry.delete_index("db", "idx", true).unwrap();

		admission.admitted.fire(BuildOutcome::Saved);

		assert_eq!(admission.ready.peek(), Some(false));
		assert_eq!(registry.status("db", "idx"), None);
		assert!(registry.ready_indexes("db", "t").is_empty());
	}

	#[test]
	fn test_duplicate_id() {
		let (registry, _) = registry();
		registry.add_index(index("idx", "a")).unwrap();

		let err = registry.add_index(index("idx", "b")).unwrap_err();
		assert_eq!(err.code(), "INDEX_004");
	}

	#[test]
	fn test_duplicate_expressions() {
		let (registry, _) = registry();
		registry.add_index(index("idx", "a")).unwrap();

		let err = registry.add_index(index("other", "a")).unwrap_err();
		assert_eq!(err.code(), "INDEX_004");
	}
}

mod delete_index {
	use super::*;

	fn ready(registry: &MemoryIndexRegistry, id: &str, column: &str) {
		let admission = registry.add_index(index(id, column)).unwrap();
		admission.admitted.fire(BuildOutcome::Saved);
	}

	#[test]
	fn test_unknown_index_lists_known_ids() {
		let (registry, _) = registry();
		ready(&registry, "b_idx", "b");
		ready(&registry, "a_idx", "a");

		let err = registry.delete_index("db", "nope", false).unwrap_err();
		assert_eq!(err.code(), "INDEX_005");
		assert_eq!(err.notes, vec!["registered indexes: a_idx, b_idx".to_string()]);
	}

	#[test]
	fn test_not_ready_requires_force() {
		let (registry, driver) = registry();
		registry.add_index(index("idx", "a")).unwrap();

		let err = registry.delete_index("db", "idx", false).unwrap_err();
		assert_eq!(err.code(), "INDEX_006");

		let deleted = registry.delete_index("db", "idx", true).unwrap();
		assert!(deleted.is_fired());
		assert_eq!(registry.status("db", "idx"), None);
		assert_eq!(driver.deleted(), vec!["idx"]);
	}

	#[test]
	fn test_without_leases_removes_immediately() {
		let (registry, _) = registry();
		ready(&registry, "idx", "a");

		let deleted = registry.delete_index("db", "idx", false).unwrap();

		assert!(deleted.is_fired());
		assert_eq!(registry.status("db", "idx"), None);
	}

	#[test]
	fn test_waits_for_last_lease() {
		let (registry, driver) = registry();
		ready(&registry, "idx", "a");

		let first = registry.ready_indexes("db", "t").pop().unwrap();
		let second = registry.ready_indexes("db", "t").pop().unwrap();
		assert_eq!(first.id, "idx");

		let deleted = registry.delete_index("db", "idx", false).unwrap();
		assert!(!deleted.is_fired());
		assert_eq!(registry.status("db", "idx"), Some(IndexStatus::Deleting));
		assert!(registry.ready_indexes("db", "t").is_empty());

		drop(first);
		assert!(!deleted.is_fired());

		drop(second);
		assert!(deleted.is_fired());
		assert_eq!(registry.status("db", "idx"), None);
		assert_eq!(driver.deleted(), vec!["idx"]);
	}

	#[test]
	fn test_force_ignores_leases() {
		let (registry, _) = registry();
		ready(&registry, "idx", "a");
		let lease = registry.ready_indexes("db", "t").pop().unwrap();

		let deleted = registry.delete_index("db", "idx", true).unwrap();

		assert!(deleted.is_fired());
		assert_eq!(registry.status("db", "idx"), None);
		drop(lease);
	}

	#[test]
	fn test_waiter_on_another_thread() {
		let (registry, _) = registry();
		ready(&registry, "idx", "a");
		let lease = registry.ready_indexes("db", "t").pop().unwrap();
		let deleted = registry.delete_index("db", "idx", false).unwrap();

		let (tx, rx) = bounded(1);
		let waiter = thread::spawn(move || {
			deleted.wait();
			tx.send(()).unwrap();
		});

		assert!(rx.recv_timeout(Duration::from_millis(20)).is_err());
		drop(lease);
		rx.recv_timeout(Duration::from_secs(5)).unwrap();
		waiter.join().unwrap();
	}

	#[test]
	fn test_driver_failure_keeps_the_index() {
		let driver = Arc::new(MemoryDriver::new("memory").failing_delete());
		let registry = MemoryIndexRegistry::builder().with_driver(driver).build();
		ready(&registry, "idx", "a");

		let err = registry.delete_index("db", "idx", false).unwrap_err();

		assert_eq!(err.code(), "INTERNAL_ERROR");
		assert_eq!(registry.status("db", "idx"), Some(IndexStatus::Ready));
	}
}
