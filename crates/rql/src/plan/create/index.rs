// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use strata_core::{
	ExecutionContext, Expression,
	interface::{
		CHECKSUM_KEY, IndexConfig, PrivilegeChecker, PrivilegeType, PrivilegedOperation, RowIter, RowsIter,
		checksumable, indexable,
	},
};
use strata_type::Result;
use tracing::{Span, field, instrument};

use crate::{
	error::IndexError,
	index::{EvalPartitionKeyValueIter, IndexBuilder, columns_and_prepare_expressions},
	plan::{LogicalPlan, PlanRef, TableScanNode},
};

/// `CREATE INDEX name ON table USING driver (expressions)`.
#[derive(Debug, Clone)]
pub struct CreateIndexNode {
	pub name: String,
	/// Empty selects the registry's default driver.
	pub driver: String,
	pub expressions: Vec<Expression>,
	pub config: IndexConfig,
	pub input: PlanRef,
}

impl CreateIndexNode {
	pub fn new(name: impl Into<String>, input: PlanRef, expressions: Vec<Expression>) -> Self {
		Self {
			name: name.into(),
			driver: String::new(),
			expressions,
			config: IndexConfig::new(),
			input,
		}
	}

	pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
		self.driver = driver.into();
		self
	}

	pub fn with_config(mut self, config: IndexConfig) -> Self {
		self.config = config;
		self
	}

	fn scan(&self) -> Option<&TableScanNode> {
		match self.input.as_ref() {
			LogicalPlan::TableScan(scan) => Some(scan),
			_ => None,
		}
	}

	pub(crate) fn check_privileges(&self, ctx: &ExecutionContext, checker: &dyn PrivilegeChecker) -> bool {
		let Some(scan) = self.scan() else {
			return false;
		};
		checker.user_has_privileges(
			ctx,
			&PrivilegedOperation::new(&scan.database, scan.table.name(), vec![PrivilegeType::Index]),
		)
	}

	#[instrument(name = "plan::create_index", level = "info", skip_all, fields(index = %self.name, table = field::Empty, driver = field::Empty))]
	pub(crate) fn execute(&self, ctx: &ExecutionContext) -> Result<Box<dyn RowIter>> {
		let Some(scan) = self.scan() else {
			return Err(IndexError::NotIndexable {
				table: self.input.kind().to_string(),
			}
			.into());
		};
		let table = scan.table.as_ref();
		Span::current().record("table", table.name());

		let Some(indexable) = indexable(table) else {
			return Err(IndexError::NotIndexable {
				table: table.name().to_string(),
			}
			.into());
		};

		let registry = ctx.registry();
		let driver = if self.driver.is_empty() {
			registry.default_driver()
		} else {
			registry.driver(&self.driver)
		};
		let Some(driver) = driver else {
			return Err(IndexError::InvalidDriver {
				driver: self.driver.clone(),
			}
			.into());
		};
		Span::current().record("driver", driver.id());

		let (columns, expressions) = columns_and_prepare_expressions(&self.expressions)?;
		for expression in &expressions {
			let ty = expression.ty();
			if !ty.is_indexable() {
				return Err(IndexError::ExprTypeNotIndexable {
					expression: expression.to_string(),
					ty,
				}
				.into());
			}
		}

		let mut config = self.config.clone();
		if let Some(checksumable) = checksumable(table) {
			config.insert(CHECKSUM_KEY.to_string(), checksumable.checksum()?);
		}

		let index = driver.create(&scan.database, table.name(), &self.name, expressions.clone(), config)?;
		let iter = indexable.index_key_values(&columns)?;
		let iter = Box::new(EvalPartitionKeyValueIter::new(iter, expressions));

		IndexBuilder::new(ctx, driver, index).build(iter)?;

		Ok(Box::new(RowsIter::empty()))
	}
}
