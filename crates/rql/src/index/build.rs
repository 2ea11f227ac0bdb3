// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use strata_core::{
	ExecutionContext,
	interface::{BuildOutcome, IndexDef, IndexDriver, PartitionIndexKeyValueIter},
};
use strata_type::{Error, Result, ensure, internal_error};
use tracing::{error, info, instrument};

use crate::{
	error::IndexError,
	index::{Progress, ProgressPartitionKeyValueIter},
};

/// Lifecycle of one build as seen by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
	Unbuilt,
	Admitted,
	Ready,
	Deleted,
}

impl BuildState {
	fn can_advance_to(self, next: BuildState) -> bool {
		matches!(
			(self, next),
			(BuildState::Unbuilt, BuildState::Admitted)
				| (BuildState::Admitted, BuildState::Ready)
				| (BuildState::Admitted, BuildState::Deleted)
		)
	}
}

/// Streams a table into a driver and makes the result visible through the
/// registry, or removes every trace of it when the save fails.
pub struct IndexBuilder<'a> {
	ctx: &'a ExecutionContext,
	driver: Arc<dyn IndexDriver>,
	index: Arc<IndexDef>,
	state: BuildState,
}

impl<'a> IndexBuilder<'a> {
	pub fn new(ctx: &'a ExecutionContext, driver: Arc<dyn IndexDriver>, index: IndexDef) -> Self {
		Self {
			ctx,
			driver,
			index: Arc::new(index),
			state: BuildState::Unbuilt,
		}
	}

	pub fn state(&self) -> BuildState {
		self.state
	}

	pub fn index(&self) -> &IndexDef {
		&self.index
	}

	/// Admits the index, saves it and blocks until the registry either made
	/// it ready or finished deleting it.
	#[instrument(name = "plan::create_index::build", level = "debug", skip_all, fields(index = %self.index.id))]
	pub fn build(&mut self, mut iter: Box<dyn PartitionIndexKeyValueIter>) -> Result<()> {
		let registry = self.ctx.registry().clone();
		let admission = match registry.add_index(self.index.clone()) {
			Ok(admission) => admission,
			Err(err) => return Err(with_close(err, iter.close())),
		};
		self.advance(BuildState::Admitted)?;

		let progress = Arc::new(Progress::new(
			&self.index.id,
			&self.index.table,
			self.ctx.config().index_batch_size,
		));
		let mut iter = ProgressPartitionKeyValueIter::new(iter, progress.clone());

		info!(driver = self.driver.id(), "starting to save the index");
		let saved = self.driver.save(&self.index, &mut iter);
		let closed = iter.close();

		let saved = match saved {
			Ok(()) => closed,
			Err(err) => Err(with_close(err, closed)),
		};

		match saved {
			Ok(()) => {
				admission.admitted.fire(BuildOutcome::Saved);
				if !admission.ready.wait() {
					return self.discard();
				}
				self.advance(BuildState::Ready)?;
				info!(rows = progress.rows(), "index is ready");
				Ok(())
			}
			Err(err) => {
				admission.admitted.fire(BuildOutcome::Failed);
				self.compensate(err)
			}
		}
	}

	/// The index left the registry while it was saved: drop what the driver stored.
	fn discard(&mut self) -> Result<()> {
		let mut err: Error = IndexError::Dropped {
			index: self.index.id.clone(),
		}
		.into();
		self.ctx.warn(err.code(), err.message.clone());
		error!("index was deleted before it became ready");

		if let Err(deletion) = self.driver.delete(&self.index) {
			error!(error = %deletion.message, "unable to delete the index storage");
			err.notes.push(format!("deleting the index storage also failed: {}", deletion.message));
		}
		self.advance(BuildState::Deleted)?;
		Err(err)
	}

	fn compensate(&mut self, err: Error) -> Result<()> {
		self.ctx.warn(err.code(), format!("unable to save the index: {}", err.message));
		error!(error = %err.message, "unable to save the index");

		match self.ctx.registry().delete_index(&self.index.database, &self.index.id, true) {
			Ok(deleted) => {
				deleted.wait();
				self.advance(BuildState::Deleted)?;
				Err(err)
			}
			Err(deletion) => {
				error!(error = %deletion.message, "unable to delete the index");
				Err(IndexError::BuildFailed {
					index: self.index.id.clone(),
					save: err,
					deletion,
				}
				.into())
			}
		}
	}

	fn advance(&mut self, next: BuildState) -> Result<()> {
		ensure!(
			self.state.can_advance_to(next),
			internal_error!("index build cannot move from {:?} to {:?}", self.state, next)
		);
		self.state = next;
		Ok(())
	}
}

fn with_close(mut err: Error, closed: Result<()>) -> Error {
	if let Err(close) = closed {
		err.notes.push(format!("closing the row source also failed: {}", close.message));
	}
	err
}
