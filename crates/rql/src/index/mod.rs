// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Secondary index build: column reduction, row decorators and the registry
//! handshake.

mod build;
mod columns;
mod eval;
mod progress;

pub use build::{BuildState, IndexBuilder};
pub use columns::columns_and_prepare_expressions;
pub use eval::{EvalKeyValueIter, EvalPartitionKeyValueIter};
pub use progress::{Progress, ProgressKeyValueIter, ProgressPartitionKeyValueIter};
