// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use context::{DEFAULT_INDEX_BATCH_SIZE, ExecutionConfig, ExecutionContext, Warning};
pub use expression::Expression;
pub use schema::{Column, Schema};
pub use signal::Signal;
pub use strata_type::{Error, Result, Row, Type, Value};

mod context;
pub mod expression;
pub mod interface;
mod schema;
mod signal;
