// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod driver;
pub mod iterator;
pub mod privilege;
pub mod registry;
pub mod table;
pub mod util;

pub use util::tracing::init_tracing;
