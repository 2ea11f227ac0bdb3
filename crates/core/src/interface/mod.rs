// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub use index::*;
pub use iterator::*;
pub use privilege::*;
pub use table::*;

mod index;
mod iterator;
mod privilege;
mod table;
