// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use index::{IndexLease, IndexStatus, MemoryIndexRegistry, MemoryIndexRegistryBuilder};

mod index;
