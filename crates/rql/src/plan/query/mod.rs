// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod alias;
mod apply;
mod filter;
mod join;
mod map;
mod scan;

pub use alias::AliasNode;
pub use apply::{ApplyKind, ApplyNode};
pub use filter::FilterNode;
pub use join::{JoinInnerNode, JoinLeftNode, JoinRightNode};
pub use map::MapNode;
pub use scan::TableScanNode;
