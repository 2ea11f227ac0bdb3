// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod value;

pub use error::{Diagnostic, Error, IntoDiagnostic};
pub use value::{GetType, Row, Type, Value};

pub type Result<T> = std::result::Result<T, Error>;
