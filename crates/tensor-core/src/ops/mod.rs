// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor relayout operations.
//!
//! Both operations read a [`crate::TensorView`] and return a new owned
//! tensor, so the caller's buffer is never disturbed. The element order of
//! the result is fully determined by the operation's arguments, which is
//! what lets the model builder reproduce a fixed on-disk layout.

mod permute_op;
mod split_op;

pub use permute_op::permute;
pub use split_op::split_blocks;
