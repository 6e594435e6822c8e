// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor construction and relayout.

use crate::Shape;

/// Errors that can occur during tensor operations.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The number of values does not match the element count of the shape.
    #[error("element count mismatch: shape {shape} holds {expected} values, got {actual}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    /// The axis order passed to a permutation is not a permutation of `0..rank`.
    #[error("invalid axis permutation {axes:?} for rank-{rank} tensor")]
    InvalidPermutation { axes: Vec<usize>, rank: usize },

    /// The tensor cannot be split into the requested row blocks.
    #[error("cannot split {shape} into {blocks} blocks of {block_rows} rows: {detail}")]
    BlockLayout {
        shape: Shape,
        blocks: usize,
        block_rows: usize,
        detail: &'static str,
    },
}
