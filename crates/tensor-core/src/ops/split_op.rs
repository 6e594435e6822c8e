// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Contiguous row-block extraction along a stacked axis.

use crate::{Shape, Tensor, TensorError, TensorView};

/// Splits `input` into `blocks` consecutive blocks of `block_rows` rows.
///
/// The stacked axis is the second-to-last axis for tensors of rank ≥ 2 and
/// the only axis for vectors. Every axis before the stacked one must have
/// extent 1 (e.g. `(1, 1, 4h, n)` is accepted), so the stacked matrix is the
/// whole tensor. Block `g` holds rows `[g * block_rows, (g + 1) * block_rows)`
/// and has shape `(block_rows, cols)` (or `(block_rows,)` for vectors).
///
/// # Errors
/// Returns [`TensorError::BlockLayout`] if the tensor is a scalar, has a
/// leading axis with extent other than 1, or its stacked axis is not exactly
/// `blocks * block_rows` long.
///
/// # Examples
/// ```
/// use tensor_core::{split_blocks, Shape, Tensor};
/// let t = Tensor::from_fn(Shape::matrix(6, 2), |i| i as f32);
/// let parts = split_blocks(&t.view(), 3, 2).unwrap();
/// assert_eq!(parts[1].as_slice(), &[4.0, 5.0, 6.0, 7.0]);
/// ```
pub fn split_blocks(
    input: &TensorView<'_>,
    blocks: usize,
    block_rows: usize,
) -> Result<Vec<Tensor>, TensorError> {
    let shape = input.shape();
    let dims = shape.dims();
    let fail = |detail: &'static str| TensorError::BlockLayout {
        shape: shape.clone(),
        blocks,
        block_rows,
        detail,
    };

    let axis = match dims.len() {
        0 => return Err(fail("scalar has no axis to split")),
        1 => 0,
        rank => rank - 2,
    };
    if dims[..axis].iter().any(|&d| d != 1) {
        return Err(fail("leading axes must have extent 1"));
    }
    if dims[axis] != blocks * block_rows {
        return Err(fail("stacked axis length differs from blocks * block_rows"));
    }

    let cols: usize = dims[axis + 1..].iter().product();
    let block_len = block_rows * cols;
    let block_shape = if dims.len() == 1 {
        Shape::vector(block_rows)
    } else {
        Shape::matrix(block_rows, cols)
    };

    let data = input.as_slice();
    (0..blocks)
        .map(|g| {
            let start = g * block_len;
            Tensor::from_f32(block_shape.clone(), &data[start..start + block_len])
        })
        .collect()
}
