// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layer factory methods on [`NeuralNetworkBuilder`](crate::NeuralNetworkBuilder).
//!
//! Each submodule adds one `impl` block:
//!
//! | Module          | Layers                                                    |
//! |-----------------|-----------------------------------------------------------|
//! | [`simple`]      | inner product, embedding, softmax, activation, batchnorm, upsample, repeat, dropout |
//! | [`conv`]        | convolution, pooling, padding, crop                       |
//! | [`elementwise`] | concat, add, multiply, dot, cosine, max, average          |
//! | [`shape`]       | permute, reshape, flatten                                 |
//! | [`recurrent`]   | simple RNN, GRU, uni- and bi-directional LSTM             |
//!
//! All tensors are flattened in row-major order unless a layer documents
//! its own relayout.

pub mod conv;
pub mod elementwise;
pub mod recurrent;
pub mod shape;
pub mod simple;

pub use conv::{parse_pooling_type, BorderMode, Borders, ConvolutionParams, PoolingParams};
pub use elementwise::ElementwiseMode;
pub use recurrent::{BiLstmParams, GruParams, LstmWeights, SimpleRnnParams, UniLstmParams};
pub use simple::{BatchnormParams, DenseParams};

use crate::BuilderError;
use model_spec::WeightParams;
use tensor_core::Tensor;

/// Row-major copy of `tensor` as a weight payload.
pub(crate) fn flat(tensor: &Tensor) -> WeightParams {
    WeightParams::new(tensor.as_slice())
}

/// Fails with [`BuilderError::Shape`] unless `tensor` holds `expected` elements.
pub(crate) fn check_len(
    layer: &str,
    what: &str,
    tensor: &Tensor,
    expected: usize,
) -> Result<(), BuilderError> {
    if tensor.len() != expected {
        return Err(BuilderError::Shape(format!(
            "layer '{layer}': {what} has {} elements ({}), expected {expected}",
            tensor.len(),
            tensor.shape()
        )));
    }
    Ok(())
}

/// `true` if a tensor is present and has a non-zero element.
pub(crate) fn nonzero(tensor: Option<&Tensor>) -> bool {
    tensor.is_some_and(Tensor::any_nonzero)
}
