// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Row-major `f32` tensors and the relayout helpers the model builder needs
//! before it can embed parameters in a model document.
//!
//! This crate provides:
//! - [`Tensor`]: an owned, n-dimensional `f32` tensor in row-major order.
//! - [`TensorView`]: a borrowed view with its own shape, so a tensor can be
//!   reinterpreted (e.g. flattened) without copying.
//! - [`Shape`]: runtime shape descriptors with stride computation.
//! - Relayout operations: [`permute`] (axis transposition) and
//!   [`split_blocks`] (contiguous row blocks along the stacked axis).
//!
//! Every operation is a pure function of its input: the source tensor is
//! never modified and the result is always a freshly allocated tensor.

mod error;
mod ops;
mod shape;
mod tensor;

pub use error::TensorError;
pub use ops::{permute, split_blocks};
pub use shape::Shape;
pub use tensor::{Tensor, TensorView};
