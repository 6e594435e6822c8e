// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for document construction.

/// Errors that can occur while building a model document.
///
/// Every failing builder call returns one of these *before* touching the
/// document, so a caller can recover and keep building.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// A shape or element count is incompatible with the requested layer or slot.
    #[error("shape error: {0}")]
    Shape(String),

    /// The document is not in a state that allows the operation.
    #[error("state error: {0}")]
    State(String),

    /// An argument has the wrong kind (unknown activation, mixed label types).
    #[error("type error: {0}")]
    Type(String),

    /// The requested mode is recognised by the schema but not supported here.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// An argument value is out of range.
    #[error("value error: {0}")]
    Value(String),

    /// A parameter tensor could not be relaid out for a layer.
    #[error("tensor layout error in layer '{layer}': {source}")]
    Tensor {
        layer: String,
        #[source]
        source: tensor_core::TensorError,
    },

    /// Reading or writing the finished document failed.
    #[error("document error: {0}")]
    Spec(#[from] model_spec::SpecError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BuilderError {
    /// Wraps a [`tensor_core::TensorError`] raised while building `layer`.
    pub(crate) fn tensor(layer: &str) -> impl FnOnce(tensor_core::TensorError) -> Self + '_ {
        move |source| Self::Tensor {
            layer: layer.to_owned(),
            source,
        }
    }
}
