// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nn-builder
//!
//! Incremental construction of neural-network model documents.
//!
//! A [`NeuralNetworkBuilder`] starts from named input and output slots and
//! a [`NetworkMode`], then accepts one layer per call. Every factory method
//! validates its arguments, converts caller tensors into the document's
//! on-disk weight layout, and appends exactly one layer record. A failing
//! call returns a [`BuilderError`] and leaves the document unchanged.
//!
//! - [`builder`]: construction, interface slots, class labels, optional
//!   slots and image pre-processing.
//! - [`layers`]: dense, convolutional, elementwise, shape and recurrent
//!   layer factories.
//! - [`activation`]: nonlinearity tags and their parameter encoding.
//! - [`config`]: TOML-loadable document defaults.

pub mod activation;
pub mod builder;
pub mod config;
pub mod error;
pub mod layers;

pub use activation::{encode_activation, encode_recurrent_activation, NonLinearity};
pub use builder::{ClassLabel, NetworkMode, NeuralNetworkBuilder, PreprocessingParams};
pub use config::BuilderConfig;
pub use error::BuilderError;
pub use layers::{
    parse_pooling_type, BatchnormParams, BiLstmParams, BorderMode, Borders, ConvolutionParams,
    DenseParams, ElementwiseMode, GruParams, LstmWeights, PoolingParams, SimpleRnnParams,
    UniLstmParams,
};

pub use model_spec;
pub use tensor_core;

/// Specification version written into new documents by default.
pub const SPECIFICATION_VERSION: i32 = 1;
