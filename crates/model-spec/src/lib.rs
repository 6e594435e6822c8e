// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-spec
//!
//! The binary model-description document produced by the builder, expressed
//! as `prost` messages whose field numbers match the on-disk schema exactly.
//!
//! - [`Model`]: the root document holding the specification version, interface
//!   description, and exactly one network body ([`ModelBody`]).
//! - [`feature_types`]: typed interface slots (multi-array, image,
//!   dictionary, scalar).
//! - [`neural_network`]: layer records ([`NeuralNetworkLayer`]) and every
//!   per-kind parameter message.
//! - [`io`]: write and read encoded documents.
//! - [`ModelSummary`]: a serialisable, human-readable digest of a document.
//!
//! # Example
//! ```
//! use model_spec::{Message, Model, ModelBody, NeuralNetwork};
//!
//! let model = Model {
//!     specification_version: 1,
//!     body: Some(ModelBody::NeuralNetwork(NeuralNetwork::default())),
//!     ..Default::default()
//! };
//! let bytes = model.encode_to_vec();
//! assert_eq!(Model::decode(bytes.as_slice()).unwrap(), model);
//! ```

mod error;
pub mod feature_types;
pub mod io;
mod model;
pub mod neural_network;
mod summary;

pub use error::SpecError;
pub use feature_types::{
    ArrayDataType, ArrayFeatureType, ColorSpace, DictionaryFeatureType, DictionaryKey,
    FeatureDescription, FeatureKind, FeatureType, ImageFeatureType, Int64Vector, StringVector,
};
pub use model::{Model, ModelBody, ModelDescription};
pub use neural_network::{
    ActivationParams, ClassLabels, LayerParams, NeuralNetwork, NeuralNetworkClassifier,
    NeuralNetworkLayer, NeuralNetworkPreprocessing, NeuralNetworkRegressor, WeightParams,
};
pub use summary::{FeatureSummary, LayerSummary, ModelSummary};

/// Re-exported so callers can encode and decode without naming `prost`.
pub use prost::Message;
