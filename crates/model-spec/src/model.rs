// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The root document.

use crate::feature_types::FeatureDescription;
use crate::neural_network::{
    NeuralNetwork, NeuralNetworkClassifier, NeuralNetworkLayer, NeuralNetworkPreprocessing,
    NeuralNetworkRegressor,
};

/// The model's interface: ordered inputs and outputs plus classifier names.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ModelDescription {
    #[prost(message, repeated, tag = "1")]
    pub input: Vec<FeatureDescription>,
    #[prost(message, repeated, tag = "10")]
    pub output: Vec<FeatureDescription>,
    #[prost(string, tag = "11")]
    pub predicted_feature_name: String,
    #[prost(string, tag = "12")]
    pub predicted_probabilities_name: String,
}

/// A versioned model document holding exactly one network body.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Model {
    #[prost(int32, tag = "1")]
    pub specification_version: i32,
    #[prost(message, optional, tag = "2")]
    pub description: Option<ModelDescription>,
    #[prost(oneof = "ModelBody", tags = "303, 403, 500")]
    pub body: Option<ModelBody>,
}

/// The three mutually exclusive network variants.
#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ModelBody {
    #[prost(message, tag = "303")]
    NeuralNetworkRegressor(NeuralNetworkRegressor),
    #[prost(message, tag = "403")]
    NeuralNetworkClassifier(NeuralNetworkClassifier),
    #[prost(message, tag = "500")]
    NeuralNetwork(NeuralNetwork),
}

impl ModelBody {
    /// Short label for the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::NeuralNetwork(_) => "neural_network",
            Self::NeuralNetworkClassifier(_) => "classifier",
            Self::NeuralNetworkRegressor(_) => "regressor",
        }
    }

    /// The ordered layer list.
    pub fn layers(&self) -> &[NeuralNetworkLayer] {
        match self {
            Self::NeuralNetwork(nn) => &nn.layers,
            Self::NeuralNetworkClassifier(nn) => &nn.layers,
            Self::NeuralNetworkRegressor(nn) => &nn.layers,
        }
    }

    pub fn layers_mut(&mut self) -> &mut Vec<NeuralNetworkLayer> {
        match self {
            Self::NeuralNetwork(nn) => &mut nn.layers,
            Self::NeuralNetworkClassifier(nn) => &mut nn.layers,
            Self::NeuralNetworkRegressor(nn) => &mut nn.layers,
        }
    }

    /// The pre-processing list.
    pub fn preprocessing(&self) -> &[NeuralNetworkPreprocessing] {
        match self {
            Self::NeuralNetwork(nn) => &nn.preprocessing,
            Self::NeuralNetworkClassifier(nn) => &nn.preprocessing,
            Self::NeuralNetworkRegressor(nn) => &nn.preprocessing,
        }
    }

    pub fn preprocessing_mut(&mut self) -> &mut Vec<NeuralNetworkPreprocessing> {
        match self {
            Self::NeuralNetwork(nn) => &mut nn.preprocessing,
            Self::NeuralNetworkClassifier(nn) => &mut nn.preprocessing,
            Self::NeuralNetworkRegressor(nn) => &mut nn.preprocessing,
        }
    }
}

impl Model {
    /// The layer list of whichever body is populated (empty if none).
    pub fn layers(&self) -> &[NeuralNetworkLayer] {
        match &self.body {
            Some(body) => body.layers(),
            None => &[],
        }
    }

    /// The interface inputs (empty if no description is set).
    pub fn inputs(&self) -> &[FeatureDescription] {
        match &self.description {
            Some(d) => &d.input,
            None => &[],
        }
    }

    /// The interface outputs (empty if no description is set).
    pub fn outputs(&self) -> &[FeatureDescription] {
        match &self.description {
            Some(d) => &d.output,
            None => &[],
        }
    }
}
