// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layers that combine two or more blobs.

use crate::{BuilderError, NeuralNetworkBuilder};
use model_spec::neural_network::{
    AddLayerParams, AverageLayerParams, ConcatLayerParams, DotProductLayerParams, MaxLayerParams,
    MultiplyLayerParams,
};
use model_spec::{LayerParams, NeuralNetworkLayer};
use std::fmt;
use std::str::FromStr;

/// How an elementwise layer combines its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementwiseMode {
    /// Concatenate along the channel axis.
    Concat,
    /// Concatenate along the sequence axis.
    SequenceConcat,
    Add,
    Multiply,
    /// Dot product of exactly two inputs.
    Dot,
    /// Cosine similarity of exactly two inputs.
    Cos,
    Max,
    /// Mean of the inputs.
    Ave,
}

impl ElementwiseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concat => "CONCAT",
            Self::SequenceConcat => "SEQUENCE_CONCAT",
            Self::Add => "ADD",
            Self::Multiply => "MULTIPLY",
            Self::Dot => "DOT",
            Self::Cos => "COS",
            Self::Max => "MAX",
            Self::Ave => "AVE",
        }
    }

    fn params(self) -> LayerParams {
        match self {
            Self::Concat => LayerParams::Concat(ConcatLayerParams {
                sequence_concat: false,
            }),
            Self::SequenceConcat => LayerParams::Concat(ConcatLayerParams {
                sequence_concat: true,
            }),
            Self::Add => LayerParams::Add(AddLayerParams::default()),
            Self::Multiply => LayerParams::Multiply(MultiplyLayerParams::default()),
            Self::Dot => LayerParams::Dot(DotProductLayerParams {
                cosine_similarity: false,
            }),
            Self::Cos => LayerParams::Dot(DotProductLayerParams {
                cosine_similarity: true,
            }),
            Self::Max => LayerParams::Max(MaxLayerParams {}),
            Self::Ave => LayerParams::Average(AverageLayerParams {}),
        }
    }
}

impl FromStr for ElementwiseMode {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONCAT" => Ok(Self::Concat),
            "SEQUENCE_CONCAT" => Ok(Self::SequenceConcat),
            "ADD" => Ok(Self::Add),
            "MULTIPLY" => Ok(Self::Multiply),
            "DOT" => Ok(Self::Dot),
            "COS" => Ok(Self::Cos),
            "MAX" => Ok(Self::Max),
            "AVE" => Ok(Self::Ave),
            _ => Err(BuilderError::NotImplemented(format!(
                "elementwise mode '{s}' is not supported"
            ))),
        }
    }
}

impl fmt::Display for ElementwiseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NeuralNetworkBuilder {
    /// Adds a layer combining `input_names` according to `mode`.
    ///
    /// # Errors
    /// [`BuilderError::Value`] with fewer than two inputs, or with anything
    /// but exactly two inputs for [`Dot`](ElementwiseMode::Dot) and
    /// [`Cos`](ElementwiseMode::Cos).
    pub fn add_elementwise(
        &mut self,
        name: &str,
        input_names: &[&str],
        output_name: &str,
        mode: ElementwiseMode,
    ) -> Result<(), BuilderError> {
        let pairwise = matches!(mode, ElementwiseMode::Dot | ElementwiseMode::Cos);
        if input_names.len() < 2 || (pairwise && input_names.len() != 2) {
            return Err(BuilderError::Value(format!(
                "layer '{name}': {mode} needs {} inputs, got {}",
                if pairwise { "exactly 2" } else { "at least 2" },
                input_names.len()
            )));
        }
        self.push_layer(NeuralNetworkLayer::new(
            name,
            input_names,
            &[output_name],
            mode.params(),
        ));
        Ok(())
    }
}
