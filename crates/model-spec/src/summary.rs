// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Human-readable digest of a model document.
//!
//! [`ModelSummary`] flattens the parts of a [`Model`] a person usually wants
//! to check (interface, body kind, layer wiring and payload sizes) into plain
//! serde types, so it can be printed with `Display` or dumped as JSON.

use crate::{FeatureDescription, Model, ModelBody, NeuralNetworkLayer, SpecError};
use std::fmt;

/// One interface slot.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureSummary {
    pub name: String,
    /// Rendered type, e.g. `multi_array [3] DOUBLE`.
    pub feature_type: String,
}

/// One layer record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerSummary {
    pub index: usize,
    pub name: String,
    pub kind: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Number of `f32` values embedded in the layer.
    pub parameters: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelSummary {
    pub specification_version: i32,
    pub body: String,
    pub inputs: Vec<FeatureSummary>,
    pub outputs: Vec<FeatureSummary>,
    pub layers: Vec<LayerSummary>,
    pub preprocessing: usize,
    pub class_labels: usize,
}

impl FeatureSummary {
    fn from_description(d: &FeatureDescription) -> Self {
        Self {
            name: d.name.clone(),
            feature_type: d
                .r#type
                .as_ref()
                .map_or_else(|| "unset".to_owned(), ToString::to_string),
        }
    }
}

impl LayerSummary {
    fn from_layer(index: usize, layer: &NeuralNetworkLayer) -> Self {
        Self {
            index,
            name: layer.name.clone(),
            kind: layer.kind_name().to_owned(),
            inputs: layer.input.clone(),
            outputs: layer.output.clone(),
            parameters: layer.layer.as_ref().map_or(0, |p| p.weight_count()),
        }
    }
}

impl ModelSummary {
    /// Builds a summary of `model`.
    pub fn from_model(model: &Model) -> Self {
        let class_labels = match &model.body {
            Some(ModelBody::NeuralNetworkClassifier(c)) => {
                c.class_labels.as_ref().map_or(0, |l| l.len())
            }
            _ => 0,
        };
        Self {
            specification_version: model.specification_version,
            body: model
                .body
                .as_ref()
                .map_or("none", ModelBody::kind_name)
                .to_owned(),
            inputs: model.inputs().iter().map(FeatureSummary::from_description).collect(),
            outputs: model.outputs().iter().map(FeatureSummary::from_description).collect(),
            layers: model
                .layers()
                .iter()
                .enumerate()
                .map(|(i, l)| LayerSummary::from_layer(i, l))
                .collect(),
            preprocessing: model.body.as_ref().map_or(0, |b| b.preprocessing().len()),
            class_labels,
        }
    }

    /// Total number of embedded `f32` values across all layers.
    pub fn total_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.parameters).sum()
    }

    /// Renders the summary as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Model v{} ({}): {} layers, {} parameters",
            self.specification_version,
            self.body,
            self.layers.len(),
            self.total_parameters(),
        )?;
        for input in &self.inputs {
            writeln!(f, "  input  {}: {}", input.name, input.feature_type)?;
        }
        for output in &self.outputs {
            writeln!(f, "  output {}: {}", output.name, output.feature_type)?;
        }
        for layer in &self.layers {
            writeln!(
                f,
                "  [{}] {} ({}) {:?} -> {:?}, {} parameters",
                layer.index, layer.name, layer.kind, layer.inputs, layer.outputs, layer.parameters,
            )?;
        }
        Ok(())
    }
}
