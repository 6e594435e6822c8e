// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layers that only rearrange data: permute, reshape, flatten.
//!
//! Reshape and flatten take a `mode` of `0` (channel-first) or `1`
//! (channel-last).

use crate::{BuilderError, NeuralNetworkBuilder};
use model_spec::neural_network::{
    FlattenLayerParams, FlattenOrder, PermuteLayerParams, ReshapeLayerParams, ReshapeOrder,
};
use model_spec::{LayerParams, NeuralNetworkLayer};

fn unsupported_mode(name: &str, mode: u32) -> BuilderError {
    BuilderError::NotImplemented(format!(
        "layer '{name}': mode {mode} is not supported; expected 0 (channel first) or 1 (channel last)"
    ))
}

impl NeuralNetworkBuilder {
    /// Adds a layer reordering the four axes `(sequence, channel, height, width)`.
    ///
    /// # Errors
    /// [`BuilderError::Value`] unless `dim` is a permutation of `0..4`.
    pub fn add_permute(
        &mut self,
        name: &str,
        dim: [usize; 4],
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        let mut sorted = dim;
        sorted.sort_unstable();
        if sorted != [0, 1, 2, 3] {
            return Err(BuilderError::Value(format!(
                "layer '{name}': {dim:?} is not a permutation of (0, 1, 2, 3)"
            )));
        }
        let layer = PermuteLayerParams {
            axis: dim.iter().map(|&a| a as u64).collect(),
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Permute(layer),
        ));
        Ok(())
    }

    pub fn add_reshape(
        &mut self,
        name: &str,
        input_name: &str,
        output_name: &str,
        target_shape: &[i64],
        mode: u32,
    ) -> Result<(), BuilderError> {
        let order = match mode {
            0 => ReshapeOrder::ChannelFirst,
            1 => ReshapeOrder::ChannelLast,
            other => return Err(unsupported_mode(name, other)),
        };
        let mut layer = ReshapeLayerParams {
            target_shape: target_shape.to_vec(),
            ..Default::default()
        };
        layer.set_mode(order);
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Reshape(layer),
        ));
        Ok(())
    }

    pub fn add_flatten(
        &mut self,
        name: &str,
        mode: u32,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        let order = match mode {
            0 => FlattenOrder::ChannelFirst,
            1 => FlattenOrder::ChannelLast,
            other => return Err(unsupported_mode(name, other)),
        };
        let mut layer = FlattenLayerParams::default();
        layer.set_mode(order);
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Flatten(layer),
        ));
        Ok(())
    }
}
