// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense, normalisation and parameter-free layers.

use super::{check_len, flat};
use crate::activation::{encode_activation, NonLinearity};
use crate::{BuilderError, NeuralNetworkBuilder};
use model_spec::neural_network::{
    BatchnormLayerParams, EmbeddingLayerParams, InnerProductLayerParams, InterpolationMode,
    SequenceRepeatLayerParams, SoftmaxLayerParams, UpsampleLayerParams,
};
use model_spec::{LayerParams, NeuralNetworkLayer};
use tensor_core::Tensor;

/// Parameters shared by inner-product and embedding layers.
///
/// `weights` must hold `input_channels * output_channels` values and is
/// embedded row-major as given. A `bias`, if present, must hold
/// `output_channels` values.
#[derive(Debug, Clone, Copy)]
pub struct DenseParams<'a> {
    pub input_channels: usize,
    pub output_channels: usize,
    pub weights: &'a Tensor,
    pub bias: Option<&'a Tensor>,
}

impl<'a> DenseParams<'a> {
    pub fn new(
        input_channels: usize,
        output_channels: usize,
        weights: &'a Tensor,
        bias: Option<&'a Tensor>,
    ) -> Self {
        Self {
            input_channels,
            output_channels,
            weights,
            bias,
        }
    }

    fn check(&self, layer: &str) -> Result<(), BuilderError> {
        check_len(
            layer,
            "weights",
            self.weights,
            self.input_channels * self.output_channels,
        )?;
        if let Some(bias) = self.bias {
            check_len(layer, "bias", bias, self.output_channels)?;
        }
        Ok(())
    }
}

/// Batch-normalisation statistics, one value per channel.
#[derive(Debug, Clone, Copy)]
pub struct BatchnormParams<'a> {
    pub channels: usize,
    pub gamma: &'a Tensor,
    pub beta: &'a Tensor,
    pub mean: &'a Tensor,
    pub variance: &'a Tensor,
    /// Falls back to [`BuilderConfig::batchnorm_epsilon`](crate::BuilderConfig::batchnorm_epsilon).
    pub epsilon: Option<f32>,
    pub compute_mean_var: bool,
    pub instance_normalization: bool,
}

impl NeuralNetworkBuilder {
    /// Adds a fully connected layer.
    ///
    /// # Errors
    /// [`BuilderError::Shape`] if the weight or bias element count is wrong.
    pub fn add_inner_product(
        &mut self,
        name: &str,
        params: DenseParams<'_>,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        params.check(name)?;
        let layer = InnerProductLayerParams {
            input_channels: params.input_channels as u64,
            output_channels: params.output_channels as u64,
            has_bias: params.bias.is_some(),
            weights: Some(flat(params.weights)),
            bias: params.bias.map(flat),
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::InnerProduct(layer),
        ));
        Ok(())
    }

    /// Adds an embedding lookup; `input_channels` is the vocabulary size.
    pub fn add_embedding(
        &mut self,
        name: &str,
        params: DenseParams<'_>,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        params.check(name)?;
        let layer = EmbeddingLayerParams {
            input_dim: params.input_channels as u64,
            output_channels: params.output_channels as u64,
            has_bias: params.bias.is_some(),
            weights: Some(flat(params.weights)),
            bias: params.bias.map(flat),
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Embedding(layer),
        ));
        Ok(())
    }

    pub fn add_softmax(
        &mut self,
        name: &str,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Softmax(SoftmaxLayerParams {}),
        ));
        Ok(())
    }

    /// Adds an activation layer. See [`encode_activation`] for the
    /// parameters each nonlinearity takes.
    pub fn add_activation(
        &mut self,
        name: &str,
        non_linearity: NonLinearity,
        input_name: &str,
        output_name: &str,
        params: &[&[f32]],
    ) -> Result<(), BuilderError> {
        let activation = encode_activation(non_linearity, params)?;
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Activation(activation),
        ));
        Ok(())
    }

    /// Adds a nearest-neighbour upsampling layer.
    ///
    /// # Errors
    /// [`BuilderError::Value`] if either factor is zero.
    pub fn add_upsample(
        &mut self,
        name: &str,
        scaling_factor_h: u64,
        scaling_factor_w: u64,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        if scaling_factor_h == 0 || scaling_factor_w == 0 {
            return Err(BuilderError::Value(format!(
                "layer '{name}': scaling factors must be positive, got ({scaling_factor_h}, {scaling_factor_w})"
            )));
        }
        let mut layer = UpsampleLayerParams {
            scaling_factor: vec![scaling_factor_h, scaling_factor_w],
            ..Default::default()
        };
        layer.set_mode(InterpolationMode::Nn);
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Upsample(layer),
        ));
        Ok(())
    }

    /// Adds a sequence-repeat layer.
    pub fn add_sequence_repeat(
        &mut self,
        name: &str,
        n_repetitions: u64,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        if n_repetitions == 0 {
            return Err(BuilderError::Value(format!(
                "layer '{name}': repetition count must be positive"
            )));
        }
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::SequenceRepeat(SequenceRepeatLayerParams { n_repetitions }),
        ));
        Ok(())
    }

    /// Adds a batch-normalisation layer.
    ///
    /// # Errors
    /// [`BuilderError::Shape`] if any statistics vector does not hold
    /// `channels` values.
    pub fn add_batchnorm(
        &mut self,
        name: &str,
        params: BatchnormParams<'_>,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        for (what, tensor) in [
            ("gamma", params.gamma),
            ("beta", params.beta),
            ("mean", params.mean),
            ("variance", params.variance),
        ] {
            check_len(name, what, tensor, params.channels)?;
        }
        let layer = BatchnormLayerParams {
            channels: params.channels as u64,
            compute_mean_var: params.compute_mean_var,
            instance_normalization: params.instance_normalization,
            epsilon: params.epsilon.unwrap_or(self.config().batchnorm_epsilon),
            gamma: Some(flat(params.gamma)),
            beta: Some(flat(params.beta)),
            mean: Some(flat(params.mean)),
            variance: Some(flat(params.variance)),
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Batchnorm(layer),
        ));
        Ok(())
    }

    /// Dropout is an identity at inference time; nothing is added.
    pub fn add_dropout(&mut self, name: &str, input_name: &str, output_name: &str) {
        tracing::debug!("dropout '{name}' ({input_name} -> {output_name}) skipped");
    }
}
