// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Spatial layers: convolution, pooling, padding and cropping.
//!
//! # Kernel layout
//!
//! Callers pass convolution kernels as `(height, width, kernel_channels,
//! output_channels)`. The document stores them as
//! `(output_channels, kernel_channels, height, width)` for convolution and
//! `(kernel_channels, output_channels, height, width)` for deconvolution.

use super::{check_len, flat};
use crate::{BuilderError, NeuralNetworkBuilder};
use model_spec::neural_network::{
    BorderAmounts, ConvolutionLayerParams, ConvolutionPadding, CropLayerParams, PaddingConstant,
    PaddingKind, PaddingLayerParams, PoolingLayerParams, PoolingPadding, PoolingType, SamePadding,
    SamePaddingMode, ValidPadding,
};
use model_spec::{LayerParams, NeuralNetworkLayer, WeightParams};
use std::fmt;
use std::str::FromStr;
use tensor_core::{permute, Tensor};

const CONV_AXES: [usize; 4] = [3, 2, 0, 1];
const DECONV_AXES: [usize; 4] = [2, 3, 0, 1];

/// Border handling for convolution and pooling windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// No padding; windows stay inside the input.
    #[default]
    Valid,
    /// Pad so the output keeps the input's spatial size, extra padding at
    /// the bottom and right.
    Same,
}

impl BorderMode {
    fn valid_padding() -> ValidPadding {
        ValidPadding {
            padding_amounts: Some(BorderAmounts::from_edges(0, 0, 0, 0)),
        }
    }

    fn same_padding() -> SamePadding {
        let mut same = SamePadding::default();
        same.set_asymmetry_mode(SamePaddingMode::BottomRightHeavy);
        same
    }

    fn convolution(self) -> ConvolutionPadding {
        match self {
            Self::Valid => ConvolutionPadding::Valid(Self::valid_padding()),
            Self::Same => ConvolutionPadding::Same(Self::same_padding()),
        }
    }

    fn pooling(self) -> PoolingPadding {
        match self {
            Self::Valid => PoolingPadding::Valid(Self::valid_padding()),
            Self::Same => PoolingPadding::Same(Self::same_padding()),
        }
    }
}

impl FromStr for BorderMode {
    type Err = BuilderError;

    /// Accepts `valid` and `same` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "valid" => Ok(Self::Valid),
            "same" => Ok(Self::Same),
            _ => Err(BuilderError::NotImplemented(format!(
                "border mode '{s}' is not supported; expected 'valid' or 'same'"
            ))),
        }
    }
}

impl fmt::Display for BorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "valid",
            Self::Same => "same",
        })
    }
}

/// Parses `MAX`, `AVERAGE` or `L2`.
///
/// # Errors
/// [`BuilderError::NotImplemented`] for anything else.
pub fn parse_pooling_type(name: &str) -> Result<PoolingType, BuilderError> {
    PoolingType::from_str_name(name).ok_or_else(|| {
        BuilderError::NotImplemented(format!(
            "pooling type '{name}' is not supported; expected MAX, AVERAGE or L2"
        ))
    })
}

/// Edge amounts for padding and cropping layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Borders {
    pub left: u64,
    pub right: u64,
    pub top: u64,
    pub bottom: u64,
}

impl From<Borders> for BorderAmounts {
    fn from(b: Borders) -> Self {
        BorderAmounts::from_edges(b.top, b.bottom, b.left, b.right)
    }
}

/// Convolution or deconvolution parameters.
#[derive(Debug, Clone, Copy)]
pub struct ConvolutionParams<'a> {
    pub kernel_channels: usize,
    pub output_channels: usize,
    pub height: usize,
    pub width: usize,
    pub stride_height: u64,
    pub stride_width: u64,
    pub border_mode: BorderMode,
    pub groups: u64,
    /// Shape `(height, width, kernel_channels, output_channels)`.
    pub weights: &'a Tensor,
    pub bias: Option<&'a Tensor>,
    pub is_deconv: bool,
    /// Output spatial size `(height, width)`; only recorded for deconvolution.
    pub output_shape: Option<(u64, u64)>,
}

/// Pooling window parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolingParams {
    pub height: u64,
    pub width: u64,
    pub stride_height: u64,
    pub stride_width: u64,
    pub layer_type: PoolingType,
    pub padding_type: BorderMode,
    pub exclude_pad_area: bool,
    pub is_global: bool,
}

impl NeuralNetworkBuilder {
    /// Adds a convolution or deconvolution layer.
    ///
    /// # Errors
    /// - [`BuilderError::Value`] if `groups` is zero.
    /// - [`BuilderError::Shape`] if the kernel shape or bias length is wrong.
    pub fn add_convolution(
        &mut self,
        name: &str,
        params: ConvolutionParams<'_>,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        if params.groups == 0 {
            return Err(BuilderError::Value(format!(
                "layer '{name}': group count must be positive"
            )));
        }
        let expected = [
            params.height,
            params.width,
            params.kernel_channels,
            params.output_channels,
        ];
        if params.weights.shape().dims() != expected {
            return Err(BuilderError::Shape(format!(
                "layer '{name}': kernel shape {} does not match (height, width, kernel_channels, output_channels) = {expected:?}",
                params.weights.shape()
            )));
        }
        if let Some(bias) = params.bias {
            check_len(name, "bias", bias, params.output_channels)?;
        }

        let axes = if params.is_deconv {
            &DECONV_AXES
        } else {
            &CONV_AXES
        };
        let kernel = permute(&params.weights.view(), axes).map_err(BuilderError::tensor(name))?;

        let output_shape = match params.output_shape {
            Some((h, w)) if params.is_deconv => vec![h, w],
            Some(_) => {
                tracing::warn!("layer '{name}': output shape ignored for a forward convolution");
                Vec::new()
            }
            None => Vec::new(),
        };

        let layer = ConvolutionLayerParams {
            output_channels: params.output_channels as u64,
            kernel_channels: params.kernel_channels as u64,
            n_groups: params.groups,
            kernel_size: vec![params.height as u64, params.width as u64],
            stride: vec![params.stride_height, params.stride_width],
            dilation_factor: Vec::new(),
            convolution_padding_type: Some(params.border_mode.convolution()),
            is_deconvolution: params.is_deconv,
            has_bias: params.bias.is_some(),
            weights: Some(WeightParams::new(kernel.into_vec())),
            bias: params.bias.map(flat),
            output_shape,
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Convolution(layer),
        ));
        Ok(())
    }

    pub fn add_pooling(
        &mut self,
        name: &str,
        params: PoolingParams,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        let mut layer = PoolingLayerParams {
            kernel_size: vec![params.height, params.width],
            stride: vec![params.stride_height, params.stride_width],
            pooling_padding_type: Some(params.padding_type.pooling()),
            avg_pool_exclude_padding: params.exclude_pad_area,
            global_pooling: params.is_global,
            ..Default::default()
        };
        layer.set_type(params.layer_type);
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Pooling(layer),
        ));
        Ok(())
    }

    /// Adds a constant padding layer.
    pub fn add_padding(
        &mut self,
        name: &str,
        borders: Borders,
        value: f32,
        input_name: &str,
        output_name: &str,
    ) -> Result<(), BuilderError> {
        let layer = PaddingLayerParams {
            padding_type: Some(PaddingKind::Constant(PaddingConstant { value })),
            padding_amounts: Some(borders.into()),
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            &[input_name],
            &[output_name],
            LayerParams::Padding(layer),
        ));
        Ok(())
    }

    /// Adds a cropping layer.
    ///
    /// With one input the borders are cropped away. With two inputs the
    /// first is cropped to the size of the second, starting at `offset`
    /// `(row, column)`.
    ///
    /// # Errors
    /// [`BuilderError::Value`] for an input count other than 1 or 2, or an
    /// offset that is neither empty nor two values long.
    pub fn add_crop(
        &mut self,
        name: &str,
        borders: Borders,
        offset: &[u64],
        input_names: &[&str],
        output_name: &str,
    ) -> Result<(), BuilderError> {
        if !(1..=2).contains(&input_names.len()) {
            return Err(BuilderError::Value(format!(
                "layer '{name}': crop takes 1 or 2 inputs, got {}",
                input_names.len()
            )));
        }
        if !offset.is_empty() && offset.len() != 2 {
            return Err(BuilderError::Value(format!(
                "layer '{name}': crop offset must have 0 or 2 values, got {}",
                offset.len()
            )));
        }
        let layer = CropLayerParams {
            crop_amounts: Some(borders.into()),
            offset: offset.to_vec(),
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            input_names,
            &[output_name],
            LayerParams::Crop(layer),
        ));
        Ok(())
    }
}
