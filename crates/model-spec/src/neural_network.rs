// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Network bodies, layer records and per-kind parameter messages.
//!
//! A [`NeuralNetworkLayer`] carries its name, its input and output blob
//! names and exactly one [`LayerParams`] variant. Numeric payloads are always
//! [`WeightParams`]: a flat, packed sequence of `f32` in the element order
//! fixed by the layer kind (for example `(Cout, Cin, H, W)` for convolution
//! kernels).
//!
//! Field numbers are part of the on-disk format and must never change.

use crate::feature_types::{Int64Vector, StringVector};

// ── Shared payloads ────────────────────────────────────────────────

/// A flat tensor payload.
#[derive(Clone, PartialEq, prost::Message)]
pub struct WeightParams {
    #[prost(float, repeated, tag = "1")]
    pub float_value: Vec<f32>,
}

impl WeightParams {
    /// Wraps an already-flattened element sequence.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            float_value: values.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.float_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.float_value.is_empty()
    }
}

/// Count of elements held by an optional payload.
fn count(w: &Option<WeightParams>) -> usize {
    w.as_ref().map_or(0, WeightParams::len)
}

// ── Network bodies ─────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct NeuralNetwork {
    #[prost(message, repeated, tag = "1")]
    pub layers: Vec<NeuralNetworkLayer>,
    #[prost(message, repeated, tag = "2")]
    pub preprocessing: Vec<NeuralNetworkPreprocessing>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NeuralNetworkRegressor {
    #[prost(message, repeated, tag = "1")]
    pub layers: Vec<NeuralNetworkLayer>,
    #[prost(message, repeated, tag = "2")]
    pub preprocessing: Vec<NeuralNetworkPreprocessing>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NeuralNetworkClassifier {
    #[prost(message, repeated, tag = "1")]
    pub layers: Vec<NeuralNetworkLayer>,
    #[prost(message, repeated, tag = "2")]
    pub preprocessing: Vec<NeuralNetworkPreprocessing>,
    #[prost(oneof = "ClassLabels", tags = "100, 101")]
    pub class_labels: Option<ClassLabels>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ClassLabels {
    #[prost(message, tag = "100")]
    StringClassLabels(StringVector),
    #[prost(message, tag = "101")]
    Int64ClassLabels(Int64Vector),
}

impl ClassLabels {
    pub fn len(&self) -> usize {
        match self {
            Self::StringClassLabels(v) => v.vector.len(),
            Self::Int64ClassLabels(v) => v.vector.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Pre-processing ─────────────────────────────────────────────────

/// Pre-processing applied to one image input before the first layer.
#[derive(Clone, PartialEq, prost::Message)]
pub struct NeuralNetworkPreprocessing {
    #[prost(string, tag = "1")]
    pub feature_name: String,
    #[prost(oneof = "Preprocessor", tags = "10, 11")]
    pub preprocessor: Option<Preprocessor>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum Preprocessor {
    #[prost(message, tag = "10")]
    Scaler(NeuralNetworkImageScaler),
    #[prost(message, tag = "11")]
    MeanImage(NeuralNetworkMeanImage),
}

/// `y = channel_scale * x + bias` per channel.
#[derive(Clone, PartialEq, prost::Message)]
pub struct NeuralNetworkImageScaler {
    #[prost(float, tag = "10")]
    pub channel_scale: f32,
    #[prost(float, tag = "20")]
    pub blue_bias: f32,
    #[prost(float, tag = "21")]
    pub green_bias: f32,
    #[prost(float, tag = "22")]
    pub red_bias: f32,
    #[prost(float, tag = "30")]
    pub gray_bias: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NeuralNetworkMeanImage {
    #[prost(float, repeated, tag = "1")]
    pub mean_image: Vec<f32>,
}

// ── Activations ────────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationLinear {
    #[prost(float, tag = "1")]
    pub alpha: f32,
    #[prost(float, tag = "2")]
    pub beta: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationRelu {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationLeakyRelu {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationThresholdedRelu {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationPrelu {
    #[prost(message, optional, tag = "1")]
    pub alpha: Option<WeightParams>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationTanh {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationScaledTanh {
    #[prost(float, tag = "1")]
    pub alpha: f32,
    #[prost(float, tag = "2")]
    pub beta: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationSigmoid {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationSigmoidHard {
    #[prost(float, tag = "1")]
    pub alpha: f32,
    #[prost(float, tag = "2")]
    pub beta: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationElu {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationSoftsign {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationSoftplus {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationParametricSoftplus {
    #[prost(message, optional, tag = "1")]
    pub alpha: Option<WeightParams>,
    #[prost(message, optional, tag = "2")]
    pub beta: Option<WeightParams>,
}

/// One nonlinearity with its parameters.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActivationParams {
    #[prost(oneof = "Nonlinearity", tags = "5, 10, 15, 20, 25, 30, 31, 40, 41, 50, 60, 70, 71")]
    pub nonlinearity: Option<Nonlinearity>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum Nonlinearity {
    #[prost(message, tag = "5")]
    Linear(ActivationLinear),
    #[prost(message, tag = "10")]
    Relu(ActivationRelu),
    #[prost(message, tag = "15")]
    LeakyRelu(ActivationLeakyRelu),
    #[prost(message, tag = "20")]
    ThresholdedRelu(ActivationThresholdedRelu),
    #[prost(message, tag = "25")]
    Prelu(ActivationPrelu),
    #[prost(message, tag = "30")]
    Tanh(ActivationTanh),
    #[prost(message, tag = "31")]
    ScaledTanh(ActivationScaledTanh),
    #[prost(message, tag = "40")]
    Sigmoid(ActivationSigmoid),
    #[prost(message, tag = "41")]
    SigmoidHard(ActivationSigmoidHard),
    #[prost(message, tag = "50")]
    Elu(ActivationElu),
    #[prost(message, tag = "60")]
    Softsign(ActivationSoftsign),
    #[prost(message, tag = "70")]
    Softplus(ActivationSoftplus),
    #[prost(message, tag = "71")]
    ParametricSoftplus(ActivationParametricSoftplus),
}

impl ActivationParams {
    pub fn new(nonlinearity: Nonlinearity) -> Self {
        Self {
            nonlinearity: Some(nonlinearity),
        }
    }

    /// Elements held in vector-valued parameters (PReLU, parametric softplus).
    pub fn weight_count(&self) -> usize {
        match &self.nonlinearity {
            Some(Nonlinearity::Prelu(p)) => count(&p.alpha),
            Some(Nonlinearity::ParametricSoftplus(p)) => count(&p.alpha) + count(&p.beta),
            _ => 0,
        }
    }
}

// ── Padding helpers ────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct EdgeSizes {
    #[prost(uint64, tag = "1")]
    pub start_edge_size: u64,
    #[prost(uint64, tag = "2")]
    pub end_edge_size: u64,
}

/// Per-axis `(start, end)` amounts, height first.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BorderAmounts {
    #[prost(message, repeated, tag = "10")]
    pub border_amounts: Vec<EdgeSizes>,
}

impl BorderAmounts {
    /// Height edges `(top, bottom)` then width edges `(left, right)`.
    pub fn from_edges(top: u64, bottom: u64, left: u64, right: u64) -> Self {
        Self {
            border_amounts: vec![
                EdgeSizes {
                    start_edge_size: top,
                    end_edge_size: bottom,
                },
                EdgeSizes {
                    start_edge_size: left,
                    end_edge_size: right,
                },
            ],
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ValidPadding {
    #[prost(message, optional, tag = "1")]
    pub padding_amounts: Option<BorderAmounts>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum SamePaddingMode {
    BottomRightHeavy = 0,
    TopLeftHeavy = 1,
}

impl SamePaddingMode {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::BottomRightHeavy => "BOTTOM_RIGHT_HEAVY",
            Self::TopLeftHeavy => "TOP_LEFT_HEAVY",
        }
    }

    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "BOTTOM_RIGHT_HEAVY" => Some(Self::BottomRightHeavy),
            "TOP_LEFT_HEAVY" => Some(Self::TopLeftHeavy),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SamePadding {
    #[prost(enumeration = "SamePaddingMode", tag = "1")]
    pub asymmetry_mode: i32,
}

// ── Convolution & pooling ──────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConvolutionLayerParams {
    #[prost(uint64, tag = "1")]
    pub output_channels: u64,
    #[prost(uint64, tag = "2")]
    pub kernel_channels: u64,
    #[prost(uint64, tag = "10")]
    pub n_groups: u64,
    #[prost(uint64, repeated, tag = "20")]
    pub kernel_size: Vec<u64>,
    #[prost(uint64, repeated, tag = "30")]
    pub stride: Vec<u64>,
    #[prost(uint64, repeated, tag = "40")]
    pub dilation_factor: Vec<u64>,
    #[prost(oneof = "ConvolutionPadding", tags = "50, 51")]
    pub convolution_padding_type: Option<ConvolutionPadding>,
    #[prost(bool, tag = "60")]
    pub is_deconvolution: bool,
    #[prost(bool, tag = "70")]
    pub has_bias: bool,
    #[prost(message, optional, tag = "90")]
    pub weights: Option<WeightParams>,
    #[prost(message, optional, tag = "91")]
    pub bias: Option<WeightParams>,
    #[prost(uint64, repeated, tag = "100")]
    pub output_shape: Vec<u64>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ConvolutionPadding {
    #[prost(message, tag = "50")]
    Valid(ValidPadding),
    #[prost(message, tag = "51")]
    Same(SamePadding),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PoolingType {
    Max = 0,
    Average = 1,
    L2 = 2,
}

impl PoolingType {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Max => "MAX",
            Self::Average => "AVERAGE",
            Self::L2 => "L2",
        }
    }

    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "MAX" => Some(Self::Max),
            "AVERAGE" => Some(Self::Average),
            "L2" => Some(Self::L2),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PoolingLayerParams {
    #[prost(enumeration = "PoolingType", tag = "1")]
    pub r#type: i32,
    #[prost(uint64, repeated, tag = "10")]
    pub kernel_size: Vec<u64>,
    #[prost(uint64, repeated, tag = "20")]
    pub stride: Vec<u64>,
    #[prost(oneof = "PoolingPadding", tags = "30, 31")]
    pub pooling_padding_type: Option<PoolingPadding>,
    #[prost(bool, tag = "50")]
    pub avg_pool_exclude_padding: bool,
    #[prost(bool, tag = "60")]
    pub global_pooling: bool,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum PoolingPadding {
    #[prost(message, tag = "30")]
    Valid(ValidPadding),
    #[prost(message, tag = "31")]
    Same(SamePadding),
}

// ── Spatial layers ─────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct PaddingConstant {
    #[prost(float, tag = "1")]
    pub value: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PaddingReflection {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PaddingReplication {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PaddingLayerParams {
    #[prost(oneof = "PaddingKind", tags = "1, 2, 3")]
    pub padding_type: Option<PaddingKind>,
    #[prost(message, optional, tag = "10")]
    pub padding_amounts: Option<BorderAmounts>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum PaddingKind {
    #[prost(message, tag = "1")]
    Constant(PaddingConstant),
    #[prost(message, tag = "2")]
    Reflection(PaddingReflection),
    #[prost(message, tag = "3")]
    Replication(PaddingReplication),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CropLayerParams {
    #[prost(message, optional, tag = "1")]
    pub crop_amounts: Option<BorderAmounts>,
    #[prost(uint64, repeated, tag = "5")]
    pub offset: Vec<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum InterpolationMode {
    Nn = 0,
    Bilinear = 1,
}

impl InterpolationMode {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Nn => "NN",
            Self::Bilinear => "BILINEAR",
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpsampleLayerParams {
    #[prost(uint64, repeated, tag = "1")]
    pub scaling_factor: Vec<u64>,
    #[prost(enumeration = "InterpolationMode", tag = "5")]
    pub mode: i32,
}

// ── Dense layers ───────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct InnerProductLayerParams {
    #[prost(uint64, tag = "1")]
    pub input_channels: u64,
    #[prost(uint64, tag = "2")]
    pub output_channels: u64,
    #[prost(bool, tag = "10")]
    pub has_bias: bool,
    #[prost(message, optional, tag = "20")]
    pub weights: Option<WeightParams>,
    #[prost(message, optional, tag = "21")]
    pub bias: Option<WeightParams>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EmbeddingLayerParams {
    #[prost(uint64, tag = "1")]
    pub input_dim: u64,
    #[prost(uint64, tag = "2")]
    pub output_channels: u64,
    #[prost(bool, tag = "10")]
    pub has_bias: bool,
    #[prost(message, optional, tag = "20")]
    pub weights: Option<WeightParams>,
    #[prost(message, optional, tag = "21")]
    pub bias: Option<WeightParams>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BatchnormLayerParams {
    #[prost(uint64, tag = "1")]
    pub channels: u64,
    #[prost(bool, tag = "5")]
    pub compute_mean_var: bool,
    #[prost(bool, tag = "6")]
    pub instance_normalization: bool,
    #[prost(float, tag = "10")]
    pub epsilon: f32,
    #[prost(message, optional, tag = "15")]
    pub gamma: Option<WeightParams>,
    #[prost(message, optional, tag = "16")]
    pub beta: Option<WeightParams>,
    #[prost(message, optional, tag = "17")]
    pub mean: Option<WeightParams>,
    #[prost(message, optional, tag = "18")]
    pub variance: Option<WeightParams>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SoftmaxLayerParams {}

// ── Elementwise ────────────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct AddLayerParams {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MultiplyLayerParams {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AverageLayerParams {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MaxLayerParams {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DotProductLayerParams {
    #[prost(bool, tag = "1")]
    pub cosine_similarity: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConcatLayerParams {
    #[prost(bool, tag = "100")]
    pub sequence_concat: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SequenceRepeatLayerParams {
    #[prost(uint64, tag = "1")]
    pub n_repetitions: u64,
}

// ── Shape layers ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum FlattenOrder {
    ChannelFirst = 0,
    ChannelLast = 1,
}

impl FlattenOrder {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::ChannelFirst => "CHANNEL_FIRST",
            Self::ChannelLast => "CHANNEL_LAST",
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FlattenLayerParams {
    #[prost(enumeration = "FlattenOrder", tag = "1")]
    pub mode: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ReshapeOrder {
    ChannelFirst = 0,
    ChannelLast = 1,
}

impl ReshapeOrder {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::ChannelFirst => "CHANNEL_FIRST",
            Self::ChannelLast => "CHANNEL_LAST",
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReshapeLayerParams {
    #[prost(int64, repeated, tag = "1")]
    pub target_shape: Vec<i64>,
    #[prost(enumeration = "ReshapeOrder", tag = "2")]
    pub mode: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PermuteLayerParams {
    #[prost(uint64, repeated, tag = "1")]
    pub axis: Vec<u64>,
}

// ── Recurrent layers ───────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct SimpleRecurrentLayerParams {
    #[prost(uint64, tag = "1")]
    pub input_vector_size: u64,
    #[prost(uint64, tag = "2")]
    pub output_vector_size: u64,
    #[prost(message, optional, tag = "10")]
    pub activation: Option<ActivationParams>,
    #[prost(bool, tag = "15")]
    pub sequence_output: bool,
    #[prost(bool, tag = "20")]
    pub has_bias_vector: bool,
    #[prost(message, optional, tag = "30")]
    pub weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "31")]
    pub recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "32")]
    pub bias_vector: Option<WeightParams>,
    #[prost(bool, tag = "100")]
    pub reverse_input: bool,
}

/// Gated recurrent unit. Activations are `[gate, candidate]`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GruLayerParams {
    #[prost(uint64, tag = "1")]
    pub input_vector_size: u64,
    #[prost(uint64, tag = "2")]
    pub output_vector_size: u64,
    #[prost(message, repeated, tag = "10")]
    pub activations: Vec<ActivationParams>,
    #[prost(bool, tag = "15")]
    pub sequence_output: bool,
    #[prost(bool, tag = "20")]
    pub has_bias_vectors: bool,
    #[prost(message, optional, tag = "30")]
    pub update_gate_weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "31")]
    pub reset_gate_weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "32")]
    pub output_gate_weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "50")]
    pub update_gate_recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "51")]
    pub reset_gate_recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "52")]
    pub output_gate_recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "70")]
    pub update_gate_bias_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "71")]
    pub reset_gate_bias_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "72")]
    pub output_gate_bias_vector: Option<WeightParams>,
    #[prost(bool, tag = "100")]
    pub reverse_input: bool,
}

/// Cell configuration shared by both LSTM layouts.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LstmParams {
    #[prost(bool, tag = "10")]
    pub sequence_output: bool,
    #[prost(bool, tag = "20")]
    pub has_bias_vectors: bool,
    #[prost(bool, tag = "30")]
    pub forget_bias: bool,
    #[prost(bool, tag = "40")]
    pub has_peephole_vectors: bool,
    #[prost(bool, tag = "50")]
    pub coupled_input_and_forget_gate: bool,
    #[prost(float, tag = "60")]
    pub cell_clip_threshold: f32,
}

/// Per-gate matrices and vectors for one LSTM direction.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LstmWeightParams {
    #[prost(message, optional, tag = "1")]
    pub input_gate_weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "2")]
    pub forget_gate_weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "3")]
    pub block_input_weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "4")]
    pub output_gate_weight_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "20")]
    pub input_gate_recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "21")]
    pub forget_gate_recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "22")]
    pub block_input_recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "23")]
    pub output_gate_recursion_matrix: Option<WeightParams>,
    #[prost(message, optional, tag = "40")]
    pub input_gate_bias_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "41")]
    pub forget_gate_bias_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "42")]
    pub block_input_bias_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "43")]
    pub output_gate_bias_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "60")]
    pub input_gate_peephole_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "61")]
    pub forget_gate_peephole_vector: Option<WeightParams>,
    #[prost(message, optional, tag = "62")]
    pub output_gate_peephole_vector: Option<WeightParams>,
}

impl LstmWeightParams {
    pub fn weight_count(&self) -> usize {
        [
            &self.input_gate_weight_matrix,
            &self.forget_gate_weight_matrix,
            &self.block_input_weight_matrix,
            &self.output_gate_weight_matrix,
            &self.input_gate_recursion_matrix,
            &self.forget_gate_recursion_matrix,
            &self.block_input_recursion_matrix,
            &self.output_gate_recursion_matrix,
            &self.input_gate_bias_vector,
            &self.forget_gate_bias_vector,
            &self.block_input_bias_vector,
            &self.output_gate_bias_vector,
            &self.input_gate_peephole_vector,
            &self.forget_gate_peephole_vector,
            &self.output_gate_peephole_vector,
        ]
        .into_iter()
        .map(count)
        .sum()
    }
}

/// Activations are `[gate, cell, output]`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct UniDirectionalLstmLayerParams {
    #[prost(uint64, tag = "1")]
    pub input_vector_size: u64,
    #[prost(uint64, tag = "2")]
    pub output_vector_size: u64,
    #[prost(message, repeated, tag = "10")]
    pub activations: Vec<ActivationParams>,
    #[prost(message, optional, tag = "15")]
    pub params: Option<LstmParams>,
    #[prost(message, optional, tag = "20")]
    pub weight_params: Option<LstmWeightParams>,
    #[prost(bool, tag = "100")]
    pub reverse_input: bool,
}

/// `weight_params` holds the forward direction first, then the backward one.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BiDirectionalLstmLayerParams {
    #[prost(uint64, tag = "1")]
    pub input_vector_size: u64,
    #[prost(uint64, tag = "2")]
    pub output_vector_size: u64,
    #[prost(message, repeated, tag = "10")]
    pub activations_forward_lstm: Vec<ActivationParams>,
    #[prost(message, repeated, tag = "11")]
    pub activations_backward_lstm: Vec<ActivationParams>,
    #[prost(message, optional, tag = "15")]
    pub params: Option<LstmParams>,
    #[prost(message, repeated, tag = "20")]
    pub weight_params: Vec<LstmWeightParams>,
}

// ── Layer record ───────────────────────────────────────────────────

/// A single layer: name, blob edges and one parameter variant.
#[derive(Clone, PartialEq, prost::Message)]
pub struct NeuralNetworkLayer {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, repeated, tag = "2")]
    pub input: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub output: Vec<String>,
    #[prost(
        oneof = "LayerParams",
        tags = "100, 120, 130, 140, 150, 160, 175, 190, 200, 210, 230, 231, 240, 260, 270, 300, 301, 310, 320, 340, 400, 410, 420, 430"
    )]
    pub layer: Option<LayerParams>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum LayerParams {
    #[prost(message, tag = "100")]
    Convolution(ConvolutionLayerParams),
    #[prost(message, tag = "120")]
    Pooling(PoolingLayerParams),
    #[prost(message, tag = "130")]
    Activation(ActivationParams),
    #[prost(message, tag = "140")]
    InnerProduct(InnerProductLayerParams),
    #[prost(message, tag = "150")]
    Embedding(EmbeddingLayerParams),
    #[prost(message, tag = "160")]
    Batchnorm(BatchnormLayerParams),
    #[prost(message, tag = "175")]
    Softmax(SoftmaxLayerParams),
    #[prost(message, tag = "190")]
    Crop(CropLayerParams),
    #[prost(message, tag = "200")]
    Padding(PaddingLayerParams),
    #[prost(message, tag = "210")]
    Upsample(UpsampleLayerParams),
    #[prost(message, tag = "230")]
    Add(AddLayerParams),
    #[prost(message, tag = "231")]
    Multiply(MultiplyLayerParams),
    #[prost(message, tag = "240")]
    Average(AverageLayerParams),
    #[prost(message, tag = "260")]
    Max(MaxLayerParams),
    #[prost(message, tag = "270")]
    Dot(DotProductLayerParams),
    #[prost(message, tag = "300")]
    Reshape(ReshapeLayerParams),
    #[prost(message, tag = "301")]
    Flatten(FlattenLayerParams),
    #[prost(message, tag = "310")]
    Permute(PermuteLayerParams),
    #[prost(message, tag = "320")]
    Concat(ConcatLayerParams),
    #[prost(message, tag = "340")]
    SequenceRepeat(SequenceRepeatLayerParams),
    #[prost(message, tag = "400")]
    SimpleRecurrent(SimpleRecurrentLayerParams),
    #[prost(message, tag = "410")]
    Gru(GruLayerParams),
    #[prost(message, tag = "420")]
    UniDirectionalLstm(UniDirectionalLstmLayerParams),
    #[prost(message, tag = "430")]
    BiDirectionalLstm(BiDirectionalLstmLayerParams),
}

impl LayerParams {
    /// Schema name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Convolution(_) => "convolution",
            Self::Pooling(_) => "pooling",
            Self::Activation(_) => "activation",
            Self::InnerProduct(_) => "innerProduct",
            Self::Embedding(_) => "embedding",
            Self::Batchnorm(_) => "batchnorm",
            Self::Softmax(_) => "softmax",
            Self::Crop(_) => "crop",
            Self::Padding(_) => "padding",
            Self::Upsample(_) => "upsample",
            Self::Add(_) => "add",
            Self::Multiply(_) => "multiply",
            Self::Average(_) => "average",
            Self::Max(_) => "max",
            Self::Dot(_) => "dot",
            Self::Reshape(_) => "reshape",
            Self::Flatten(_) => "flatten",
            Self::Permute(_) => "permute",
            Self::Concat(_) => "concat",
            Self::SequenceRepeat(_) => "sequenceRepeat",
            Self::SimpleRecurrent(_) => "simpleRecurrent",
            Self::Gru(_) => "gru",
            Self::UniDirectionalLstm(_) => "uniDirectionalLSTM",
            Self::BiDirectionalLstm(_) => "biDirectionalLSTM",
        }
    }

    /// Total number of `f32` elements embedded in the layer's payloads.
    pub fn weight_count(&self) -> usize {
        match self {
            Self::Convolution(p) => count(&p.weights) + count(&p.bias),
            Self::InnerProduct(p) => count(&p.weights) + count(&p.bias),
            Self::Embedding(p) => count(&p.weights) + count(&p.bias),
            Self::Activation(p) => p.weight_count(),
            Self::Batchnorm(p) => {
                count(&p.gamma) + count(&p.beta) + count(&p.mean) + count(&p.variance)
            }
            Self::SimpleRecurrent(p) => {
                count(&p.weight_matrix) + count(&p.recursion_matrix) + count(&p.bias_vector)
            }
            Self::Gru(p) => [
                &p.update_gate_weight_matrix,
                &p.reset_gate_weight_matrix,
                &p.output_gate_weight_matrix,
                &p.update_gate_recursion_matrix,
                &p.reset_gate_recursion_matrix,
                &p.output_gate_recursion_matrix,
                &p.update_gate_bias_vector,
                &p.reset_gate_bias_vector,
                &p.output_gate_bias_vector,
            ]
            .into_iter()
            .map(count)
            .sum(),
            Self::UniDirectionalLstm(p) => p
                .weight_params
                .as_ref()
                .map_or(0, LstmWeightParams::weight_count),
            Self::BiDirectionalLstm(p) => {
                p.weight_params.iter().map(LstmWeightParams::weight_count).sum()
            }
            _ => 0,
        }
    }
}

impl NeuralNetworkLayer {
    /// Creates a layer record, copying the blob names verbatim.
    pub fn new(
        name: impl Into<String>,
        input: &[&str],
        output: &[&str],
        params: LayerParams,
    ) -> Self {
        Self {
            name: name.into(),
            input: input.iter().map(|s| (*s).to_owned()).collect(),
            output: output.iter().map(|s| (*s).to_owned()).collect(),
            layer: Some(params),
        }
    }

    /// Schema name of the populated variant, or `"unset"`.
    pub fn kind_name(&self) -> &'static str {
        self.layer.as_ref().map_or("unset", LayerParams::kind_name)
    }
}
