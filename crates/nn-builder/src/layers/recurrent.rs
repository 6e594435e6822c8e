// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Recurrent layers: simple RNN, GRU, and uni- and bi-directional LSTM.
//!
//! # Gate stacking
//!
//! GRU and LSTM callers pass one weight tensor per role (`w_x` for input
//! weights, `w_h` for recursion weights) with the per-gate matrices stacked
//! along the second-to-last axis; bias and peephole vectors are stacked the
//! same way along their only axis. With hidden size `h`, gate `g` occupies
//! rows `[g * h, (g + 1) * h)`:
//!
//! | Layer | Weight / bias stack                       | Peephole stack          |
//! |-------|-------------------------------------------|-------------------------|
//! | GRU   | update, reset, output                     |                         |
//! | LSTM  | input, forget, output, block input        | input, forget, output   |
//!
//! Bias and peephole vectors are only written when at least one element is
//! non-zero.

use super::{check_len, flat, nonzero};
use crate::activation::{encode_recurrent_activation, NonLinearity};
use crate::{BuilderError, NeuralNetworkBuilder};
use model_spec::neural_network::{
    BiDirectionalLstmLayerParams, GruLayerParams, LstmParams, LstmWeightParams,
    SimpleRecurrentLayerParams, UniDirectionalLstmLayerParams,
};
use model_spec::{LayerParams, NeuralNetworkLayer, WeightParams};
use tensor_core::{split_blocks, Tensor, TensorError};

/// Splits a gate stack into `G` row blocks of `hidden` rows each.
///
/// `cols` is the expected trailing extent of a weight matrix; `None` treats
/// the tensor as a flat vector stack.
fn split_gates<const G: usize>(
    layer: &str,
    what: &str,
    tensor: &Tensor,
    hidden: usize,
    cols: Option<usize>,
) -> Result<[WeightParams; G], BuilderError> {
    let view = match cols {
        Some(cols) => {
            let shape = tensor.shape();
            if shape.rank() < 2 || shape.last_dim() != Some(cols) {
                return Err(BuilderError::Shape(format!(
                    "layer '{layer}': {what} has shape {shape}, expected ({} x {hidden}, {cols})",
                    G
                )));
            }
            tensor.view()
        }
        None => tensor.view().flatten(),
    };
    let blocks = split_blocks(&view, G, hidden).map_err(|e| match e {
        TensorError::BlockLayout { shape, detail, .. } => BuilderError::Shape(format!(
            "layer '{layer}': {what} has shape {shape}, expected {} stacked blocks of {hidden}: {detail}",
            G
        )),
        other => BuilderError::tensor(layer)(other),
    })?;
    let mut blocks = blocks.into_iter().map(|b| WeightParams::new(b.into_vec()));
    Ok(std::array::from_fn(|_| blocks.next().unwrap_or_default()))
}

fn zero_gates<const G: usize>(hidden: usize) -> [WeightParams; G] {
    std::array::from_fn(|_| WeightParams::new(vec![0.0; hidden]))
}

/// Weights of a single-gate recurrent layer.
#[derive(Debug, Clone, Copy)]
pub struct SimpleRnnParams<'a> {
    pub hidden_size: usize,
    pub input_size: usize,
    /// Recursion matrix, `hidden_size x hidden_size`.
    pub w_h: &'a Tensor,
    /// Input matrix, `hidden_size x input_size`.
    pub w_x: &'a Tensor,
    pub bias: Option<&'a Tensor>,
    pub activation: NonLinearity,
    /// Emit the whole output sequence instead of the last step.
    pub output_all: bool,
    pub reverse_input: bool,
}

impl<'a> SimpleRnnParams<'a> {
    /// `tanh` activation, no bias, last step only.
    pub fn new(hidden_size: usize, input_size: usize, w_h: &'a Tensor, w_x: &'a Tensor) -> Self {
        Self {
            hidden_size,
            input_size,
            w_h,
            w_x,
            bias: None,
            activation: NonLinearity::Tanh,
            output_all: false,
            reverse_input: false,
        }
    }
}

/// Weights of a gated recurrent unit, stacked as update, reset, output.
#[derive(Debug, Clone, Copy)]
pub struct GruParams<'a> {
    pub hidden_size: usize,
    pub input_size: usize,
    /// `3 * hidden_size` rows of `hidden_size` columns.
    pub w_h: &'a Tensor,
    /// `3 * hidden_size` rows of `input_size` columns.
    pub w_x: &'a Tensor,
    /// `3 * hidden_size` values.
    pub bias: Option<&'a Tensor>,
    pub activation: NonLinearity,
    pub inner_activation: NonLinearity,
    pub output_all: bool,
    pub reverse_input: bool,
}

impl<'a> GruParams<'a> {
    /// `tanh` output activation and `sigmoid` gates.
    pub fn new(hidden_size: usize, input_size: usize, w_h: &'a Tensor, w_x: &'a Tensor) -> Self {
        Self {
            hidden_size,
            input_size,
            w_h,
            w_x,
            bias: None,
            activation: NonLinearity::Tanh,
            inner_activation: NonLinearity::Sigmoid,
            output_all: false,
            reverse_input: false,
        }
    }
}

/// The weights of one LSTM direction.
#[derive(Debug, Clone, Copy)]
pub struct LstmWeights<'a> {
    /// `4 * hidden_size` rows of `hidden_size` columns.
    pub w_h: &'a Tensor,
    /// `4 * hidden_size` rows of `input_size` columns.
    pub w_x: &'a Tensor,
    /// `4 * hidden_size` values.
    pub bias: Option<&'a Tensor>,
    /// `3 * hidden_size` values.
    pub peephole: Option<&'a Tensor>,
}

impl<'a> LstmWeights<'a> {
    pub fn new(w_h: &'a Tensor, w_x: &'a Tensor) -> Self {
        Self {
            w_h,
            w_x,
            bias: None,
            peephole: None,
        }
    }
}

/// A uni-directional LSTM.
#[derive(Debug, Clone, Copy)]
pub struct UniLstmParams<'a> {
    pub hidden_size: usize,
    pub input_size: usize,
    pub weights: LstmWeights<'a>,
    pub inner_activation: NonLinearity,
    pub cell_state_update_activation: NonLinearity,
    pub output_activation: NonLinearity,
    pub output_all: bool,
    pub forget_bias: bool,
    pub coupled_input_forget_gate: bool,
    /// Falls back to [`BuilderConfig::cell_clip_threshold`](crate::BuilderConfig::cell_clip_threshold).
    pub cell_clip_threshold: Option<f32>,
    pub reverse_input: bool,
}

impl<'a> UniLstmParams<'a> {
    /// Sigmoid gates, `tanh` cell update and output.
    pub fn new(hidden_size: usize, input_size: usize, weights: LstmWeights<'a>) -> Self {
        Self {
            hidden_size,
            input_size,
            weights,
            inner_activation: NonLinearity::Sigmoid,
            cell_state_update_activation: NonLinearity::Tanh,
            output_activation: NonLinearity::Tanh,
            output_all: false,
            forget_bias: false,
            coupled_input_forget_gate: false,
            cell_clip_threshold: None,
            reverse_input: false,
        }
    }
}

/// A bi-directional LSTM; both directions share activations and flags.
#[derive(Debug, Clone, Copy)]
pub struct BiLstmParams<'a> {
    pub hidden_size: usize,
    pub input_size: usize,
    pub forward: LstmWeights<'a>,
    pub backward: LstmWeights<'a>,
    pub inner_activation: NonLinearity,
    pub cell_state_update_activation: NonLinearity,
    pub output_activation: NonLinearity,
    pub output_all: bool,
    pub forget_bias: bool,
    pub coupled_input_forget_gate: bool,
    pub cell_clip_threshold: Option<f32>,
}

impl<'a> BiLstmParams<'a> {
    pub fn new(
        hidden_size: usize,
        input_size: usize,
        forward: LstmWeights<'a>,
        backward: LstmWeights<'a>,
    ) -> Self {
        Self {
            hidden_size,
            input_size,
            forward,
            backward,
            inner_activation: NonLinearity::Sigmoid,
            cell_state_update_activation: NonLinearity::Tanh,
            output_activation: NonLinearity::Tanh,
            output_all: false,
            forget_bias: false,
            coupled_input_forget_gate: false,
            cell_clip_threshold: None,
        }
    }
}

/// Slices one direction's stacks into an [`LstmWeightParams`].
///
/// Present bias and peephole stacks are validated even when they end up
/// omitted; an absent stack is zero-filled when the flag asks for it.
fn lstm_weight_params(
    layer: &str,
    weights: &LstmWeights<'_>,
    hidden: usize,
    input: usize,
    with_bias: bool,
    with_peephole: bool,
) -> Result<LstmWeightParams, BuilderError> {
    let [ix, fx, ox, zx] = split_gates::<4>(layer, "w_x", weights.w_x, hidden, Some(input))?;
    let [ih, fh, oh, zh] = split_gates::<4>(layer, "w_h", weights.w_h, hidden, Some(hidden))?;
    let bias = weights
        .bias
        .map(|b| split_gates::<4>(layer, "bias", b, hidden, None))
        .transpose()?;
    let peephole = weights
        .peephole
        .map(|p| split_gates::<3>(layer, "peephole", p, hidden, None))
        .transpose()?;

    let mut params = LstmWeightParams {
        input_gate_weight_matrix: Some(ix),
        forget_gate_weight_matrix: Some(fx),
        output_gate_weight_matrix: Some(ox),
        block_input_weight_matrix: Some(zx),
        input_gate_recursion_matrix: Some(ih),
        forget_gate_recursion_matrix: Some(fh),
        output_gate_recursion_matrix: Some(oh),
        block_input_recursion_matrix: Some(zh),
        ..Default::default()
    };
    if with_bias {
        let [i, f, o, z] = bias.unwrap_or_else(|| zero_gates(hidden));
        params.input_gate_bias_vector = Some(i);
        params.forget_gate_bias_vector = Some(f);
        params.output_gate_bias_vector = Some(o);
        params.block_input_bias_vector = Some(z);
    }
    if with_peephole {
        let [i, f, o] = peephole.unwrap_or_else(|| zero_gates(hidden));
        params.input_gate_peephole_vector = Some(i);
        params.forget_gate_peephole_vector = Some(f);
        params.output_gate_peephole_vector = Some(o);
    }
    Ok(params)
}

impl NeuralNetworkBuilder {
    /// Adds a simple recurrent layer.
    ///
    /// `input_names` is `[input, initial_hidden]` with the second optional;
    /// `output_names` is `[output, final_hidden]`.
    ///
    /// # Errors
    /// - [`BuilderError::Type`] if the activation cannot drive a recurrent layer.
    /// - [`BuilderError::Shape`] if a matrix or the bias has the wrong size.
    pub fn add_simple_rnn(
        &mut self,
        name: &str,
        params: SimpleRnnParams<'_>,
        input_names: &[&str],
        output_names: &[&str],
    ) -> Result<(), BuilderError> {
        let activation = encode_recurrent_activation(params.activation)?;
        let (h, x) = (params.hidden_size, params.input_size);
        check_len(name, "w_x", params.w_x, h * x)?;
        check_len(name, "w_h", params.w_h, h * h)?;
        if let Some(bias) = params.bias {
            check_len(name, "bias", bias, h)?;
        }

        let has_bias = nonzero(params.bias);
        let layer = SimpleRecurrentLayerParams {
            input_vector_size: x as u64,
            output_vector_size: h as u64,
            activation: Some(activation),
            sequence_output: params.output_all,
            has_bias_vector: has_bias,
            weight_matrix: Some(flat(params.w_x)),
            recursion_matrix: Some(flat(params.w_h)),
            bias_vector: params.bias.filter(|_| has_bias).map(flat),
            reverse_input: params.reverse_input,
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            input_names,
            output_names,
            LayerParams::SimpleRecurrent(layer),
        ));
        Ok(())
    }

    /// Adds a gated recurrent unit.
    ///
    /// # Errors
    /// - [`BuilderError::Type`] for an unsupported activation.
    /// - [`BuilderError::Shape`] if a matrix has the wrong column count, or a
    ///   stack is not `3 * hidden_size` rows.
    pub fn add_gru(
        &mut self,
        name: &str,
        params: GruParams<'_>,
        input_names: &[&str],
        output_names: &[&str],
    ) -> Result<(), BuilderError> {
        let activations = vec![
            encode_recurrent_activation(params.inner_activation)?,
            encode_recurrent_activation(params.activation)?,
        ];
        let (h, x) = (params.hidden_size, params.input_size);
        let [update_x, reset_x, output_x] = split_gates::<3>(name, "w_x", params.w_x, h, Some(x))?;
        let [update_h, reset_h, output_h] = split_gates::<3>(name, "w_h", params.w_h, h, Some(h))?;
        let bias = params
            .bias
            .map(|b| split_gates::<3>(name, "bias", b, h, None))
            .transpose()?
            .filter(|_| nonzero(params.bias));

        let mut layer = GruLayerParams {
            input_vector_size: x as u64,
            output_vector_size: h as u64,
            activations,
            sequence_output: params.output_all,
            has_bias_vectors: bias.is_some(),
            update_gate_weight_matrix: Some(update_x),
            reset_gate_weight_matrix: Some(reset_x),
            output_gate_weight_matrix: Some(output_x),
            update_gate_recursion_matrix: Some(update_h),
            reset_gate_recursion_matrix: Some(reset_h),
            output_gate_recursion_matrix: Some(output_h),
            reverse_input: params.reverse_input,
            ..Default::default()
        };
        if let Some([update, reset, output]) = bias {
            layer.update_gate_bias_vector = Some(update);
            layer.reset_gate_bias_vector = Some(reset);
            layer.output_gate_bias_vector = Some(output);
        }
        self.push_layer(NeuralNetworkLayer::new(
            name,
            input_names,
            output_names,
            LayerParams::Gru(layer),
        ));
        Ok(())
    }

    /// Adds a uni-directional LSTM.
    ///
    /// `input_names` is `[input, h0, c0]` and `output_names` is
    /// `[output, h_out, c_out]`; the state entries are optional.
    pub fn add_unilstm(
        &mut self,
        name: &str,
        params: UniLstmParams<'_>,
        input_names: &[&str],
        output_names: &[&str],
    ) -> Result<(), BuilderError> {
        let activations = vec![
            encode_recurrent_activation(params.inner_activation)?,
            encode_recurrent_activation(params.cell_state_update_activation)?,
            encode_recurrent_activation(params.output_activation)?,
        ];
        let w = &params.weights;
        let has_bias = nonzero(w.bias);
        let has_peephole = nonzero(w.peephole);
        let weight_params = lstm_weight_params(
            name,
            w,
            params.hidden_size,
            params.input_size,
            has_bias,
            has_peephole,
        )?;

        let layer = UniDirectionalLstmLayerParams {
            input_vector_size: params.input_size as u64,
            output_vector_size: params.hidden_size as u64,
            activations,
            params: Some(LstmParams {
                sequence_output: params.output_all,
                has_bias_vectors: has_bias,
                forget_bias: params.forget_bias,
                has_peephole_vectors: has_peephole,
                coupled_input_and_forget_gate: params.coupled_input_forget_gate,
                cell_clip_threshold: params
                    .cell_clip_threshold
                    .unwrap_or(self.config().cell_clip_threshold),
            }),
            weight_params: Some(weight_params),
            reverse_input: params.reverse_input,
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            input_names,
            output_names,
            LayerParams::UniDirectionalLstm(layer),
        ));
        Ok(())
    }

    /// Adds a bi-directional LSTM. The forward direction's weights are
    /// written first.
    ///
    /// Bias (or peephole) vectors are written for both directions as soon
    /// as either direction has a non-zero one; a direction without its own
    /// stack gets zeros.
    pub fn add_bidirlstm(
        &mut self,
        name: &str,
        params: BiLstmParams<'_>,
        input_names: &[&str],
        output_names: &[&str],
    ) -> Result<(), BuilderError> {
        let activations = vec![
            encode_recurrent_activation(params.inner_activation)?,
            encode_recurrent_activation(params.cell_state_update_activation)?,
            encode_recurrent_activation(params.output_activation)?,
        ];
        let has_bias = nonzero(params.forward.bias) || nonzero(params.backward.bias);
        let has_peephole = nonzero(params.forward.peephole) || nonzero(params.backward.peephole);
        let (h, x) = (params.hidden_size, params.input_size);
        let weight_params = vec![
            lstm_weight_params(name, &params.forward, h, x, has_bias, has_peephole)?,
            lstm_weight_params(name, &params.backward, h, x, has_bias, has_peephole)?,
        ];

        let layer = BiDirectionalLstmLayerParams {
            input_vector_size: x as u64,
            output_vector_size: h as u64,
            activations_forward_lstm: activations.clone(),
            activations_backward_lstm: activations,
            params: Some(LstmParams {
                sequence_output: params.output_all,
                has_bias_vectors: has_bias,
                forget_bias: params.forget_bias,
                has_peephole_vectors: has_peephole,
                coupled_input_and_forget_gate: params.coupled_input_forget_gate,
                cell_clip_threshold: params
                    .cell_clip_threshold
                    .unwrap_or(self.config().cell_clip_threshold),
            }),
            weight_params,
        };
        self.push_layer(NeuralNetworkLayer::new(
            name,
            input_names,
            output_names,
            LayerParams::BiDirectionalLstm(layer),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkMode;
    use model_spec::neural_network::Nonlinearity;
    use tensor_core::Shape;

    const H: usize = 2;
    const X: usize = 3;

    fn builder() -> NeuralNetworkBuilder {
        NeuralNetworkBuilder::new(
            &[("seq", Shape::vector(X))],
            &[("out", Shape::vector(H))],
            NetworkMode::Plain,
        )
        .unwrap()
    }

    /// A gate stack whose elements count up from `start`.
    fn stack(gates: usize, cols: usize, start: f32) -> Tensor {
        Tensor::from_fn(Shape::matrix(gates * H, cols), |i| start + i as f32)
    }

    fn values(w: &Option<WeightParams>) -> Vec<f32> {
        w.as_ref().unwrap().float_value.clone()
    }

    fn last(b: &NeuralNetworkBuilder) -> &LayerParams {
        b.layers().last().unwrap().layer.as_ref().unwrap()
    }

    #[test]
    fn test_simple_rnn() {
        let w_h = Tensor::zeros(Shape::matrix(H, H));
        let w_x = Tensor::from_fn(Shape::matrix(H, X), |i| i as f32);
        let zero_bias = Tensor::zeros(Shape::vector(H));
        let mut b = builder();
        let params = SimpleRnnParams {
            bias: Some(&zero_bias),
            output_all: true,
            ..SimpleRnnParams::new(H, X, &w_h, &w_x)
        };
        b.add_simple_rnn("rnn", params, &["seq", "h0"], &["out", "h1"])
            .unwrap();
        match last(&b) {
            LayerParams::SimpleRecurrent(p) => {
                assert_eq!((p.input_vector_size, p.output_vector_size), (3, 2));
                assert_eq!(values(&p.weight_matrix), w_x.as_slice());
                assert_eq!(p.recursion_matrix.as_ref().unwrap().len(), 4);
                assert!(!p.has_bias_vector);
                assert!(p.bias_vector.is_none());
                assert!(p.sequence_output);
                assert!(matches!(
                    p.activation.as_ref().unwrap().nonlinearity,
                    Some(Nonlinearity::Tanh(_))
                ));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(b.layers()[0].input, vec!["seq", "h0"]);
    }

    #[test]
    fn test_simple_rnn_keeps_sparse_bias() {
        let w_h = Tensor::zeros(Shape::matrix(H, H));
        let w_x = Tensor::zeros(Shape::matrix(H, X));
        let bias = Tensor::vector(&[0.0, 0.25]);
        let mut b = builder();
        let params = SimpleRnnParams {
            bias: Some(&bias),
            ..SimpleRnnParams::new(H, X, &w_h, &w_x)
        };
        b.add_simple_rnn("rnn", params, &["seq"], &["out"]).unwrap();
        match last(&b) {
            LayerParams::SimpleRecurrent(p) => {
                assert!(p.has_bias_vector);
                assert_eq!(values(&p.bias_vector), vec![0.0, 0.25]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_simple_rnn_errors() {
        let w_h = Tensor::zeros(Shape::matrix(H, H));
        let w_x = Tensor::zeros(Shape::matrix(H, H));
        let mut b = builder();
        assert!(matches!(
            b.add_simple_rnn("rnn", SimpleRnnParams::new(H, X, &w_h, &w_x), &["seq"], &["out"]),
            Err(BuilderError::Shape(_))
        ));
        let w_x = Tensor::zeros(Shape::matrix(H, X));
        let params = SimpleRnnParams {
            activation: NonLinearity::Softplus,
            ..SimpleRnnParams::new(H, X, &w_h, &w_x)
        };
        assert!(matches!(
            b.add_simple_rnn("rnn", params, &["seq"], &["out"]),
            Err(BuilderError::Type(_))
        ));
        assert!(b.layers().is_empty());
    }

    #[test]
    fn test_gru_gate_order() {
        let w_x = stack(3, X, 0.0);
        let w_h = stack(3, H, 100.0);
        let bias = Tensor::from_fn(Shape::vector(3 * H), |i| i as f32);
        let mut b = builder();
        let params = GruParams {
            bias: Some(&bias),
            ..GruParams::new(H, X, &w_h, &w_x)
        };
        b.add_gru("gru", params, &["seq"], &["out"]).unwrap();
        match last(&b) {
            LayerParams::Gru(p) => {
                assert_eq!(values(&p.update_gate_weight_matrix), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
                assert_eq!(values(&p.reset_gate_weight_matrix)[0], 6.0);
                assert_eq!(values(&p.output_gate_weight_matrix)[0], 12.0);
                assert_eq!(values(&p.update_gate_recursion_matrix), vec![100.0, 101.0, 102.0, 103.0]);
                assert_eq!(values(&p.output_gate_recursion_matrix)[0], 108.0);
                assert!(p.has_bias_vectors);
                assert_eq!(values(&p.reset_gate_bias_vector), vec![2.0, 3.0]);
                assert_eq!(p.activations.len(), 2);
                assert!(matches!(p.activations[0].nonlinearity, Some(Nonlinearity::Sigmoid(_))));
                assert!(matches!(p.activations[1].nonlinearity, Some(Nonlinearity::Tanh(_))));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_gru_zero_bias_omitted() {
        let w_x = stack(3, X, 0.0);
        let w_h = stack(3, H, 0.0);
        let bias = Tensor::zeros(Shape::vector(3 * H));
        let mut b = builder();
        let params = GruParams {
            bias: Some(&bias),
            ..GruParams::new(H, X, &w_h, &w_x)
        };
        b.add_gru("gru", params, &["seq"], &["out"]).unwrap();
        match last(&b) {
            LayerParams::Gru(p) => {
                assert!(!p.has_bias_vectors);
                assert!(p.update_gate_bias_vector.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_gru_stack_errors() {
        let w_h = stack(3, H, 0.0);
        let mut b = builder();

        let short = stack(2, X, 0.0);
        assert!(matches!(
            b.add_gru("gru", GruParams::new(H, X, &w_h, &short), &["seq"], &["out"]),
            Err(BuilderError::Shape(_))
        ));
        let w_x = stack(3, X, 0.0);
        let short_bias = Tensor::vector(&[1.0; 2 * H]);
        let params = GruParams {
            bias: Some(&short_bias),
            ..GruParams::new(H, X, &w_h, &w_x)
        };
        assert!(matches!(
            b.add_gru("gru", params, &["seq"], &["out"]),
            Err(BuilderError::Shape(_))
        ));
        let wrong_cols = stack(3, X + 1, 0.0);
        assert!(matches!(
            b.add_gru("gru", GruParams::new(H, X, &w_h, &wrong_cols), &["seq"], &["out"]),
            Err(BuilderError::Shape(_))
        ));
        assert!(b.layers().is_empty());
    }

    #[test]
    fn test_unilstm_slicing_and_flags() {
        let w_x = stack(4, X, 0.0);
        let w_h = stack(4, H, 0.0);
        let bias = Tensor::from_fn(Shape::vector(4 * H), |i| i as f32);
        let peephole = Tensor::zeros(Shape::vector(3 * H));
        let weights = LstmWeights {
            bias: Some(&bias),
            peephole: Some(&peephole),
            ..LstmWeights::new(&w_h, &w_x)
        };
        let mut b = builder();
        let params = UniLstmParams {
            forget_bias: true,
            reverse_input: true,
            ..UniLstmParams::new(H, X, weights)
        };
        b.add_unilstm("lstm", params, &["seq", "h0", "c0"], &["out", "h1", "c1"])
            .unwrap();
        match last(&b) {
            LayerParams::UniDirectionalLstm(p) => {
                let lp = p.params.as_ref().unwrap();
                assert!(lp.has_bias_vectors);
                assert!(!lp.has_peephole_vectors);
                assert!(lp.forget_bias);
                assert_eq!(lp.cell_clip_threshold, 50.0);
                assert!(p.reverse_input);
                assert_eq!(p.activations.len(), 3);

                let w = p.weight_params.as_ref().unwrap();
                assert_eq!(values(&w.input_gate_weight_matrix)[0], 0.0);
                assert_eq!(values(&w.forget_gate_weight_matrix)[0], 6.0);
                assert_eq!(values(&w.output_gate_weight_matrix)[0], 12.0);
                assert_eq!(values(&w.block_input_weight_matrix)[0], 18.0);
                assert_eq!(values(&w.block_input_bias_vector), vec![6.0, 7.0]);
                assert!(w.input_gate_peephole_vector.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unilstm_peephole_length() {
        let w_x = stack(4, X, 0.0);
        let w_h = stack(4, H, 0.0);
        let peephole = Tensor::vector(&[1.0; 4 * H]);
        let weights = LstmWeights {
            peephole: Some(&peephole),
            ..LstmWeights::new(&w_h, &w_x)
        };
        let mut b = builder();
        assert!(matches!(
            b.add_unilstm("lstm", UniLstmParams::new(H, X, weights), &["seq"], &["out"]),
            Err(BuilderError::Shape(_))
        ));
        assert!(b.layers().is_empty());
    }

    #[test]
    fn test_bidirlstm_zero_fills_missing_direction() {
        let w_x = stack(4, X, 0.0);
        let w_h = stack(4, H, 0.0);
        let peephole = Tensor::vector(&[0.5; 3 * H]);
        let forward = LstmWeights::new(&w_h, &w_x);
        let backward = LstmWeights {
            peephole: Some(&peephole),
            ..LstmWeights::new(&w_h, &w_x)
        };
        let mut b = builder();
        let params = BiLstmParams {
            cell_clip_threshold: Some(10.0),
            ..BiLstmParams::new(H, X, forward, backward)
        };
        b.add_bidirlstm("bilstm", params, &["seq"], &["out"]).unwrap();
        match last(&b) {
            LayerParams::BiDirectionalLstm(p) => {
                let lp = p.params.as_ref().unwrap();
                assert!(lp.has_peephole_vectors);
                assert!(!lp.has_bias_vectors);
                assert_eq!(lp.cell_clip_threshold, 10.0);
                assert_eq!(p.weight_params.len(), 2);
                assert_eq!(values(&p.weight_params[0].forget_gate_peephole_vector), vec![0.0; H]);
                assert_eq!(values(&p.weight_params[1].forget_gate_peephole_vector), vec![0.5; H]);
                assert!(p.weight_params[0].input_gate_bias_vector.is_none());
                assert_eq!(p.activations_forward_lstm, p.activations_backward_lstm);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
