// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Activation-parameter encoding shared by activation layers and recurrent gates.
//!
//! A nonlinearity is named by a [`NonLinearity`] tag (parsed from its
//! upper-case schema name) and takes zero, one or two parameters. Scalar
//! parameters are passed as one-element slices, vector parameters as slices
//! of any length:
//!
//! | Kind | Parameters | Default |
//! |---|---|---|
//! | `RELU`, `SIGMOID`, `TANH`, `SOFTPLUS`, `SOFTSIGN`, `LINEAR` | none | |
//! | `SCALED_TANH` | `[alpha], [beta]` | `0.0, 0.0` |
//! | `SIGMOID_HARD` | `[alpha], [beta]` | `0.2, 0.5` |
//! | `LEAKYRELU` | `[alpha]` | `0.3` |
//! | `ELU` | `[alpha]` | `1.0` |
//! | `THRESHOLDEDRELU` | `[alpha]` | `1.0` |
//! | `PRELU` | `alpha` vector | required |
//! | `PARAMETRICSOFTPLUS` | `alpha`, `beta` vectors | required |

use crate::BuilderError;
use model_spec::neural_network::{
    ActivationElu, ActivationLeakyRelu, ActivationLinear, ActivationParametricSoftplus,
    ActivationPrelu, ActivationRelu, ActivationScaledTanh, ActivationSigmoid,
    ActivationSigmoidHard, ActivationSoftplus, ActivationSoftsign, ActivationTanh,
    ActivationThresholdedRelu, Nonlinearity,
};
use model_spec::{ActivationParams, WeightParams};
use std::fmt;
use std::str::FromStr;

/// Nonlinearity tags accepted by [`encode_activation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonLinearity {
    Relu,
    Sigmoid,
    Tanh,
    ScaledTanh,
    Softplus,
    Softsign,
    SigmoidHard,
    LeakyRelu,
    Prelu,
    Elu,
    ParametricSoftplus,
    ThresholdedRelu,
    Linear,
}

impl NonLinearity {
    /// Returns the schema name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relu => "RELU",
            Self::Sigmoid => "SIGMOID",
            Self::Tanh => "TANH",
            Self::ScaledTanh => "SCALED_TANH",
            Self::Softplus => "SOFTPLUS",
            Self::Softsign => "SOFTSIGN",
            Self::SigmoidHard => "SIGMOID_HARD",
            Self::LeakyRelu => "LEAKYRELU",
            Self::Prelu => "PRELU",
            Self::Elu => "ELU",
            Self::ParametricSoftplus => "PARAMETRICSOFTPLUS",
            Self::ThresholdedRelu => "THRESHOLDEDRELU",
            Self::Linear => "LINEAR",
        }
    }

    /// Whether the tag may drive a recurrent gate.
    pub fn is_recurrent(&self) -> bool {
        matches!(
            self,
            Self::Relu
                | Self::Tanh
                | Self::Sigmoid
                | Self::ScaledTanh
                | Self::SigmoidHard
                | Self::Linear
        )
    }
}

impl FromStr for NonLinearity {
    type Err = BuilderError;

    /// Parses an upper-case schema name.
    ///
    /// # Examples
    /// ```
    /// use nn_builder::NonLinearity;
    /// assert_eq!("LEAKYRELU".parse::<NonLinearity>().unwrap(), NonLinearity::LeakyRelu);
    /// assert!("SWISH".parse::<NonLinearity>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "RELU" => Self::Relu,
            "SIGMOID" => Self::Sigmoid,
            "TANH" => Self::Tanh,
            "SCALED_TANH" => Self::ScaledTanh,
            "SOFTPLUS" => Self::Softplus,
            "SOFTSIGN" => Self::Softsign,
            "SIGMOID_HARD" => Self::SigmoidHard,
            "LEAKYRELU" => Self::LeakyRelu,
            "PRELU" => Self::Prelu,
            "ELU" => Self::Elu,
            "PARAMETRICSOFTPLUS" => Self::ParametricSoftplus,
            "THRESHOLDEDRELU" => Self::ThresholdedRelu,
            "LINEAR" => Self::Linear,
            other => return Err(BuilderError::Type(format!("unknown activation type '{other}'"))),
        })
    }
}

impl fmt::Display for NonLinearity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Parameter helpers ──────────────────────────────────────────────

fn arity_error(kind: NonLinearity, expected: &str, got: usize) -> BuilderError {
    BuilderError::Value(format!("{kind} takes {expected} parameter(s), got {got}"))
}

/// Reads an optional `(alpha, beta)` scalar pair.
fn scalar_pair(
    kind: NonLinearity,
    params: &[&[f32]],
    default: (f32, f32),
) -> Result<(f32, f32), BuilderError> {
    match params {
        [] => Ok(default),
        [alpha, beta] => Ok((scalar(kind, alpha)?, scalar(kind, beta)?)),
        _ => Err(arity_error(kind, "0 or 2", params.len())),
    }
}

/// Reads an optional single scalar.
fn single_scalar(kind: NonLinearity, params: &[&[f32]], default: f32) -> Result<f32, BuilderError> {
    match params {
        [] => Ok(default),
        [alpha] => scalar(kind, alpha),
        _ => Err(arity_error(kind, "0 or 1", params.len())),
    }
}

fn scalar(kind: NonLinearity, values: &[f32]) -> Result<f32, BuilderError> {
    match values {
        [v] => Ok(*v),
        _ => Err(BuilderError::Value(format!(
            "{kind} parameters are scalars, got a vector of {} values",
            values.len()
        ))),
    }
}

fn vector(kind: NonLinearity, values: &[f32]) -> Result<WeightParams, BuilderError> {
    if values.is_empty() {
        return Err(BuilderError::Value(format!("{kind} parameter vectors must not be empty")));
    }
    Ok(WeightParams::new(values))
}

// ── Encoders ───────────────────────────────────────────────────────

/// Encodes `kind` with its parameters.
///
/// # Errors
/// [`BuilderError::Value`] if the number or size of parameters does not fit
/// the kind.
///
/// # Examples
/// ```
/// use model_spec::neural_network::Nonlinearity;
/// use nn_builder::{encode_activation, NonLinearity};
///
/// let act = encode_activation(NonLinearity::SigmoidHard, &[]).unwrap();
/// match act.nonlinearity {
///     Some(Nonlinearity::SigmoidHard(p)) => assert_eq!((p.alpha, p.beta), (0.2, 0.5)),
///     _ => unreachable!(),
/// }
/// ```
pub fn encode_activation(
    kind: NonLinearity,
    params: &[&[f32]],
) -> Result<ActivationParams, BuilderError> {
    let no_params = |n: Nonlinearity| {
        if params.is_empty() {
            Ok(n)
        } else {
            Err(arity_error(kind, "no", params.len()))
        }
    };

    let nonlinearity = match kind {
        NonLinearity::Relu => no_params(Nonlinearity::Relu(ActivationRelu {}))?,
        NonLinearity::Sigmoid => no_params(Nonlinearity::Sigmoid(ActivationSigmoid {}))?,
        NonLinearity::Tanh => no_params(Nonlinearity::Tanh(ActivationTanh {}))?,
        NonLinearity::Softplus => no_params(Nonlinearity::Softplus(ActivationSoftplus {}))?,
        NonLinearity::Softsign => no_params(Nonlinearity::Softsign(ActivationSoftsign {}))?,
        NonLinearity::Linear => no_params(Nonlinearity::Linear(ActivationLinear::default()))?,
        NonLinearity::ScaledTanh => {
            let (alpha, beta) = scalar_pair(kind, params, (0.0, 0.0))?;
            Nonlinearity::ScaledTanh(ActivationScaledTanh { alpha, beta })
        }
        NonLinearity::SigmoidHard => {
            let (alpha, beta) = scalar_pair(kind, params, (0.2, 0.5))?;
            Nonlinearity::SigmoidHard(ActivationSigmoidHard { alpha, beta })
        }
        NonLinearity::LeakyRelu => Nonlinearity::LeakyRelu(ActivationLeakyRelu {
            alpha: single_scalar(kind, params, 0.3)?,
        }),
        NonLinearity::Elu => Nonlinearity::Elu(ActivationElu {
            alpha: single_scalar(kind, params, 1.0)?,
        }),
        NonLinearity::ThresholdedRelu => Nonlinearity::ThresholdedRelu(ActivationThresholdedRelu {
            alpha: single_scalar(kind, params, 1.0)?,
        }),
        NonLinearity::Prelu => match params {
            [alpha] => Nonlinearity::Prelu(ActivationPrelu {
                alpha: Some(vector(kind, alpha)?),
            }),
            _ => return Err(arity_error(kind, "1", params.len())),
        },
        NonLinearity::ParametricSoftplus => match params {
            [alpha, beta] => Nonlinearity::ParametricSoftplus(ActivationParametricSoftplus {
                alpha: Some(vector(kind, alpha)?),
                beta: Some(vector(kind, beta)?),
            }),
            _ => return Err(arity_error(kind, "2", params.len())),
        },
    };
    Ok(ActivationParams::new(nonlinearity))
}

/// Encodes a recurrent gate activation with default parameters.
///
/// The defaults are those of [`encode_activation`], so a hard sigmoid gate
/// is written with `alpha = 0.2` and `beta = 0.5`.
///
/// # Errors
/// [`BuilderError::Type`] for kinds a recurrent layer cannot use.
pub fn encode_recurrent_activation(kind: NonLinearity) -> Result<ActivationParams, BuilderError> {
    if !kind.is_recurrent() {
        return Err(BuilderError::Type(format!(
            "unsupported activation type for a recurrent layer: {kind}"
        )));
    }
    encode_activation(kind, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner(params: ActivationParams) -> Nonlinearity {
        params.nonlinearity.unwrap()
    }

    #[test]
    fn test_parse_round_trip() {
        for name in [
            "RELU",
            "SIGMOID",
            "TANH",
            "SCALED_TANH",
            "SOFTPLUS",
            "SOFTSIGN",
            "SIGMOID_HARD",
            "LEAKYRELU",
            "PRELU",
            "ELU",
            "PARAMETRICSOFTPLUS",
            "THRESHOLDEDRELU",
            "LINEAR",
        ] {
            let kind: NonLinearity = name.parse().unwrap();
            assert_eq!(kind.to_string(), name);
        }
    }

    #[test]
    fn test_unknown_kind_is_type_error() {
        assert!(matches!(
            "relu".parse::<NonLinearity>(),
            Err(BuilderError::Type(_))
        ));
    }

    #[test]
    fn test_defaults() {
        match inner(encode_activation(NonLinearity::ScaledTanh, &[]).unwrap()) {
            Nonlinearity::ScaledTanh(p) => assert_eq!((p.alpha, p.beta), (0.0, 0.0)),
            other => panic!("unexpected {other:?}"),
        }
        match inner(encode_activation(NonLinearity::LeakyRelu, &[]).unwrap()) {
            Nonlinearity::LeakyRelu(p) => assert_eq!(p.alpha, 0.3),
            other => panic!("unexpected {other:?}"),
        }
        match inner(encode_activation(NonLinearity::ThresholdedRelu, &[]).unwrap()) {
            Nonlinearity::ThresholdedRelu(p) => assert_eq!(p.alpha, 1.0),
            other => panic!("unexpected {other:?}"),
        }
        match inner(encode_activation(NonLinearity::Elu, &[]).unwrap()) {
            Nonlinearity::Elu(p) => assert_eq!(p.alpha, 1.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_explicit_scalars() {
        match inner(encode_activation(NonLinearity::SigmoidHard, &[&[0.1], &[0.7]]).unwrap()) {
            Nonlinearity::SigmoidHard(p) => assert_eq!((p.alpha, p.beta), (0.1, 0.7)),
            other => panic!("unexpected {other:?}"),
        }
        match inner(encode_activation(NonLinearity::Elu, &[&[0.5]]).unwrap()) {
            Nonlinearity::Elu(p) => assert_eq!(p.alpha, 0.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_vector_params() {
        match inner(encode_activation(NonLinearity::Prelu, &[&[0.1, 0.2, 0.3]]).unwrap()) {
            Nonlinearity::Prelu(p) => assert_eq!(p.alpha.unwrap().float_value, vec![0.1, 0.2, 0.3]),
            other => panic!("unexpected {other:?}"),
        }
        match inner(
            encode_activation(NonLinearity::ParametricSoftplus, &[&[1.0, 2.0], &[3.0, 4.0]])
                .unwrap(),
        ) {
            Nonlinearity::ParametricSoftplus(p) => {
                assert_eq!(p.alpha.unwrap().float_value, vec![1.0, 2.0]);
                assert_eq!(p.beta.unwrap().float_value, vec![3.0, 4.0]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_arity_errors() {
        let cases: &[(NonLinearity, &[&[f32]])] = &[
            (NonLinearity::Relu, &[&[1.0]]),
            (NonLinearity::ScaledTanh, &[&[1.0]]),
            (NonLinearity::LeakyRelu, &[&[1.0], &[2.0]]),
            (NonLinearity::LeakyRelu, &[&[1.0, 2.0]]),
            (NonLinearity::Prelu, &[]),
            (NonLinearity::Prelu, &[&[]]),
            (NonLinearity::ParametricSoftplus, &[&[1.0]]),
        ];
        for (kind, params) in cases {
            assert!(
                matches!(encode_activation(*kind, params), Err(BuilderError::Value(_))),
                "{kind} with {} params should fail",
                params.len()
            );
        }
    }

    #[test]
    fn test_recurrent_subset() {
        for kind in [
            NonLinearity::Relu,
            NonLinearity::Tanh,
            NonLinearity::Sigmoid,
            NonLinearity::ScaledTanh,
            NonLinearity::SigmoidHard,
            NonLinearity::Linear,
        ] {
            assert!(encode_recurrent_activation(kind).is_ok());
        }
        for kind in [NonLinearity::Prelu, NonLinearity::Elu, NonLinearity::Softplus] {
            assert!(matches!(
                encode_recurrent_activation(kind),
                Err(BuilderError::Type(_))
            ));
        }
    }

    #[test]
    fn test_recurrent_hard_sigmoid_defaults() {
        match inner(encode_recurrent_activation(NonLinearity::SigmoidHard).unwrap()) {
            Nonlinearity::SigmoidHard(p) => assert_eq!((p.alpha, p.beta), (0.2, 0.5)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
