// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The document builder: interface slots, classifier labels, pre-processing.
//!
//! A [`NeuralNetworkBuilder`] owns one [`Model`] from construction until
//! [`finish`](NeuralNetworkBuilder::finish). Layer factory methods live in
//! [`crate::layers`] as further `impl` blocks on the same type; all of them
//! validate first and then append exactly one layer through
//! [`push_layer`](NeuralNetworkBuilder::push_layer).
//!
//! # Interface shapes
//!
//! Multi-array slots hold rank-1 or rank-3 shapes. A rank-2 shape keeps only
//! its trailing dimension; any other rank is a [`BuilderError::Shape`].

use crate::{BuilderConfig, BuilderError};
use model_spec::neural_network::{NeuralNetworkImageScaler, Preprocessor};
use model_spec::{
    ArrayDataType, ClassLabels, ColorSpace, FeatureDescription, FeatureKind, FeatureType,
    Int64Vector, Model, ModelBody, ModelDescription, ModelSummary, NeuralNetwork,
    NeuralNetworkClassifier, NeuralNetworkLayer, NeuralNetworkPreprocessing,
    NeuralNetworkRegressor, StringVector,
};
use std::collections::HashSet;
use std::path::Path;
use tensor_core::Shape;

/// Selects which of the three network bodies the document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkMode {
    /// A plain neural network.
    #[default]
    Plain,
    /// A classifier; class labels are set with
    /// [`set_class_labels`](NeuralNetworkBuilder::set_class_labels).
    Classifier,
    Regressor,
}

/// One class label. A label list must be all integers or all strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassLabel {
    Int(i64),
    Str(String),
}

impl From<i64> for ClassLabel {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ClassLabel {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for ClassLabel {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Image pre-processing applied to the named inputs.
///
/// Each named input that is still a rank-3 multi-array `(channels, height,
/// width)` becomes an image (grayscale for one channel, RGB or BGR for
/// three) and gets a scaler computing `image_scale * x + bias`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessingParams {
    pub image_input_names: Vec<String>,
    pub is_bgr: bool,
    pub red_bias: f32,
    pub green_bias: f32,
    pub blue_bias: f32,
    pub gray_bias: f32,
    pub image_scale: f32,
}

impl Default for PreprocessingParams {
    fn default() -> Self {
        Self {
            image_input_names: Vec::new(),
            is_bgr: false,
            red_bias: 0.0,
            green_bias: 0.0,
            blue_bias: 0.0,
            gray_bias: 0.0,
            image_scale: 1.0,
        }
    }
}

/// Builds a model document layer by layer.
///
/// # Example
/// ```
/// use nn_builder::{DenseParams, NetworkMode, NeuralNetworkBuilder};
/// use tensor_core::{Shape, Tensor};
///
/// let mut builder = NeuralNetworkBuilder::new(
///     &[("data", Shape::vector(3))],
///     &[("probs", Shape::vector(2))],
///     NetworkMode::Plain,
/// )
/// .unwrap();
///
/// let w = Tensor::from_f32(Shape::matrix(3, 2), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let b = Tensor::vector(&[0.5, -0.5]);
/// builder
///     .add_inner_product("ip", DenseParams::new(3, 2, &w, Some(&b)), "data", "probs")
///     .unwrap();
///
/// let model = builder.finish();
/// assert_eq!(model.layers().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NeuralNetworkBuilder {
    config: BuilderConfig,
    data_type: ArrayDataType,
    spec: Model,
}

/// Normalises an interface shape to rank 1 or 3.
fn interface_shape(name: &str, shape: &Shape) -> Result<Vec<i64>, BuilderError> {
    let dims: Vec<i64> = shape.dims().iter().map(|&d| d as i64).collect();
    match dims.len() {
        1 | 3 => Ok(dims),
        2 => Ok(vec![dims[1]]),
        rank => Err(BuilderError::Shape(format!(
            "feature '{name}' has rank {rank}; interface shapes must have rank 1, 2 or 3"
        ))),
    }
}

fn label_error() -> BuilderError {
    BuilderError::Type("class labels must be all integers or all strings".into())
}

/// Fails if any of `names` is already a slot in `existing` or repeats
/// within `names`.
fn check_unique<'a>(
    role: &str,
    existing: &[FeatureDescription],
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), BuilderError> {
    let mut seen: HashSet<&str> = existing.iter().map(|f| f.name.as_str()).collect();
    for name in names {
        if !seen.insert(name) {
            return Err(BuilderError::Value(format!(
                "duplicate {role} name '{name}'"
            )));
        }
    }
    Ok(())
}

impl NeuralNetworkBuilder {
    // ── Construction ───────────────────────────────────────────────

    /// Creates a builder with the default [`BuilderConfig`].
    ///
    /// # Errors
    /// - [`BuilderError::Shape`] if any feature shape has rank outside `{1, 2, 3}`.
    /// - [`BuilderError::Value`] if two inputs, or two outputs, share a name.
    pub fn new(
        inputs: &[(&str, Shape)],
        outputs: &[(&str, Shape)],
        mode: NetworkMode,
    ) -> Result<Self, BuilderError> {
        Self::with_config(BuilderConfig::default(), inputs, outputs, mode)
    }

    /// Creates a builder whose document defaults come from `config`.
    ///
    /// # Errors
    /// [`BuilderError::Value`] if two inputs, or two outputs, share a name.
    pub fn with_config(
        config: BuilderConfig,
        inputs: &[(&str, Shape)],
        outputs: &[(&str, Shape)],
        mode: NetworkMode,
    ) -> Result<Self, BuilderError> {
        config.validate()?;
        let data_type = config.array_data_type()?;
        check_unique("input", &[], inputs.iter().map(|(name, _)| *name))?;
        check_unique("output", &[], outputs.iter().map(|(name, _)| *name))?;

        let features = |list: &[(&str, Shape)]| -> Result<Vec<FeatureDescription>, BuilderError> {
            list.iter()
                .map(|(name, shape)| {
                    let dims = interface_shape(name, shape)?;
                    Ok(FeatureDescription::new(
                        *name,
                        FeatureType::multi_array(&dims, data_type),
                    ))
                })
                .collect()
        };
        let description = ModelDescription {
            input: features(inputs)?,
            output: features(outputs)?,
            ..Default::default()
        };

        let body = match mode {
            NetworkMode::Plain => ModelBody::NeuralNetwork(NeuralNetwork::default()),
            NetworkMode::Classifier => {
                ModelBody::NeuralNetworkClassifier(NeuralNetworkClassifier::default())
            }
            NetworkMode::Regressor => {
                ModelBody::NeuralNetworkRegressor(NeuralNetworkRegressor::default())
            }
        };

        tracing::info!(
            "builder created: {} body, {} inputs, {} outputs, specification version {}",
            body.kind_name(),
            description.input.len(),
            description.output.len(),
            config.specification_version,
        );

        Ok(Self {
            spec: Model {
                specification_version: config.specification_version,
                description: Some(description),
                body: Some(body),
            },
            data_type,
            config,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The document built so far.
    pub fn spec(&self) -> &Model {
        &self.spec
    }

    /// The ordered layer list.
    pub fn layers(&self) -> &[NeuralNetworkLayer] {
        self.spec.layers()
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Position of the input slot called `name`.
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.spec.inputs().iter().position(|f| f.name == name)
    }

    /// Position of the output slot called `name`.
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.spec.outputs().iter().position(|f| f.name == name)
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary::from_model(&self.spec)
    }

    /// Layer inputs that are neither a model input nor produced by an
    /// earlier layer, as `(layer name, blob name)` pairs.
    ///
    /// The builder itself never rejects such references; this is an opt-in
    /// check for callers that want produced-before-consumed ordering.
    pub fn unresolved_blobs(&self) -> Vec<(String, String)> {
        let mut known: HashSet<&str> = self.spec.inputs().iter().map(|f| f.name.as_str()).collect();
        let mut unresolved = Vec::new();
        for layer in self.layers() {
            for input in &layer.input {
                if !known.contains(input.as_str()) {
                    unresolved.push((layer.name.clone(), input.clone()));
                }
            }
            known.extend(layer.output.iter().map(String::as_str));
        }
        unresolved
    }

    /// Consumes the builder and returns the finished document.
    ///
    /// Unresolved blob references are logged as warnings.
    pub fn finish(self) -> Model {
        for (layer, blob) in self.unresolved_blobs() {
            tracing::warn!("layer '{layer}' reads blob '{blob}' which nothing produces before it");
        }
        tracing::info!(
            "document finished: {} layers, {} embedded parameters",
            self.layers().len(),
            self.summary().total_parameters(),
        );
        self.spec
    }

    /// Writes the current document to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BuilderError> {
        model_spec::io::save_spec(&self.spec, path)?;
        Ok(())
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn description_mut(&mut self) -> &mut ModelDescription {
        self.spec.description.get_or_insert_with(ModelDescription::default)
    }

    fn body_mut(&mut self) -> &mut ModelBody {
        self.spec
            .body
            .get_or_insert_with(|| ModelBody::NeuralNetwork(NeuralNetwork::default()))
    }

    /// Appends a fully validated layer.
    pub(crate) fn push_layer(&mut self, layer: NeuralNetworkLayer) {
        if self.layers().iter().any(|l| l.name == layer.name) {
            tracing::warn!("duplicate layer name '{}'", layer.name);
        }
        tracing::debug!(
            "adding layer '{}' ({}) {:?} -> {:?}, {} parameters",
            layer.name,
            layer.kind_name(),
            layer.input,
            layer.output,
            layer.layer.as_ref().map_or(0, |p| p.weight_count()),
        );
        self.body_mut().layers_mut().push(layer);
    }

    // ── Interface ──────────────────────────────────────────────────

    /// Rewrites the shapes of input slots, matched by position and name.
    ///
    /// # Errors
    /// - [`BuilderError::Value`] if `names` and `dims` differ in length.
    /// - [`BuilderError::State`] if an index has no slot or the slot there has
    ///   a different name.
    /// - [`BuilderError::Shape`] for ranks outside `{1, 2, 3}`.
    ///
    /// Nothing is modified unless every entry is valid.
    pub fn set_input(&mut self, names: &[&str], dims: &[Shape]) -> Result<(), BuilderError> {
        let data_type = self.data_type;
        let slots = match self.spec.description.as_mut() {
            Some(d) => &mut d.input,
            None => return Err(BuilderError::State("document has no interface".into())),
        };
        set_shapes(slots, "input", names, dims, data_type)
    }

    /// Rewrites the shapes of output slots; see [`set_input`](Self::set_input).
    pub fn set_output(&mut self, names: &[&str], dims: &[Shape]) -> Result<(), BuilderError> {
        let data_type = self.data_type;
        let slots = match self.spec.description.as_mut() {
            Some(d) => &mut d.output,
            None => return Err(BuilderError::State("document has no interface".into())),
        };
        set_shapes(slots, "output", names, dims, data_type)
    }

    /// Turns the document into a classifier over `labels`.
    ///
    /// The first output becomes a probability dictionary keyed by the label
    /// type, and an output slot `predicted_feature_name` holding the
    /// predicted label is added. A plain network body is promoted to a
    /// classifier; a regressor body is rejected. An empty label list leaves
    /// the document untouched.
    ///
    /// # Errors
    /// - [`BuilderError::State`] if there is no output, or the body is a regressor.
    /// - [`BuilderError::Type`] if the labels mix integers and strings.
    /// - [`BuilderError::Value`] if `predicted_feature_name` names the first output.
    pub fn set_class_labels(
        &mut self,
        labels: &[ClassLabel],
        predicted_feature_name: &str,
    ) -> Result<(), BuilderError> {
        if self.spec.outputs().is_empty() {
            return Err(BuilderError::State(
                "model has no output to convert into class probabilities".into(),
            ));
        }
        let Some(first) = labels.first() else {
            return Ok(());
        };

        let class_labels = match first {
            ClassLabel::Int(_) => ClassLabels::Int64ClassLabels(Int64Vector {
                vector: labels
                    .iter()
                    .map(|l| match l {
                        ClassLabel::Int(v) => Ok(*v),
                        ClassLabel::Str(_) => Err(label_error()),
                    })
                    .collect::<Result<_, _>>()?,
            }),
            ClassLabel::Str(_) => ClassLabels::StringClassLabels(StringVector {
                vector: labels
                    .iter()
                    .map(|l| match l {
                        ClassLabel::Str(v) => Ok(v.clone()),
                        ClassLabel::Int(_) => Err(label_error()),
                    })
                    .collect::<Result<_, _>>()?,
            }),
        };
        let string_keys = matches!(class_labels, ClassLabels::StringClassLabels(_));

        let probabilities_name = &self.spec.outputs()[0].name;
        if probabilities_name == predicted_feature_name {
            return Err(BuilderError::Value(format!(
                "predicted feature name '{predicted_feature_name}' is already the class probability output"
            )));
        }

        if let Some(ModelBody::NeuralNetworkRegressor(_)) = self.spec.body {
            return Err(BuilderError::State(
                "class labels cannot be set on a regressor".into(),
            ));
        }

        // Promote a plain body, keeping its layers and pre-processing.
        let body = self.body_mut();
        if let ModelBody::NeuralNetwork(nn) = &mut *body {
            tracing::info!("promoting neural network body to classifier");
            *body = ModelBody::NeuralNetworkClassifier(NeuralNetworkClassifier {
                layers: std::mem::take(&mut nn.layers),
                preprocessing: std::mem::take(&mut nn.preprocessing),
                class_labels: None,
            });
        }
        if let ModelBody::NeuralNetworkClassifier(classifier) = body {
            classifier.class_labels = Some(class_labels);
        }

        let description = self.description_mut();
        let label_type = if string_keys {
            FeatureType::string()
        } else {
            FeatureType::int64()
        };
        let probabilities = &mut description.output[0];
        let is_optional = probabilities.r#type.as_ref().is_some_and(|t| t.is_optional);
        let mut dictionary = FeatureType::dictionary(string_keys);
        dictionary.is_optional = is_optional;
        probabilities.r#type = Some(dictionary);
        let probabilities_name = probabilities.name.clone();

        match description
            .output
            .iter_mut()
            .skip(1)
            .find(|f| f.name == predicted_feature_name)
        {
            Some(existing) => existing.r#type = Some(label_type),
            None => description
                .output
                .push(FeatureDescription::new(predicted_feature_name, label_type)),
        }
        description.predicted_probabilities_name = probabilities_name;
        description.predicted_feature_name = predicted_feature_name.to_owned();

        tracing::debug!(
            "set {} class labels, predicted feature '{predicted_feature_name}'",
            labels.len()
        );
        Ok(())
    }

    /// Appends optional single-dimension array slots.
    ///
    /// Each entry is `(name, length)`. Existing slots are left untouched.
    ///
    /// # Errors
    /// [`BuilderError::Value`] if a name is already taken in its list or
    /// appears twice; nothing is appended in that case.
    pub fn add_optionals(
        &mut self,
        optional_inputs: &[(&str, usize)],
        optional_outputs: &[(&str, usize)],
    ) -> Result<(), BuilderError> {
        if optional_inputs.is_empty() && optional_outputs.is_empty() {
            return Ok(());
        }
        check_unique("input", self.spec.inputs(), optional_inputs.iter().map(|(name, _)| *name))?;
        check_unique("output", self.spec.outputs(), optional_outputs.iter().map(|(name, _)| *name))?;

        let data_type = self.data_type;
        let optional = |(name, len): &(&str, usize)| {
            let mut feature_type = FeatureType::multi_array(&[*len as i64], data_type);
            feature_type.is_optional = true;
            FeatureDescription::new(*name, feature_type)
        };

        let description = self.description_mut();
        description.input.extend(optional_inputs.iter().map(optional));
        description.output.extend(optional_outputs.iter().map(optional));
        tracing::debug!(
            "added {} optional inputs, {} optional outputs",
            optional_inputs.len(),
            optional_outputs.len()
        );
        Ok(())
    }

    /// Marks inputs as images and records their scaler.
    ///
    /// # Errors
    /// - [`BuilderError::Shape`] if a named multi-array input is not rank 3.
    /// - [`BuilderError::Value`] if its channel count is not 1 or 3.
    pub fn set_pre_processing_parameters(
        &mut self,
        params: &PreprocessingParams,
    ) -> Result<(), BuilderError> {
        if params.image_input_names.is_empty() {
            return Ok(());
        }

        // Validate every conversion before touching the interface.
        let mut conversions = Vec::new();
        let mut matched = Vec::new();
        for name in &params.image_input_names {
            let Some(index) = self.input_index(name) else {
                tracing::warn!("image input '{name}' is not a model input; skipping");
                continue;
            };
            matched.push(name.clone());
            let slot = &self.spec.inputs()[index];
            let Some(FeatureKind::MultiArrayType(array)) = slot.kind() else {
                continue;
            };
            let [channels, height, width] = array.shape[..] else {
                return Err(BuilderError::Shape(format!(
                    "image input '{name}' must have shape (channels, height, width), got {:?}",
                    array.shape
                )));
            };
            let color_space = match channels {
                1 => ColorSpace::Grayscale,
                3 if params.is_bgr => ColorSpace::Bgr,
                3 => ColorSpace::Rgb,
                other => {
                    return Err(BuilderError::Value(format!(
                        "image input '{name}' has {other} channels; only 1 or 3 are supported"
                    )))
                }
            };
            conversions.push((index, FeatureType::image(width, height, color_space)));
        }

        let description = self.description_mut();
        for (index, mut image) in conversions {
            let slot = &mut description.input[index];
            image.is_optional = slot.r#type.as_ref().is_some_and(|t| t.is_optional);
            tracing::debug!("input '{}' is now {image}", slot.name);
            slot.r#type = Some(image);
        }

        let scaler = NeuralNetworkImageScaler {
            channel_scale: params.image_scale,
            blue_bias: params.blue_bias,
            green_bias: params.green_bias,
            red_bias: params.red_bias,
            gray_bias: params.gray_bias,
        };
        let preprocessing = self.body_mut().preprocessing_mut();
        for feature_name in matched {
            preprocessing.push(NeuralNetworkPreprocessing {
                feature_name,
                preprocessor: Some(Preprocessor::Scaler(scaler.clone())),
            });
        }
        Ok(())
    }
}

/// Validates and then applies positional shape updates to `slots`.
fn set_shapes(
    slots: &mut [FeatureDescription],
    role: &str,
    names: &[&str],
    dims: &[Shape],
    data_type: ArrayDataType,
) -> Result<(), BuilderError> {
    if names.len() != dims.len() {
        return Err(BuilderError::Value(format!(
            "{} {role} names given with {} shapes",
            names.len(),
            dims.len()
        )));
    }

    let mut updates = Vec::with_capacity(names.len());
    for (index, (name, shape)) in names.iter().zip(dims).enumerate() {
        let slot = slots.get(index).ok_or_else(|| {
            BuilderError::State(format!(
                "{role} index {index} ('{name}') is past the {} declared {role}s",
                slots.len()
            ))
        })?;
        if slot.name != *name {
            return Err(BuilderError::State(format!(
                "{role} at index {index} is '{}', not '{name}'",
                slot.name
            )));
        }
        updates.push(interface_shape(name, shape)?);
    }

    for (slot, dims) in slots.iter_mut().zip(updates) {
        let feature_type = slot.r#type.get_or_insert_with(FeatureType::default);
        if let Some(previous) = feature_type.as_multi_array() {
            if !previous.shape.is_empty() && previous.shape != dims {
                tracing::warn!(
                    "{role} '{}' shape {:?} overwritten with {:?}",
                    slot.name,
                    previous.shape,
                    dims
                );
            }
        }
        let is_optional = feature_type.is_optional;
        *feature_type = FeatureType::multi_array(&dims, data_type);
        feature_type.is_optional = is_optional;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(mode: NetworkMode) -> NeuralNetworkBuilder {
        NeuralNetworkBuilder::new(
            &[("data", Shape::vector(3))],
            &[("probs", Shape::vector(2))],
            mode,
        )
        .unwrap()
    }

    fn shape_of(f: &FeatureDescription) -> Vec<i64> {
        f.r#type.as_ref().unwrap().as_multi_array().unwrap().shape.clone()
    }

    #[test]
    fn test_construct_bodies() {
        let plain = builder(NetworkMode::Plain);
        assert!(matches!(plain.spec().body, Some(ModelBody::NeuralNetwork(_))));
        let c = builder(NetworkMode::Classifier);
        assert!(matches!(c.spec().body, Some(ModelBody::NeuralNetworkClassifier(_))));
        let r = builder(NetworkMode::Regressor);
        assert!(matches!(r.spec().body, Some(ModelBody::NeuralNetworkRegressor(_))));
        assert_eq!(plain.spec().specification_version, 1);
    }

    #[test]
    fn test_construct_normalises_shapes() {
        let b = NeuralNetworkBuilder::new(
            &[("a", Shape::matrix(5, 7)), ("b", Shape::new(vec![3, 224, 224]))],
            &[("out", Shape::matrix(1, 10))],
            NetworkMode::Plain,
        )
        .unwrap();
        assert_eq!(shape_of(&b.spec().inputs()[0]), vec![7]);
        assert_eq!(shape_of(&b.spec().inputs()[1]), vec![3, 224, 224]);
        assert_eq!(shape_of(&b.spec().outputs()[0]), vec![10]);
        let array = b.spec().inputs()[0].r#type.as_ref().unwrap().as_multi_array().unwrap();
        assert_eq!(array.data_type(), ArrayDataType::Double);
    }

    #[test]
    fn test_construct_rejects_bad_rank() {
        for shape in [Shape::scalar(), Shape::new(vec![1, 2, 3, 4])] {
            let result = NeuralNetworkBuilder::new(&[("x", shape)], &[], NetworkMode::Plain);
            assert!(matches!(result, Err(BuilderError::Shape(_))));
        }
    }

    #[test]
    fn test_construct_rejects_duplicate_names() {
        let result = NeuralNetworkBuilder::new(
            &[("data", Shape::vector(3)), ("data", Shape::vector(4))],
            &[("probs", Shape::vector(2))],
            NetworkMode::Classifier,
        );
        assert!(matches!(result, Err(BuilderError::Value(_))));

        let result = NeuralNetworkBuilder::new(
            &[("data", Shape::vector(3))],
            &[("probs", Shape::vector(2)), ("probs", Shape::vector(2))],
            NetworkMode::Plain,
        );
        assert!(matches!(result, Err(BuilderError::Value(_))));

        // An input and an output may share a name.
        NeuralNetworkBuilder::new(
            &[("x", Shape::vector(3))],
            &[("x", Shape::vector(3))],
            NetworkMode::Plain,
        )
        .unwrap();
    }

    #[test]
    fn test_config_threads_version_and_dtype() {
        let config = BuilderConfig {
            specification_version: 4,
            array_data_type: "float32".into(),
            ..Default::default()
        };
        let b = NeuralNetworkBuilder::with_config(
            config,
            &[("x", Shape::vector(2))],
            &[],
            NetworkMode::Plain,
        )
        .unwrap();
        assert_eq!(b.spec().specification_version, 4);
        let array = b.spec().inputs()[0].r#type.as_ref().unwrap().as_multi_array().unwrap();
        assert_eq!(array.data_type(), ArrayDataType::Float32);
    }

    #[test]
    fn test_set_input_and_output() {
        let mut b = builder(NetworkMode::Plain);
        b.set_input(&["data"], &[Shape::matrix(4, 9)]).unwrap();
        b.set_output(&["probs"], &[Shape::new(vec![2, 1, 1])]).unwrap();
        assert_eq!(shape_of(&b.spec().inputs()[0]), vec![9]);
        assert_eq!(shape_of(&b.spec().outputs()[0]), vec![2, 1, 1]);
        // Last write wins.
        b.set_input(&["data"], &[Shape::vector(5)]).unwrap();
        assert_eq!(shape_of(&b.spec().inputs()[0]), vec![5]);
    }

    #[test]
    fn test_set_input_errors_leave_document_unchanged() {
        let mut b = builder(NetworkMode::Plain);
        let before = b.spec().clone();
        assert!(matches!(
            b.set_input(&["data", "extra"], &[Shape::vector(1), Shape::vector(2)]),
            Err(BuilderError::State(_))
        ));
        assert!(matches!(
            b.set_input(&["other"], &[Shape::vector(1)]),
            Err(BuilderError::State(_))
        ));
        assert!(matches!(
            b.set_input(&["data"], &[Shape::new(vec![1, 1, 1, 1])]),
            Err(BuilderError::Shape(_))
        ));
        assert!(matches!(
            b.set_output(&["probs"], &[]),
            Err(BuilderError::Value(_))
        ));
        assert_eq!(b.spec(), &before);
    }

    #[test]
    fn test_slot_lookup() {
        let b = builder(NetworkMode::Plain);
        assert_eq!(b.input_index("data"), Some(0));
        assert_eq!(b.output_index("probs"), Some(0));
        assert_eq!(b.input_index("probs"), None);
    }

    #[test]
    fn test_class_labels_int() {
        let mut b = builder(NetworkMode::Classifier);
        b.set_class_labels(&[ClassLabel::Int(0), ClassLabel::Int(1)], "classLabel").unwrap();
        let outputs = b.spec().outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].r#type.as_ref().unwrap().to_string(), "dictionary<int64>");
        assert_eq!(outputs[1].name, "classLabel");
        assert!(matches!(outputs[1].kind(), Some(FeatureKind::Int64Type(_))));
        let d = b.spec().description.as_ref().unwrap();
        assert_eq!(d.predicted_feature_name, "classLabel");
        assert_eq!(d.predicted_probabilities_name, "probs");
        match &b.spec().body {
            Some(ModelBody::NeuralNetworkClassifier(c)) => assert_eq!(
                c.class_labels,
                Some(ClassLabels::Int64ClassLabels(Int64Vector { vector: vec![0, 1] }))
            ),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_class_labels_promote_plain_body() {
        let mut b = builder(NetworkMode::Plain);
        b.add_softmax("sm", "data", "probs").unwrap();
        b.set_class_labels(&["cat".into(), "dog".into()], "label").unwrap();
        assert!(matches!(b.spec().body, Some(ModelBody::NeuralNetworkClassifier(_))));
        assert_eq!(b.layers().len(), 1);
        assert!(matches!(b.spec().outputs()[1].kind(), Some(FeatureKind::StringType(_))));
    }

    #[test]
    fn test_class_labels_repeat_replaces_slot() {
        let mut b = builder(NetworkMode::Classifier);
        b.set_class_labels(&[ClassLabel::Int(1)], "classLabel").unwrap();
        b.set_class_labels(&["a".into()], "classLabel").unwrap();
        assert_eq!(b.spec().outputs().len(), 2);
        assert!(matches!(b.spec().outputs()[1].kind(), Some(FeatureKind::StringType(_))));
    }

    #[test]
    fn test_class_labels_noop_and_errors() {
        let mut b = builder(NetworkMode::Classifier);
        let before = b.spec().clone();
        b.set_class_labels(&[], "classLabel").unwrap();
        assert_eq!(b.spec(), &before);

        assert!(matches!(
            b.set_class_labels(&[ClassLabel::Int(1), "two".into()], "classLabel"),
            Err(BuilderError::Type(_))
        ));
        assert_eq!(b.spec(), &before);

        let mut r = builder(NetworkMode::Regressor);
        assert!(matches!(
            r.set_class_labels(&[ClassLabel::Int(1)], "classLabel"),
            Err(BuilderError::State(_))
        ));

        let mut no_outputs =
            NeuralNetworkBuilder::new(&[("x", Shape::vector(1))], &[], NetworkMode::Classifier)
                .unwrap();
        assert!(matches!(
            no_outputs.set_class_labels(&[ClassLabel::Int(1)], "classLabel"),
            Err(BuilderError::State(_))
        ));
    }

    #[test]
    fn test_class_labels_reject_probability_name() {
        let mut b = builder(NetworkMode::Plain);
        let before = b.spec().clone();
        assert!(matches!(
            b.set_class_labels(&[ClassLabel::Int(0), ClassLabel::Int(1)], "probs"),
            Err(BuilderError::Value(_))
        ));
        assert_eq!(b.spec(), &before);
        assert!(matches!(b.spec().body, Some(ModelBody::NeuralNetwork(_))));
    }

    #[test]
    fn test_add_optionals() {
        let mut b = builder(NetworkMode::Plain);
        let before = b.spec().clone();
        b.add_optionals(&[], &[]).unwrap();
        assert_eq!(b.spec(), &before);

        b.add_optionals(&[("h0", 4)], &[("h_out", 4), ("c_out", 4)]).unwrap();
        assert_eq!(b.spec().inputs().len(), 2);
        assert_eq!(b.spec().outputs().len(), 3);
        let h0 = b.spec().inputs()[1].r#type.as_ref().unwrap();
        assert!(h0.is_optional);
        assert_eq!(h0.as_multi_array().unwrap().shape, vec![4]);
        assert_eq!(shape_of(&b.spec().inputs()[0]), vec![3]);
    }

    #[test]
    fn test_add_optionals_rejects_duplicates() {
        let mut b = builder(NetworkMode::Plain);
        let before = b.spec().clone();
        for (inputs, outputs) in [
            (&[("data", 5)][..], &[][..]),
            (&[("h0", 4), ("h0", 4)][..], &[][..]),
            (&[("h0", 4)][..], &[("probs", 2)][..]),
        ] {
            assert!(matches!(b.add_optionals(inputs, outputs), Err(BuilderError::Value(_))));
            assert_eq!(b.spec(), &before);
        }

        // Names only clash within their own list.
        b.add_optionals(&[("probs", 2)], &[("data", 3)]).unwrap();
        assert_eq!(b.input_index("probs"), Some(1));
        assert_eq!(b.output_index("data"), Some(1));
    }

    #[test]
    fn test_pre_processing_rgb_and_gray() {
        let mut b = NeuralNetworkBuilder::new(
            &[("image", Shape::new(vec![3, 20, 30])), ("mask", Shape::new(vec![1, 8, 8]))],
            &[("out", Shape::vector(2))],
            NetworkMode::Plain,
        )
        .unwrap();
        b.set_pre_processing_parameters(&PreprocessingParams {
            image_input_names: vec!["image".into(), "mask".into(), "missing".into()],
            is_bgr: true,
            red_bias: -1.0,
            image_scale: 0.5,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            b.spec().inputs()[0].r#type.as_ref().unwrap().to_string(),
            "image 30x20 BGR"
        );
        assert_eq!(
            b.spec().inputs()[1].r#type.as_ref().unwrap().to_string(),
            "image 8x8 GRAYSCALE"
        );
        let pre = b.spec().body.as_ref().unwrap().preprocessing();
        assert_eq!(pre.len(), 2);
        assert_eq!(pre[0].feature_name, "image");
        match &pre[0].preprocessor {
            Some(Preprocessor::Scaler(s)) => {
                assert_eq!(s.channel_scale, 0.5);
                assert_eq!(s.red_bias, -1.0);
            }
            other => panic!("unexpected preprocessor {other:?}"),
        }
    }

    #[test]
    fn test_pre_processing_errors() {
        let mut b = NeuralNetworkBuilder::new(
            &[("rgba", Shape::new(vec![4, 2, 2])), ("flat", Shape::vector(6))],
            &[],
            NetworkMode::Plain,
        )
        .unwrap();
        let before = b.spec().clone();
        let bad_channels = PreprocessingParams {
            image_input_names: vec!["rgba".into()],
            ..Default::default()
        };
        assert!(matches!(
            b.set_pre_processing_parameters(&bad_channels),
            Err(BuilderError::Value(_))
        ));
        let bad_rank = PreprocessingParams {
            image_input_names: vec!["flat".into()],
            ..Default::default()
        };
        assert!(matches!(
            b.set_pre_processing_parameters(&bad_rank),
            Err(BuilderError::Shape(_))
        ));
        assert_eq!(b.spec(), &before);

        b.set_pre_processing_parameters(&PreprocessingParams::default())
            .unwrap();
        assert_eq!(b.spec(), &before);
    }

    #[test]
    fn test_unresolved_blobs() {
        let mut b = builder(NetworkMode::Plain);
        b.add_softmax("a", "data", "hidden").unwrap();
        b.add_softmax("b", "ghost", "probs").unwrap();
        b.add_softmax("c", "hidden", "out2").unwrap();
        assert_eq!(
            b.unresolved_blobs(),
            vec![("b".to_owned(), "ghost".to_owned())]
        );
        let model = b.finish();
        assert_eq!(model.layers().len(), 3);
    }
}
