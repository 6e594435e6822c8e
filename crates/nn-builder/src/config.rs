// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Builder configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! specification_version = 1
//! array_data_type = "double"
//! cell_clip_threshold = 50.0
//! batchnorm_epsilon = 1e-5
//! ```

use crate::BuilderError;
use model_spec::ArrayDataType;
use std::path::Path;

/// Defaults threaded into every document the builder creates.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Version number written into the document header.
    pub specification_version: i32,
    /// Element type of multi-array interface slots: `"double"`, `"float32"` or `"int32"`.
    pub array_data_type: String,
    /// LSTM cell clip threshold when a layer does not set its own.
    pub cell_clip_threshold: f32,
    /// Batch-normalisation epsilon when a layer does not set its own.
    pub batchnorm_epsilon: f32,
}

impl BuilderConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, BuilderError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BuilderError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string and checks its values.
    pub fn from_toml(toml_str: &str) -> Result<Self, BuilderError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| BuilderError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, BuilderError> {
        toml::to_string_pretty(self)
            .map_err(|e| BuilderError::Config(format!("TOML serialise error: {e}")))
    }

    /// Parses [`array_data_type`](Self::array_data_type).
    pub fn array_data_type(&self) -> Result<ArrayDataType, BuilderError> {
        match self.array_data_type.to_lowercase().as_str() {
            "double" | "float64" => Ok(ArrayDataType::Double),
            "float32" | "float" => Ok(ArrayDataType::Float32),
            "int32" => Ok(ArrayDataType::Int32),
            other => Err(BuilderError::Config(format!(
                "unknown array data type '{other}'; expected 'double', 'float32', or 'int32'"
            ))),
        }
    }

    /// Checks every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), BuilderError> {
        self.array_data_type()?;
        if self.specification_version < 1 {
            return Err(BuilderError::Config(format!(
                "specification_version must be >= 1, got {}",
                self.specification_version
            )));
        }
        if self.cell_clip_threshold.is_nan() || self.cell_clip_threshold <= 0.0 {
            return Err(BuilderError::Config(format!(
                "cell_clip_threshold must be positive, got {}",
                self.cell_clip_threshold
            )));
        }
        if self.batchnorm_epsilon.is_nan() || self.batchnorm_epsilon <= 0.0 {
            return Err(BuilderError::Config(format!(
                "batchnorm_epsilon must be positive, got {}",
                self.batchnorm_epsilon
            )));
        }
        Ok(())
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            specification_version: crate::SPECIFICATION_VERSION,
            array_data_type: "double".to_string(),
            cell_clip_threshold: 50.0,
            batchnorm_epsilon: 1e-5,
        }
    }
}
