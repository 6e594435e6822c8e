// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Writing and reading encoded model documents.

use crate::{Model, SpecError};
use prost::Message;
use std::path::Path;

/// Encodes `model` and writes it to `path`, replacing any existing file.
///
/// # Example
/// ```no_run
/// use model_spec::{io, Model};
/// io::save_spec(&Model::default(), "model.mlmodel").unwrap();
/// ```
pub fn save_spec(model: &Model, path: impl AsRef<Path>) -> Result<(), SpecError> {
    let path = path.as_ref();
    let bytes = model.encode_to_vec();
    std::fs::write(path, &bytes)?;
    tracing::info!(
        "wrote model document to '{}' ({} bytes, {} layers)",
        path.display(),
        bytes.len(),
        model.layers().len(),
    );
    Ok(())
}

/// Reads and decodes a document written by [`save_spec`].
pub fn load_spec(path: impl AsRef<Path>) -> Result<Model, SpecError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let model = Model::decode(bytes.as_slice())?;
    tracing::debug!(
        "read model document from '{}' (version {})",
        path.display(),
        model.specification_version
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelBody, NeuralNetworkRegressor};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("model-spec-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save_load.mlmodel");
        let model = Model {
            specification_version: 1,
            body: Some(ModelBody::NeuralNetworkRegressor(NeuralNetworkRegressor::default())),
            ..Default::default()
        };
        save_spec(&model, &path).unwrap();
        let loaded = load_spec(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_spec(temp_path("does-not-exist.mlmodel"));
        assert!(matches!(result, Err(SpecError::Io(_))));
    }

    #[test]
    fn test_load_garbage() {
        let path = temp_path("garbage.mlmodel");
        // Field 1 with the reserved wire type 7.
        std::fs::write(&path, [0x0F, 0xFF]).unwrap();
        let result = load_spec(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(SpecError::Decode(_))));
    }
}
