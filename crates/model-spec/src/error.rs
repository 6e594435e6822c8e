// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for document I/O and inspection.

/// Errors that can occur when reading, writing or summarising a document.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The document file could not be read or written.
    #[error("model document I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a valid encoded document.
    #[error("failed to decode model document: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The summary could not be rendered as JSON.
    #[error("failed to serialise summary: {0}")]
    Summary(#[from] serde_json::Error),
}
