//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Zi Error Module
//!
//! This module defines the error types used throughout the flagged-words
//! filter for consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors, typically while reading word assets
//! - **Validation**: Invalid operator options
//! - **Config**: Options that are well-formed but cannot be satisfied by the
//!   loaded assets or registered tokenizers
//! - **Operator**: Failures in operator implementations
//! - **Pipeline**: Pipeline orchestration failures
//! - **Serde**: Serialization/deserialization errors
//!
//! Configuration problems are always raised while an operator is being
//! constructed. Per-record processing does not fail.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Operator configuration that cannot be satisfied at construction time.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Any failure raised by an operator implementation.
    #[error("operator '{operator}' failed: {message}")]
    Operator { operator: String, message: String },

    /// Failures that occur while orchestrating a pipeline.
    #[error("pipeline error at stage '{stage}': {message}")]
    Pipeline { stage: String, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        ZiError::Config {
            message: message.into(),
        }
    }

    /// Helper to construct operator errors.
    pub fn operator(name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Operator {
            operator: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct pipeline errors.
    pub fn pipeline(stage: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Pipeline {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
