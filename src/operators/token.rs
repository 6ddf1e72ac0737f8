//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
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

//! Sub-word tokenizers used for word extraction.
//!
//! Tokenizers are never looked up globally by the operators. They are
//! registered in a [`ZiTokenizerRegistry`] which is handed to the operator
//! factories, and the resolved tokenizer is injected into the word extractor.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tiktoken_rs::CoreBPE;

use crate::errors::{Result, ZiError};

/// Model type key used by word-level filters.
pub const SENTENCEPIECE_MODEL_TYPE: &str = "sentencepiece";

/// Capability to split a document into sub-word piece strings.
pub trait ZiTokenizer: fmt::Debug + Send + Sync {
    /// Encodes `text` into its ordered sequence of pieces.
    fn encode_as_pieces(&self, text: &str) -> Vec<String>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiTokenizerType {
    #[default]
    Cl100kBase,
    P50kBase,
    R50kBase,
    O200kBase,
}

impl ZiTokenizerType {
    pub fn from_model(model: &str) -> Self {
        match model.to_lowercase().as_str() {
            "p50k_base" | "text-davinci-003" => Self::P50kBase,
            "r50k_base" | "davinci" => Self::R50kBase,
            "o200k_base" | "gpt-4o" | "gpt-4o-mini" => Self::O200kBase,
            _ => Self::Cl100kBase,
        }
    }
}

static CL100K_BPE: OnceLock<CoreBPE> = OnceLock::new();
static P50K_BPE: OnceLock<CoreBPE> = OnceLock::new();
static R50K_BPE: OnceLock<CoreBPE> = OnceLock::new();
static O200K_BPE: OnceLock<CoreBPE> = OnceLock::new();

fn get_bpe(tokenizer_type: ZiTokenizerType) -> Result<&'static CoreBPE> {
    let cell = match tokenizer_type {
        ZiTokenizerType::Cl100kBase => &CL100K_BPE,
        ZiTokenizerType::P50kBase => &P50K_BPE,
        ZiTokenizerType::R50kBase => &R50K_BPE,
        ZiTokenizerType::O200kBase => &O200K_BPE,
    };
    if let Some(bpe) = cell.get() {
        return Ok(bpe);
    }

    let bpe = match tokenizer_type {
        ZiTokenizerType::Cl100kBase => tiktoken_rs::cl100k_base(),
        ZiTokenizerType::P50kBase => tiktoken_rs::p50k_base(),
        ZiTokenizerType::R50kBase => tiktoken_rs::r50k_base(),
        ZiTokenizerType::O200kBase => tiktoken_rs::o200k_base(),
    }
    .map_err(|err| ZiError::config(format!("failed to load {tokenizer_type:?} encoder: {err}")))?;

    Ok(cell.get_or_init(|| bpe))
}

/// Byte-pair-encoding tokenizer backed by tiktoken encodings.
///
/// Tokens that end inside a multi-byte character are merged with the
/// following tokens so every piece is valid UTF-8.
pub struct ZiTiktokenTokenizer {
    tokenizer_type: ZiTokenizerType,
    bpe: &'static CoreBPE,
}

impl ZiTiktokenTokenizer {
    #[allow(non_snake_case)]
    pub fn new(tokenizer_type: ZiTokenizerType) -> Result<Self> {
        Ok(Self {
            tokenizer_type,
            bpe: get_bpe(tokenizer_type)?,
        })
    }
}

impl fmt::Debug for ZiTiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiTiktokenTokenizer")
            .field("tokenizer_type", &self.tokenizer_type)
            .finish()
    }
}

impl ZiTokenizer for ZiTiktokenTokenizer {
    fn encode_as_pieces(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut pending = Vec::new();
        for token in self.bpe.encode_ordinary(text) {
            pending.push(token);
            if let Ok(piece) = self.bpe.decode(pending.clone()) {
                pieces.push(piece);
                pending.clear();
            }
        }
        pieces
    }
}

/// Explicit registry of tokenizers keyed by language and model type.
#[derive(Debug, Default, Clone)]
pub struct ZiTokenizerRegistry {
    inner: HashMap<String, Arc<dyn ZiTokenizer>>,
}

impl ZiTokenizerRegistry {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the lookup key for a language and model type.
    pub fn model_key(lang: &str, model_type: &str) -> String {
        format!("{model_type}:{lang}")
    }

    #[allow(non_snake_case)]
    pub fn register(&mut self, lang: &str, model_type: &str, tokenizer: Arc<dyn ZiTokenizer>) {
        self.inner
            .insert(Self::model_key(lang, model_type), tokenizer);
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ZiTokenizer>> {
        self.inner.get(key).cloned()
    }

    /// Resolves the tokenizer for `lang`, failing when none was registered.
    #[allow(non_snake_case)]
    pub fn prepare(&self, lang: &str, model_type: &str) -> Result<Arc<dyn ZiTokenizer>> {
        let key = Self::model_key(lang, model_type);
        self.get(&key)
            .ok_or_else(|| ZiError::config(format!("no tokenizer registered for '{key}'")))
    }
}
