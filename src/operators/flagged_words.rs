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

//! # Flagged Words Filter
//!
//! Keeps records whose share of flagged words stays at or below a maximum.
//!
//! The statistic is the number of extracted words found in the flagged-word
//! list of the configured language divided by the number of extracted words.
//! Documents without words get a ratio of exactly `0.0` and always pass.
//! Matching is exact string equality, without case folding.
//!
//! ## Configuration
//!
//! ```json
//! {
//!   "lang": "en",
//!   "tokenization": false,
//!   "max_ratio": 0.045,
//!   "flagged_words_dir": "assets",
//!   "use_words_aug": false,
//!   "words_aug_group_sizes": [2],
//!   "words_aug_join_char": ""
//! }
//! ```
//!
//! `lang = "all"` selects the union of every language's list.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assets::{load_words_asset, ZiWordLists};
use crate::errors::{Result, ZiError};
use crate::metrics::ZiRatioSummary;
use crate::operator::{ZiFilter, ZiOperator};
use crate::operators::filter::{apply_filter, ZiFieldPath};
use crate::operators::token::{ZiTokenizer, ZiTokenizerRegistry, SENTENCEPIECE_MODEL_TYPE};
use crate::operators::words::{ZiDocumentWords, ZiWordExtractor, ZiWordsAugmentation};
use crate::record::{ZiRecord, ZiRecordBatch};

/// Words type used to select flagged-word asset files.
pub const FLAGGED_WORDS_TYPE: &str = "flagged_words";

/// Options recognised by [`ZiFlaggedWordsFilter`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZiFlaggedWordsConfig {
    /// Field path of the document text.
    pub text_key: String,
    /// Language whose flagged words are used, or `"all"`.
    pub lang: String,
    /// Whether to split documents with the registered sub-word tokenizer.
    pub tokenization: bool,
    /// Largest accepted flagged-word ratio, inclusive.
    pub max_ratio: f64,
    /// Directory holding the flagged-word asset files.
    pub flagged_words_dir: PathBuf,
    pub use_words_aug: bool,
    pub words_aug_group_sizes: Vec<usize>,
    pub words_aug_join_char: String,
}

impl Default for ZiFlaggedWordsConfig {
    fn default() -> Self {
        Self {
            text_key: "payload.text".to_string(),
            lang: "en".to_string(),
            tokenization: false,
            max_ratio: 0.045,
            flagged_words_dir: PathBuf::from("assets"),
            use_words_aug: false,
            words_aug_group_sizes: vec![2],
            words_aug_join_char: String::new(),
        }
    }
}

impl ZiFlaggedWordsConfig {
    /// Parses a JSON configuration object; `null` yields the defaults.
    #[allow(non_snake_case)]
    pub fn from_value(config: &Value) -> Result<Self> {
        let config: Self = match config {
            Value::Null => Self::default(),
            other => serde_json::from_value(other.clone()).map_err(|err| {
                ZiError::validation(format!("invalid filter.flagged_words config: {err}"))
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses a YAML configuration document.
    #[allow(non_snake_case)]
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source).map_err(|err| {
            ZiError::validation(format!("invalid filter.flagged_words config: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.max_ratio) {
            return Err(ZiError::validation(format!(
                "filter.flagged_words 'max_ratio' must lie in [0, 1], got {}",
                self.max_ratio
            )));
        }
        if self.words_aug_group_sizes.contains(&0) {
            return Err(ZiError::validation(
                "filter.flagged_words 'words_aug_group_sizes' must be positive",
            ));
        }
        ZiFieldPath::parse(&self.text_key)?;
        Ok(())
    }

    /// Augmentation settings, present only when augmentation is enabled.
    pub fn augmentation(&self) -> Option<ZiWordsAugmentation> {
        self.use_words_aug.then(|| ZiWordsAugmentation {
            group_sizes: self.words_aug_group_sizes.clone(),
            join_char: self.words_aug_join_char.clone(),
        })
    }
}

/// Filter keeping records with a flagged-word ratio of at most `max_ratio`.
#[derive(Debug)]
pub struct ZiFlaggedWordsFilter {
    text_key: ZiFieldPath,
    lang: String,
    max_ratio: f64,
    flagged_words: HashSet<String>,
    extractor: Box<dyn ZiWordExtractor>,
}

impl ZiFlaggedWordsFilter {
    /// Builds the filter from already loaded word lists.
    ///
    /// Fails with a configuration error when `config.lang` has no list, after
    /// the merged `"all"` list has been derived.
    #[allow(non_snake_case)]
    pub fn new(
        config: &ZiFlaggedWordsConfig,
        word_lists: ZiWordLists,
        tokenizer: Option<Arc<dyn ZiTokenizer>>,
    ) -> Result<Self> {
        config.validate()?;
        let word_lists = word_lists.with_merged_all();
        let words = word_lists.get(&config.lang).ok_or_else(|| {
            ZiError::config(format!(
                "no flagged words for language '{}' (available: {})",
                config.lang,
                word_lists.languages().collect::<Vec<_>>().join(", ")
            ))
        })?;
        let flagged_words: HashSet<String> = words.iter().cloned().collect();

        let extractor = ZiDocumentWords::new()
            .with_tokenizer(tokenizer)
            .with_augmentation(config.augmentation());

        log::info!(
            "filter.flagged_words: lang={} flagged_words={} max_ratio={} tokenization={} words_aug={}",
            config.lang,
            flagged_words.len(),
            config.max_ratio,
            extractor.uses_tokenizer(),
            config.use_words_aug
        );

        Ok(Self {
            text_key: ZiFieldPath::parse(&config.text_key)?,
            lang: config.lang.clone(),
            max_ratio: config.max_ratio,
            flagged_words,
            extractor: Box::new(extractor),
        })
    }

    /// Loads the flagged-word assets and resolves the tokenizer, then builds
    /// the filter.
    #[allow(non_snake_case)]
    pub fn from_config(
        config: &ZiFlaggedWordsConfig,
        tokenizers: &ZiTokenizerRegistry,
    ) -> Result<Self> {
        config.validate()?;
        let word_lists = load_words_asset(&config.flagged_words_dir, FLAGGED_WORDS_TYPE)?;
        let tokenizer = if config.tokenization {
            Some(tokenizers.prepare(&config.lang, SENTENCEPIECE_MODEL_TYPE)?)
        } else {
            None
        };
        Self::new(config, word_lists, tokenizer)
    }

    /// Replaces the word extractor.
    #[allow(non_snake_case)]
    pub fn with_extractor(mut self, extractor: Box<dyn ZiWordExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn is_flagged(&self, word: &str) -> bool {
        self.flagged_words.contains(word)
    }

    /// Fraction of `words` that are flagged, `0.0` for no words, at most `1.0`.
    pub fn flagged_ratio(&self, words: &[String]) -> f64 {
        if words.is_empty() {
            return 0.0;
        }
        let flagged = words.iter().filter(|word| self.is_flagged(word)).count();
        (flagged as f64 / words.len() as f64).min(1.0)
    }
}

impl ZiFilter for ZiFlaggedWordsFilter {
    fn compute_stats(&self, record: &mut ZiRecord) {
        if record.stats.flagged_words_ratio.is_some() {
            return;
        }
        let text = self.text_key.resolve_str(record).unwrap_or_default();
        let words = self.extractor.extract(text);
        record.stats.flagged_words_ratio = Some(self.flagged_ratio(&words));
    }

    fn process(&self, record: &ZiRecord) -> bool {
        record
            .stats
            .flagged_words_ratio
            .map_or(false, |ratio| ratio <= self.max_ratio)
    }
}

impl ZiOperator for ZiFlaggedWordsFilter {
    fn name(&self) -> &'static str {
        "filter.flagged_words"
    }

    fn apply(&self, mut batch: ZiRecordBatch) -> Result<ZiRecordBatch> {
        for record in batch.iter_mut() {
            self.compute_stats(record);
        }
        let summary = ZiRatioSummary::compute(&batch);
        let kept = apply_filter(self, batch);
        log::debug!(
            "filter.flagged_words kept {} of {} records (lang={}, max_ratio={}, ratio mean={:.4} min={:.4} max={:.4})",
            kept.len(),
            summary.total_records,
            self.lang,
            self.max_ratio,
            summary.average_ratio,
            summary.min_ratio,
            summary.max_ratio
        );
        Ok(kept)
    }
}

/// Factory that constructs [`ZiFlaggedWordsFilter`] from JSON configuration.
#[allow(non_snake_case)]
pub fn flagged_words_filter_factory(
    config: &Value,
    tokenizers: &ZiTokenizerRegistry,
) -> Result<Box<dyn ZiOperator + Send + Sync>> {
    let config = ZiFlaggedWordsConfig::from_value(config)?;
    Ok(Box::new(ZiFlaggedWordsFilter::from_config(&config, tokenizers)?))
}
