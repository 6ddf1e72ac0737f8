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

//! # Zi Operator Tests - Flagged Words
//!
//! Tests for the flagged-word ratio filter.
//!
//! ## Test Categories
//!
//! - **Ratio Tests**: Word counting, empty documents, thresholds
//! - **Cache Tests**: Statistics are computed at most once per record
//! - **Asset Tests**: Loading lists from disk and the merged `all` list
//! - **Property Tests**: Ratio bounds and threshold monotonicity
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test flagged_words
//! ```

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use zix_flagged::operators::token::SENTENCEPIECE_MODEL_TYPE;
use zix_flagged::{
    ZiDocumentWords, ZiError, ZiFilter, ZiFlaggedWordsConfig, ZiFlaggedWordsFilter, ZiOperator,
    ZiRecord, ZiTokenizer, ZiTokenizerRegistry, ZiWordExtractor, ZiWordLists,
};

#[derive(Debug)]
struct CharTokenizer;

impl ZiTokenizer for CharTokenizer {
    fn encode_as_pieces(&self, text: &str) -> Vec<String> {
        text.chars().map(String::from).collect()
    }
}

/// Extractor that counts how often it is invoked.
#[derive(Debug)]
struct CountingExtractor {
    calls: Arc<AtomicUsize>,
    inner: ZiDocumentWords,
}

impl ZiWordExtractor for CountingExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.extract(text)
    }
}

fn word_lists(entries: Vec<(&str, Vec<&str>)>) -> ZiWordLists {
    entries
        .into_iter()
        .map(|(lang, words)| (lang, words.into_iter().map(String::from).collect::<Vec<String>>()))
        .collect()
}

fn config(max_ratio: f64) -> ZiFlaggedWordsConfig {
    ZiFlaggedWordsConfig {
        max_ratio,
        ..ZiFlaggedWordsConfig::default()
    }
}

fn english_filter(max_ratio: f64) -> ZiFlaggedWordsFilter {
    ZiFlaggedWordsFilter::new(&config(max_ratio), word_lists(vec![("en", vec!["bad"])]), None)
        .unwrap()
}

fn record(text: &str) -> ZiRecord {
    ZiRecord::new(None, json!({ "text": text }))
}

fn ratio_of(filter: &ZiFlaggedWordsFilter, text: &str) -> f64 {
    let mut record = record(text);
    filter.compute_stats(&mut record);
    record.stats.flagged_words_ratio.unwrap()
}

fn write_asset(dir: &Path, name: &str, content: serde_json::Value) {
    fs::write(dir.join(name), content.to_string()).unwrap();
}

fn asset_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_asset(dir.path(), "flagged_words_en.json", json!({"en": ["bad", "spam"]}));
    write_asset(dir.path(), "flagged_words_zh.json", json!({"zh": ["坏蛋"]}));
    write_asset(dir.path(), "stopwords.json", json!({"en": ["the", "a"]}));
    dir
}

/// Two of six words are flagged, so 0.3 rejects and 0.4 accepts.
#[test]
fn test_end_to_end_threshold() {
    let strict = english_filter(0.3);
    let mut first = record("this is a bad bad word");
    strict.compute_stats(&mut first);
    let ratio = first.stats.flagged_words_ratio.unwrap();
    assert!((ratio - 1.0 / 3.0).abs() < 1e-12);
    assert!(!strict.process(&first));

    let lenient = english_filter(0.4);
    let mut second = record("this is a bad bad word");
    lenient.compute_stats(&mut second);
    assert!(lenient.process(&second));
}

/// Matching is exact, without case folding.
#[test]
fn test_matching_is_case_sensitive() {
    let filter = english_filter(0.0);
    assert_eq!(ratio_of(&filter, "BAD Bad"), 0.0);
    assert_eq!(ratio_of(&filter, "bad, Bad!"), 0.5);
}

/// Empty documents score exactly zero and pass any threshold.
#[test]
fn test_empty_document_passes() {
    let filter = english_filter(0.0);
    for text in ["", "   ", "... !!!"] {
        let mut sample = record(text);
        filter.compute_stats(&mut sample);
        assert_eq!(sample.stats.flagged_words_ratio, Some(0.0));
        assert!(filter.process(&sample));
    }
}

/// A document exactly at the threshold is kept.
#[test]
fn test_threshold_is_inclusive() {
    let filter = english_filter(0.5);
    let mut sample = record("bad good");
    filter.compute_stats(&mut sample);
    assert_eq!(sample.stats.flagged_words_ratio, Some(0.5));
    assert!(filter.process(&sample));
}

/// The second computation on the same record does not extract words again.
#[test]
fn test_compute_stats_is_memoized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let filter = english_filter(0.5).with_extractor(Box::new(CountingExtractor {
        calls: Arc::clone(&calls),
        inner: ZiDocumentWords::new(),
    }));

    let mut sample = record("bad word");
    filter.compute_stats(&mut sample);
    let first = sample.stats.flagged_words_ratio;
    filter.compute_stats(&mut sample);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(sample.stats.flagged_words_ratio, first);
}

/// A ratio already stored on the record is authoritative.
#[test]
fn test_existing_ratio_is_not_recomputed() {
    let filter = english_filter(0.1);
    let mut sample: ZiRecord = serde_json::from_value(json!({
        "id": "cached",
        "payload": {"text": "bad bad bad"},
        "stats": {"flagged_words_ratio": 0.05}
    }))
    .unwrap();

    filter.compute_stats(&mut sample);
    assert_eq!(sample.stats.flagged_words_ratio, Some(0.05));
    assert!(filter.process(&sample));
}

/// Augmented groups give credit to multi-character flagged expressions.
#[test]
fn test_augmentation_changes_ratio() {
    let lists = || word_lists(vec![("zh", vec!["ab"])]);
    let base = ZiFlaggedWordsConfig {
        lang: "zh".into(),
        max_ratio: 0.2,
        ..ZiFlaggedWordsConfig::default()
    };

    let plain = ZiFlaggedWordsFilter::new(&base, lists(), Some(Arc::new(CharTokenizer))).unwrap();
    assert_eq!(ratio_of(&plain, "ab"), 0.0);

    let augmented_config = ZiFlaggedWordsConfig {
        use_words_aug: true,
        words_aug_group_sizes: vec![2],
        words_aug_join_char: String::new(),
        ..base
    };
    let augmented =
        ZiFlaggedWordsFilter::new(&augmented_config, lists(), Some(Arc::new(CharTokenizer)))
            .unwrap();
    let ratio = ratio_of(&augmented, "ab");
    assert!((ratio - 1.0 / 3.0).abs() < 1e-12);

    let mut sample = record("ab");
    augmented.compute_stats(&mut sample);
    assert!(!augmented.process(&sample));
}

/// Without an `all` entry, the merged list matches words of any language.
#[test]
fn test_all_language_merges_lists() {
    let dir = asset_dir();
    let config = ZiFlaggedWordsConfig {
        lang: "all".into(),
        max_ratio: 1.0,
        flagged_words_dir: dir.path().to_path_buf(),
        ..ZiFlaggedWordsConfig::default()
    };
    let filter = ZiFlaggedWordsFilter::from_config(&config, &ZiTokenizerRegistry::new()).unwrap();

    assert!(filter.is_flagged("bad"));
    assert!(filter.is_flagged("spam"));
    assert!(filter.is_flagged("坏蛋"));
    // stopwords.json does not match the flagged_words asset name
    assert!(!filter.is_flagged("the"));
    assert_eq!(ratio_of(&filter, "spam 坏蛋 fine the"), 0.5);
}

/// Lists are taken from the assets on disk for the configured language.
#[test]
fn test_from_config_uses_language_list() {
    let dir = asset_dir();
    let config = ZiFlaggedWordsConfig {
        flagged_words_dir: dir.path().to_path_buf(),
        ..config(0.045)
    };
    let filter = ZiFlaggedWordsFilter::from_config(&config, &ZiTokenizerRegistry::new()).unwrap();
    assert_eq!(filter.lang(), "en");
    assert!(filter.is_flagged("spam"));
    assert!(!filter.is_flagged("坏蛋"));
}

/// A language absent from the assets is a configuration error.
#[test]
fn test_unknown_language_is_config_error() {
    let dir = asset_dir();
    let config = ZiFlaggedWordsConfig {
        lang: "fr".into(),
        flagged_words_dir: dir.path().to_path_buf(),
        ..ZiFlaggedWordsConfig::default()
    };
    let err = ZiFlaggedWordsFilter::from_config(&config, &ZiTokenizerRegistry::new()).unwrap_err();
    assert!(matches!(err, ZiError::Config { .. }));
}

/// Unreadable assets propagate as IO errors, not configuration errors.
#[test]
fn test_missing_asset_dir_is_io_error() {
    let config = ZiFlaggedWordsConfig {
        flagged_words_dir: "/no/such/flagged/words".into(),
        ..ZiFlaggedWordsConfig::default()
    };
    let err = ZiFlaggedWordsFilter::from_config(&config, &ZiTokenizerRegistry::new()).unwrap_err();
    assert!(matches!(err, ZiError::Io(_)));
}

/// Malformed asset files propagate as serialization errors.
#[test]
fn test_malformed_asset_is_serde_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("flagged_words.json"), "{\"en\": \"bad\"}").unwrap();
    let config = ZiFlaggedWordsConfig {
        flagged_words_dir: dir.path().to_path_buf(),
        ..ZiFlaggedWordsConfig::default()
    };
    let err = ZiFlaggedWordsFilter::from_config(&config, &ZiTokenizerRegistry::new()).unwrap_err();
    assert!(matches!(err, ZiError::Serde(_)));
}

/// Tokenization requires a tokenizer registered for the language.
#[test]
fn test_tokenization_resolves_from_registry() {
    let dir = asset_dir();
    let config = ZiFlaggedWordsConfig {
        lang: "zh".into(),
        tokenization: true,
        use_words_aug: true,
        max_ratio: 0.3,
        flagged_words_dir: dir.path().to_path_buf(),
        ..ZiFlaggedWordsConfig::default()
    };

    let err = ZiFlaggedWordsFilter::from_config(&config, &ZiTokenizerRegistry::new()).unwrap_err();
    assert!(matches!(err, ZiError::Config { .. }));

    let mut registry = ZiTokenizerRegistry::new();
    registry.register("zh", SENTENCEPIECE_MODEL_TYPE, Arc::new(CharTokenizer));
    let filter = ZiFlaggedWordsFilter::from_config(&config, &registry).unwrap();

    // four characters plus three pairs, only 坏蛋 is flagged
    let ratio = ratio_of(&filter, "你是坏蛋");
    assert!((ratio - 1.0 / 7.0).abs() < 1e-12);
}

/// Applying the operator keeps passing records and caches every ratio.
#[test]
fn test_apply_filters_batch() {
    let filter = english_filter(0.25);
    let batch = vec![
        ZiRecord::new(Some("clean".into()), json!({"text": "a perfectly fine sentence"})),
        ZiRecord::new(Some("dirty".into()), json!({"text": "bad bad spam"})),
        ZiRecord::new(Some("empty".into()), json!({"text": ""})),
    ];

    let kept = filter.apply(batch).unwrap();
    let ids: Vec<_> = kept.iter().filter_map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, vec!["clean", "empty"]);
    assert!(kept.iter().all(|r| r.stats.flagged_words_ratio.is_some()));
}

/// Scoring the batch for the summary does not extract words twice.
#[test]
fn test_apply_extracts_each_record_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let filter = english_filter(0.25).with_extractor(Box::new(CountingExtractor {
        calls: Arc::clone(&calls),
        inner: ZiDocumentWords::new(),
    }));
    let batch = vec![
        ZiRecord::new(Some("clean".into()), json!({"text": "fine words"})),
        ZiRecord::new(Some("dirty".into()), json!({"text": "bad bad"})),
    ];

    let kept = filter.apply(batch).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].stats.flagged_words_ratio, Some(0.0));
}

/// A CJK ideographic space does not split the flagged expression.
#[test]
fn test_ideographic_space_keeps_one_word() {
    let filter = ZiFlaggedWordsFilter::new(
        &ZiFlaggedWordsConfig {
            lang: "zh".into(),
            ..config(0.5)
        },
        word_lists(vec![("zh", vec!["坏蛋"])]),
        None,
    )
    .unwrap();
    assert_eq!(ratio_of(&filter, "坏蛋\u{3000}你好"), 0.0);
    assert_eq!(ratio_of(&filter, "坏蛋 你好"), 0.5);
}

proptest! {
    /// The stored ratio always lies in [0, 1].
    #[test]
    fn prop_ratio_in_unit_interval(words in prop::collection::vec("[a-c]{1,3}|bad|[.!]{1,2}", 0..24)) {
        let filter = english_filter(0.5);
        let ratio = ratio_of(&filter, &words.join(" "));
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    /// A record passes exactly when its ratio is at most the threshold.
    #[test]
    fn prop_process_is_monotonic_in_threshold(
        words in prop::collection::vec("[a-c]{1,2}|bad", 0..16),
        max_ratio in 0.0f64..=1.0,
    ) {
        let filter = english_filter(max_ratio);
        let mut sample = record(&words.join(" "));
        filter.compute_stats(&mut sample);
        let ratio = sample.stats.flagged_words_ratio.unwrap();
        prop_assert_eq!(filter.process(&sample), ratio <= max_ratio);
    }
}
