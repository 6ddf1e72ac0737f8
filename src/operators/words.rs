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

//! # Word Extraction
//!
//! Turns document text into the word units consumed by word-level filters.
//!
//! Extraction runs in three steps:
//!
//! 1. Split the document into raw tokens, with the injected sub-word
//!    tokenizer when one is configured and on whitespace otherwise.
//! 2. Strip leading and trailing special characters from every token and
//!    drop tokens that end up empty. Casing is left untouched.
//! 3. Optionally append augmented words: every run of `g` consecutive
//!    tokens joined with the join string, for each configured group size.
//!
//! Augmentation matters for scripts such as Chinese where a tokenizer emits
//! single characters while word lists store multi-character expressions.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::operators::token::ZiTokenizer;

/// Characters stripped from both ends of every token.
pub const SPECIAL_CHARACTERS: &str = concat!(
    // ASCII punctuation
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
    // ASCII digits
    "0123456789",
    // whitespace
    " \t\n\r\u{0b}\u{0c}\u{a0}\u{3000}\u{200b}\u{200e}\u{200f}\u{feff}",
    // typographic punctuation and symbols
    "’‘“”„‟–—―‐‑…•·・°′″´¨¸˜¯«»‹›¡¿§¶©®™℃",
    "€£¥¢₨₪¤%‰±×÷≈≤≥∞√∼≖⁄",
    "◆●■►▼▲▴∆▻★☆✱✦✓⊕♡♥♫♪❖➤➩☛☻▬═◦˚",
    // CJK punctuation
    "，。、：；！？（）【】《》〈〉「」『』〔〕〖〗～．",
    // sentencepiece word boundary marker
    "▁",
);

/// Returns the default strip set as a character set.
pub fn special_characters() -> HashSet<char> {
    SPECIAL_CHARACTERS.chars().collect()
}

/// N-gram augmentation settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiWordsAugmentation {
    pub group_sizes: Vec<usize>,
    pub join_char: String,
}

impl Default for ZiWordsAugmentation {
    fn default() -> Self {
        Self {
            group_sizes: vec![2],
            join_char: String::new(),
        }
    }
}

/// Separators recognised by [`split_on_whitespace`].
pub const WORD_SEPARATORS: [char; 3] = [' ', '\n', '\t'];

/// Splits `text` on spaces, newlines and tabs, never yielding empty tokens.
///
/// Other whitespace such as U+3000 or U+00A0 stays inside the token.
pub fn split_on_whitespace(text: &str) -> Vec<String> {
    text.split(WORD_SEPARATORS)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strips `strip_chars` from both ends of each word and drops empty words.
pub fn strip_words(words: Vec<String>, strip_chars: &HashSet<char>) -> Vec<String> {
    words
        .into_iter()
        .filter_map(|word| {
            let stripped = word.trim_matches(|c: char| strip_chars.contains(&c));
            if stripped.is_empty() {
                None
            } else if stripped.len() == word.len() {
                Some(word)
            } else {
                Some(stripped.to_string())
            }
        })
        .collect()
}

/// Joins every window of `group_size` consecutive words with `join_char`.
///
/// A group size of zero or larger than `words` yields nothing.
pub fn words_augmentation(words: &[String], group_size: usize, join_char: &str) -> Vec<String> {
    if group_size == 0 {
        return Vec::new();
    }
    words
        .windows(group_size)
        .map(|group| group.join(join_char))
        .collect()
}

/// Extracts the word sequence of a document.
///
/// The result is the stripped base words followed by the augmented words of
/// each group size in configuration order. Overlapping groups from different
/// sizes are kept as they are.
pub fn words_from_document(
    text: &str,
    tokenizer: Option<&dyn ZiTokenizer>,
    strip_chars: &HashSet<char>,
    augmentation: Option<&ZiWordsAugmentation>,
) -> Vec<String> {
    let raw = match tokenizer {
        Some(tokenizer) => tokenizer.encode_as_pieces(text),
        None => split_on_whitespace(text),
    };
    let mut words = strip_words(raw, strip_chars);

    if let Some(augmentation) = augmentation {
        let augmented: Vec<String> = augmentation
            .group_sizes
            .iter()
            .flat_map(|&size| words_augmentation(&words, size, &augmentation.join_char))
            .collect();
        words.extend(augmented);
    }
    words
}

/// Source of word sequences for word-level filters.
pub trait ZiWordExtractor: fmt::Debug + Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Default extractor built from a filter's tokenization settings.
#[derive(Debug, Clone)]
pub struct ZiDocumentWords {
    tokenizer: Option<Arc<dyn ZiTokenizer>>,
    strip_chars: HashSet<char>,
    augmentation: Option<ZiWordsAugmentation>,
}

impl Default for ZiDocumentWords {
    fn default() -> Self {
        Self::new()
    }
}

impl ZiDocumentWords {
    /// Whitespace splitting with the default strip set and no augmentation.
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self {
            tokenizer: None,
            strip_chars: special_characters(),
            augmentation: None,
        }
    }

    #[allow(non_snake_case)]
    pub fn with_tokenizer(mut self, tokenizer: Option<Arc<dyn ZiTokenizer>>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    #[allow(non_snake_case)]
    pub fn with_strip_chars(mut self, strip_chars: &str) -> Self {
        self.strip_chars = strip_chars.chars().collect();
        self
    }

    #[allow(non_snake_case)]
    pub fn with_augmentation(mut self, augmentation: Option<ZiWordsAugmentation>) -> Self {
        self.augmentation = augmentation;
        self
    }

    pub fn uses_tokenizer(&self) -> bool {
        self.tokenizer.is_some()
    }
}

impl ZiWordExtractor for ZiDocumentWords {
    fn extract(&self, text: &str) -> Vec<String> {
        words_from_document(
            text,
            self.tokenizer.as_deref(),
            &self.strip_chars,
            self.augmentation.as_ref(),
        )
    }
}
