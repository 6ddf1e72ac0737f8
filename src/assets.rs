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

//! # Word Assets
//!
//! Loading of per-language word lists from JSON asset files.
//!
//! An asset directory holds one or more JSON files whose file name contains
//! the words type (for example `flagged_words.json`). Each file is an object
//! mapping a language code to a list of words:
//!
//! ```json
//! {"en": ["badword", "spam"], "zh": ["坏词"]}
//! ```
//!
//! Lists for the same language found in several files are concatenated.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::Result;

/// Language code under which every language's list is merged.
pub const ALL_LANGUAGES: &str = "all";

/// Per-language word lists. Duplicates are allowed and order is irrelevant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiWordLists {
    inner: BTreeMap<String, Vec<String>>,
}

impl ZiWordLists {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `words` to the list of `lang`.
    pub fn extend<I, S>(&mut self, lang: impl Into<String>, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .entry(lang.into())
            .or_default()
            .extend(words.into_iter().map(Into::into));
    }

    pub fn get(&self, lang: &str) -> Option<&[String]> {
        self.inner.get(lang).map(Vec::as_slice)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Derives the `"all"` list when the asset did not provide one.
    ///
    /// The merged list is the concatenation of every language's list, each
    /// taken exactly once. An existing `"all"` entry is kept unchanged.
    #[allow(non_snake_case)]
    pub fn with_merged_all(mut self) -> Self {
        if !self.inner.contains_key(ALL_LANGUAGES) {
            let merged: Vec<String> = self.inner.values().flatten().cloned().collect();
            log::debug!(
                "derived '{}' word list with {} entries from {} languages",
                ALL_LANGUAGES,
                merged.len(),
                self.inner.len()
            );
            self.inner.insert(ALL_LANGUAGES.to_string(), merged);
        }
        self
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for ZiWordLists {
    fn from_iter<T: IntoIterator<Item = (S, Vec<String>)>>(iter: T) -> Self {
        let mut lists = ZiWordLists::new();
        for (lang, words) in iter {
            lists.extend(lang, words);
        }
        lists
    }
}

/// Loads every JSON asset in `words_dir` whose file name contains `words_type`.
///
/// Files are read in file-name order. IO and parse failures are returned as
/// they occur.
#[allow(non_snake_case)]
pub fn load_words_asset(words_dir: impl AsRef<Path>, words_type: &str) -> Result<ZiWordLists> {
    let words_dir = words_dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(words_dir)? {
        let path = entry?.path();
        let matches = path.is_file()
            && path.extension().map_or(false, |ext| ext == "json")
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.contains(words_type));
        if matches {
            paths.push(path);
        }
    }
    paths.sort();

    let mut lists = ZiWordLists::new();
    for path in &paths {
        let content = fs::read_to_string(path)?;
        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;
        for (lang, words) in parsed {
            lists.extend(lang, words);
        }
    }

    log::debug!(
        "loaded {} '{}' asset file(s) from {}",
        paths.len(),
        words_type,
        words_dir.display()
    );
    Ok(lists)
}
