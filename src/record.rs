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

//! # Zi Record Module
//!
//! ZiRecord is the unit of data that flows through Zi pipelines. Besides the
//! JSON payload and free-form metadata, every record owns a [`ZiStats`] block
//! where filters cache the statistics they compute, so that a statistic is
//! computed at most once per record no matter how many times a filter runs.
//!
//! ```rust
//! use zix_flagged::record::ZiRecord;
//! use serde_json::json;
//!
//! let mut record = ZiRecord::new(Some("doc-1".into()), json!({"text": "hello world"}));
//! assert!(record.stats.flagged_words_ratio.is_none());
//! record.stats.flagged_words_ratio = Some(0.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generic metadata map that may accompany a record.
pub type ZiMetadata = Map<String, Value>;

/// Per-record statistics computed by filters.
///
/// Well-known statistics are explicit optional fields; their presence means
/// the value has already been computed and is authoritative. Statistics from
/// other producers are kept in `extra` and round-trip untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiStats {
    /// Fraction of extracted words found in the flagged-word set, in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_words_ratio: Option<f64>,

    /// Statistics not owned by this crate.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ZiStats {
    /// Returns true when no statistic has been recorded.
    pub fn is_empty(&self) -> bool {
        self.flagged_words_ratio.is_none() && self.extra.is_empty()
    }
}

/// Fundamental data unit processed by Zi operators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZiRecord {
    /// Optional stable identifier for the record.
    pub id: Option<String>,

    /// Primary payload carrying user content, usually `{"text": "..."}`.
    pub payload: Value,

    /// Additional attributes such as tags or provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ZiMetadata>,

    /// Statistics cached by filters.
    #[serde(default, skip_serializing_if = "ZiStats::is_empty")]
    pub stats: ZiStats,
}

impl ZiRecord {
    /// Constructs a record with the given payload and optional identifier.
    #[allow(non_snake_case)]
    pub fn new(id: impl Into<Option<String>>, payload: Value) -> Self {
        ZiRecord {
            id: id.into(),
            payload,
            metadata: None,
            stats: ZiStats::default(),
        }
    }

    /// Attaches metadata to the record.
    #[allow(non_snake_case)]
    pub fn with_metadata(mut self, metadata: ZiMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns a mutable reference to the metadata map, creating it if necessary.
    #[allow(non_snake_case)]
    pub fn metadata_mut(&mut self) -> &mut ZiMetadata {
        self.metadata.get_or_insert_with(ZiMetadata::new)
    }
}

/// Convenience alias for working on batches of records.
pub type ZiRecordBatch = Vec<ZiRecord>;
