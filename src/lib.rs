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

//! # Zi Flagged Words
//!
//! Document-quality filter that rejects records whose share of flagged words
//! (profanity, toxicity and spam markers) exceeds a configured maximum.
//!
//! ## Module Overview
//!
//! - **record**: ZiRecord and the per-record statistics cache
//! - **operator**: Operator and two-phase filter traits
//! - **operators**: Word extraction, tokenizers and the flagged-words filter
//! - **assets**: Loading of per-language word lists
//! - **pipeline**: Config-driven linear pipelines
//! - **metrics**: Ratio summaries over processed records
//!
//! ## Quick Start
//!
//! ```rust
//! use zix_flagged::{ZiPipelineBuilder, ZiRecord};
//! use serde_json::json;
//!
//! let pipeline = ZiPipelineBuilder::with_defaults()
//!     .build_from_config(&[json!({
//!         "operator": "filter.flagged_words",
//!         "config": {"lang": "en", "max_ratio": 0.05, "flagged_words_dir": "assets"}
//!     })])
//!     .unwrap();
//!
//! let kept = pipeline
//!     .run(vec![ZiRecord::new(Some("1".into()), json!({"text": "hello world"}))])
//!     .unwrap();
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, ZiError>`. Configuration and
//! asset errors are raised while operators are built; filtering a record
//! never fails.

pub mod assets;
pub mod errors;
pub mod metrics;
pub mod operator;
pub mod operators;
pub mod pipeline;
pub mod record;

pub use assets::{load_words_asset, ZiWordLists, ALL_LANGUAGES};
pub use errors::{Result, ZiError};
pub use metrics::ZiRatioSummary;
pub use operator::{execute_operator, ZiFilter, ZiOperator};
pub use operators::flagged_words::{
    flagged_words_filter_factory, ZiFlaggedWordsConfig, ZiFlaggedWordsFilter,
};
pub use operators::token::{ZiTiktokenTokenizer, ZiTokenizer, ZiTokenizerRegistry, ZiTokenizerType};
pub use operators::words::{ZiDocumentWords, ZiWordExtractor, ZiWordsAugmentation};
pub use pipeline::{ZiPipeline, ZiPipelineBuilder};
pub use record::{ZiMetadata, ZiRecord, ZiRecordBatch, ZiStats};
