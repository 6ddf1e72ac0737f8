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

use serde::Serialize;
use serde_json::Value;

use crate::record::ZiRecord;

/// Summary of the flagged-word ratios cached on a set of records.
#[derive(Debug, Serialize, Default, PartialEq)]
pub struct ZiRatioSummary {
    pub total_records: usize,
    /// Records carrying a `flagged_words_ratio` statistic.
    pub scored_records: usize,
    pub average_ratio: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl ZiRatioSummary {
    #[allow(non_snake_case)]
    pub fn compute(records: &[ZiRecord]) -> Self {
        let ratios: Vec<f64> = records
            .iter()
            .filter_map(|record| record.stats.flagged_words_ratio)
            .collect();

        let mut summary = ZiRatioSummary {
            total_records: records.len(),
            scored_records: ratios.len(),
            ..ZiRatioSummary::default()
        };
        if ratios.is_empty() {
            return summary;
        }

        summary.average_ratio = ratios.iter().sum::<f64>() / ratios.len() as f64;
        summary.min_ratio = ratios.iter().copied().fold(f64::INFINITY, f64::min);
        summary.max_ratio = ratios.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        summary
    }

    #[allow(non_snake_case)]
    pub fn as_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
