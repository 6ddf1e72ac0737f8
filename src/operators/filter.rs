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

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::operator::ZiFilter;
use crate::record::{ZiRecord, ZiRecordBatch};

/// Runs both filter phases over a batch and keeps the accepted records.
#[allow(non_snake_case)]
pub fn apply_filter<F>(filter: &F, batch: ZiRecordBatch) -> ZiRecordBatch
where
    F: ZiFilter + ?Sized,
{
    batch
        .into_iter()
        .filter_map(|mut record| {
            filter.compute_stats(&mut record);
            filter.process(&record).then_some(record)
        })
        .collect()
}

/// Dotted path into a record, rooted at `payload` or `metadata`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiFieldPath {
    segments: Vec<String>,
}

impl ZiFieldPath {
    #[allow(non_snake_case)]
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<String> = path
            .split('.')
            .map(|segment| segment.trim().to_string())
            .filter(|segment| !segment.is_empty())
            .collect();

        let first = segments
            .first()
            .ok_or_else(|| ZiError::validation("field path may not be empty"))?;

        if first != "payload" && first != "metadata" {
            return Err(ZiError::validation(
                "field path must start with 'payload' or 'metadata'",
            ));
        }

        if first == "metadata" && segments.len() == 1 {
            return Err(ZiError::validation(
                "metadata paths must include at least one key",
            ));
        }

        Ok(Self { segments })
    }

    #[allow(non_snake_case)]
    pub fn resolve<'a>(&self, record: &'a ZiRecord) -> Option<&'a Value> {
        let mut segments = self.segments.iter();
        let mut current = match segments.next()?.as_str() {
            "payload" => &record.payload,
            "metadata" => record.metadata.as_ref()?.get(segments.next()?)?,
            _ => return None,
        };
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Resolves the path to a string, treating anything else as absent.
    #[allow(non_snake_case)]
    pub fn resolve_str<'a>(&self, record: &'a ZiRecord) -> Option<&'a str> {
        self.resolve(record).and_then(Value::as_str)
    }
}
