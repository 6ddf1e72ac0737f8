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

//! # Zi Operator Module
//!
//! Core operator traits and execution helpers.
//!
//! ## Operators and Filters
//!
//! Every pipeline stage implements [`ZiOperator`], which maps a batch of
//! records to a new batch. Statistic-based filters additionally implement
//! [`ZiFilter`], which splits the work into two steps:
//!
//! - `compute_stats()`: computes and caches a statistic on the record
//! - `process()`: decides from the cached statistic whether to keep it
//!
//! Keeping the two steps apart lets an orchestrator persist statistics for
//! every record, including the ones that end up rejected.

use crate::errors::{Result, ZiError};
use crate::record::{ZiRecord, ZiRecordBatch};

/// Contracts that every Zi operator must fulfill.
pub trait ZiOperator: std::fmt::Debug {
    /// Unique, human-readable name for the operator.
    ///
    /// This name is used for logging, error messages and registry lookup.
    fn name(&self) -> &'static str;

    /// Applies the operator to an incoming batch of records.
    ///
    /// The operator may drop records (filters) but never fails on an
    /// individual malformed record.
    fn apply(&self, batch: ZiRecordBatch) -> Result<ZiRecordBatch>;
}

/// Two-phase contract for filters driven by a per-record statistic.
pub trait ZiFilter {
    /// Computes the filter statistic and stores it in `record.stats`.
    ///
    /// Implementations must skip the computation when the statistic is
    /// already present.
    fn compute_stats(&self, record: &mut ZiRecord);

    /// Returns true when the record should be kept.
    ///
    /// Callers are expected to run [`ZiFilter::compute_stats`] first.
    fn process(&self, record: &ZiRecord) -> bool;
}

/// Convenience helper to execute an operator while normalizing errors.
#[allow(non_snake_case)]
pub fn execute_operator(
    operator: &dyn ZiOperator,
    batch: ZiRecordBatch,
) -> Result<ZiRecordBatch> {
    operator
        .apply(batch)
        .map_err(|err| ZiError::operator(operator.name(), err.to_string()))
}
