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

//! # Zi Pipeline Module
//!
//! Linear pipelines of operators built from configuration.
//!
//! A pipeline configuration is a list of steps:
//!
//! ```json
//! [
//!   {"operator": "filter.flagged_words", "config": {"lang": "en", "max_ratio": 0.05}}
//! ]
//! ```
//!
//! Operators are created once, when the pipeline is built, so asset loading
//! and tokenizer resolution errors surface before any record is processed.

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::metrics::ZiRatioSummary;
use crate::operator::{execute_operator, ZiOperator};
use crate::operators::token::ZiTokenizerRegistry;
use crate::record::ZiRecordBatch;

/// Creates an operator from its JSON configuration and the shared tokenizers.
pub type OperatorFactory =
    fn(&Value, &ZiTokenizerRegistry) -> Result<Box<dyn ZiOperator + Send + Sync>>;

/// Simple linear pipeline composed of sequential operators.
#[derive(Debug)]
pub struct ZiPipeline {
    stages: Vec<Box<dyn ZiOperator + Send + Sync>>,
}

impl ZiPipeline {
    /// Constructs a pipeline from a list of operators.
    pub fn new(stages: Vec<Box<dyn ZiOperator + Send + Sync>>) -> Self {
        ZiPipeline { stages }
    }

    /// Runs the pipeline, passing batches through each operator sequentially.
    pub fn run(&self, mut batch: ZiRecordBatch) -> Result<ZiRecordBatch> {
        for stage in &self.stages {
            let before = batch.len();
            batch = execute_operator(stage.as_ref(), batch)?;
            log::debug!("stage '{}': {} -> {} records", stage.name(), before, batch.len());
        }
        Ok(batch)
    }

    /// Ensures the pipeline contains at least one stage.
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(ZiError::pipeline("pipeline", "no stages configured"));
        }
        Ok(())
    }

    /// Executes the pipeline and summarises the ratios of the kept records.
    pub fn run_with_metrics(&self, batch: ZiRecordBatch) -> Result<(ZiRecordBatch, ZiRatioSummary)> {
        let processed = self.run(batch)?;
        let summary = ZiRatioSummary::compute(&processed);
        Ok((processed, summary))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }
}

/// Builder that knows how to instantiate operators from configuration.
#[derive(Debug, Default)]
pub struct ZiPipelineBuilder {
    factories: HashMap<String, OperatorFactory>,
    tokenizers: ZiTokenizerRegistry,
}

impl ZiPipelineBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-loaded with bundled operators.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.register(
            "filter.flagged_words",
            crate::operators::flagged_words::flagged_words_filter_factory as OperatorFactory,
        );
        builder
    }

    /// Registers a factory for the given operator name.
    pub fn register(&mut self, name: impl Into<String>, factory: OperatorFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Sets the tokenizers handed to every factory.
    pub fn with_tokenizers(mut self, tokenizers: ZiTokenizerRegistry) -> Self {
        self.tokenizers = tokenizers;
        self
    }

    /// Builds a pipeline from a sequence of configuration steps.
    pub fn build_from_config(&self, steps: &[Value]) -> Result<ZiPipeline> {
        let mut stages = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let object = step.as_object().ok_or_else(|| {
                ZiError::validation(format!("pipeline step #{index} must be an object"))
            })?;

            let operator_name = object
                .get("operator")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ZiError::validation(format!("pipeline step #{index} missing string 'operator'"))
                })?;

            let factory = self.factories.get(operator_name).ok_or_else(|| {
                ZiError::validation(format!("unknown operator '{operator_name}'"))
            })?;

            let config_value = object.get("config").cloned().unwrap_or(Value::Null);
            stages.push(factory(&config_value, &self.tokenizers)?);
        }

        let pipeline = ZiPipeline::new(stages);
        pipeline.validate()?;
        Ok(pipeline)
    }
}
