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

//! # Operators Module
//!
//! Operators and their building blocks.
//!
//! - **filter**: Field paths and the shared two-phase filter driver
//! - **flagged_words**: Flagged-word ratio filter
//! - **token**: Sub-word tokenizers and their registry
//! - **words**: Word extraction and n-gram augmentation
//!
//! Operators are typically created through factory functions and applied to
//! record batches through the [`crate::operator::ZiOperator`] trait.

pub mod filter;
pub mod flagged_words;
pub mod token;
pub mod words;
