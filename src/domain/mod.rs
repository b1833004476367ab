//! Domain layer containing the questionnaire logic and its types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, state machine)
//! - `taxonomy` - Immutable question catalog
//! - `answers` - Per-user answer snapshots and derived progress
//! - `daily` - Daily visit streaks and the paragraph catalog
//! - `scoring` - Dimension and facet averages
//! - `selection` - Next-question selection and completion detection
//! - `insights` - Insight events, prompts and payload extraction

pub mod answers;
pub mod daily;
pub mod foundation;
pub mod insights;
pub mod scoring;
pub mod selection;
pub mod taxonomy;
