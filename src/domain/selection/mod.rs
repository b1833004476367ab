//! Selection module - next-question selection and completion detection.
//!
//! - `engine` - Gated, score-ordered walk over the catalog
//! - `policy` - Selection policies and `SelectionError`
//! - `completion` - Fully answered dimensions minus an exclude list

mod completion;
mod engine;
mod policy;

pub use completion::CompletionDetector;
pub use engine::SelectionEngine;
pub use policy::{SelectionError, SelectionPolicy};
