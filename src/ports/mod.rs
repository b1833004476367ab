//! Ports - collaborator contracts the core depends on.
//!
//! - `answer_store` - Per-user answers and insights
//! - `text_generator` - External language model
//! - `question_source` - Raw question rows for the catalog

mod answer_store;
mod question_source;
mod text_generator;

pub use answer_store::AnswerStore;
pub use question_source::QuestionSource;
pub use text_generator::{GenerationError, GeneratorInfo, TextGenerator};
