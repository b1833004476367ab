//! Text generator adapters.
//!
//! ## Available Adapters
//!
//! - `MockTextGenerator` - Configurable mock for testing
//! - `OpenAiTextGenerator` - OpenAI chat completions

mod mock_generator;
mod openai_generator;

pub use mock_generator::{MockTextGenerator, DEFAULT_MOCK_OUTPUT};
pub use openai_generator::{OpenAiConfig, OpenAiTextGenerator};
