//! Research stages of deck generation: web search, source extraction and
//! structured outline synthesis, plus the [`Pipeline`] that drives them.

pub mod extract;
pub mod openai;
pub mod pipeline;
pub mod search;
pub mod synthesize;

#[cfg(test)]
mod test_server;

pub use extract::{html_to_text, HttpFetcher, PageFetcher, SourceExtractor};
pub use openai::{LanguageModel, Message, OpenAiClient, StructuredRequest};
pub use pipeline::Pipeline;
pub use search::{GoogleSearch, SearchProvider};
pub use synthesize::{outline_schema, OutlineSynthesizer, SCHEMA_NAME};
