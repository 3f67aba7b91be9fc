//! Core domain types, settings, text helpers and outline validation
//! for turning a topic into a researched slide deck.

pub mod config;
pub mod error;
pub mod outline;
pub mod text;
pub mod types;

pub use config::{Credentials, ExtractionLimits, GenerationOptions, Settings, SourceBudget};
pub use error::{Error, Result};
pub use outline::{Adjustment, Bounds};
pub use types::{
    CompactSource, DeckRenderer, OutlineSection, RenderedSection, SearchResult, SlideOutline,
    SourceExcerpt, SourceRef,
};
