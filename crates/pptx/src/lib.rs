//! PPTX (Office Open XML) backend for generated slide decks.
//!
//! Writes a [`SlideOutline`](slidesmith_core::SlideOutline) as a .pptx package
//! built from static master/layout/theme parts plus generated slides, and reads
//! the text of a deck back for verification.

mod parts;
pub mod reader;
mod slide;
mod template;
pub mod writer;
mod xml;

pub use reader::{Deck, DeckSlide, PptxReader, SlideLine};
pub use writer::PptxRenderer;
