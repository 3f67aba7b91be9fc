//! Domain types flowing through the search → extract → synthesize → render pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::SourceBudget;
use crate::text::truncate_chars;
use crate::Result;

/// Heading of the overview slide.
pub const OVERVIEW_HEADING: &str = "Overview";

/// Heading of the takeaways slide.
pub const TAKEAWAYS_HEADING: &str = "Key Takeaways";

/// Heading of the sources slide.
pub const SOURCES_HEADING: &str = "Sources";

/// One ranked hit from the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Clipped plain text of one fetched page.
///
/// `text` is never empty; the extractor discards pages that yield nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceExcerpt {
    pub title: String,
    pub url: String,
    pub text: String,
}

impl SourceExcerpt {
    /// Trim every field to the per-request budget.
    pub fn compact(&self, budget: &SourceBudget) -> CompactSource {
        CompactSource {
            title: truncate_chars(&self.title, budget.title_chars).to_string(),
            url: truncate_chars(&self.url, budget.url_chars).to_string(),
            extract: truncate_chars(&self.text, budget.extract_chars).to_string(),
        }
    }
}

/// The form in which an excerpt is serialized into the model prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactSource {
    pub title: String,
    pub url: String,
    pub extract: String,
}

/// Structured outline returned by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideOutline {
    pub title: String,
    pub overview: Vec<String>,
    pub slides: Vec<OutlineSection>,
    pub takeaways: Vec<String>,
    pub sources: Vec<SourceRef>,
}

impl SlideOutline {
    /// Flatten the outline into one section per non-title slide, in render order.
    pub fn sections(&self) -> Vec<RenderedSection> {
        let mut sections = Vec::with_capacity(self.slides.len() + 3);

        sections.push(RenderedSection::new(OVERVIEW_HEADING, self.overview.clone()));
        for slide in &self.slides {
            sections.push(RenderedSection::new(&slide.heading, slide.bullets.clone()));
        }
        sections.push(RenderedSection::new(TAKEAWAYS_HEADING, self.takeaways.clone()));
        sections.push(RenderedSection::new(
            SOURCES_HEADING,
            self.sources.iter().map(SourceRef::bullet).collect(),
        ));

        sections
    }

    /// Number of slides a renderer emits for this outline, title slide included.
    pub fn slide_count(&self) -> usize {
        1 + self.slides.len() + 3
    }
}

/// One of the body topics of an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutlineSection {
    pub heading: String,
    pub bullets: Vec<String>,
}

/// A cited source as reported by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

impl SourceRef {
    /// Bullet line shown on the sources slide.
    pub fn bullet(&self) -> String {
        format!("{} - {}", self.title, self.url)
    }
}

/// Heading and bullets of exactly one rendered slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub heading: String,
    pub bullets: Vec<String>,
}

impl RenderedSection {
    pub fn new(heading: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            bullets,
        }
    }
}

/// Turns an outline into a presentation file.
pub trait DeckRenderer {
    /// Write the deck for `outline` to `path`.
    ///
    /// Implementations must not leave a partial file behind on failure.
    fn render(&self, outline: &SlideOutline, path: &Path) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn strings(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{} {}", prefix, i)).collect()
    }

    /// An outline at the schema's nominal shape.
    pub fn outline() -> SlideOutline {
        SlideOutline {
            title: "Quantum Computing".to_string(),
            overview: strings("Overview point", 4),
            slides: (1..=4)
                .map(|i| OutlineSection {
                    heading: format!("Section {}", i),
                    bullets: strings(&format!("Section {} bullet", i), 3),
                })
                .collect(),
            takeaways: strings("Takeaway", 3),
            sources: (1..=5)
                .map(|i| SourceRef {
                    title: format!("Source {}", i),
                    url: format!("https://example.com/{}", i),
                })
                .collect(),
        }
    }
}
