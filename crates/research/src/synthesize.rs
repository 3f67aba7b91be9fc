//! Outline synthesis: one structured-generation call grounded in the excerpts.

use serde_json::{json, Value};
use slidesmith_core::outline::{
    Bounds, BULLET_BOUNDS, OVERVIEW_BOUNDS, SECTION_BOUNDS, SOURCE_BOUNDS, TAKEAWAY_BOUNDS,
};
use slidesmith_core::{
    CompactSource, Error, GenerationOptions, Result, SlideOutline, SourceBudget, SourceExcerpt,
};

use crate::openai::{LanguageModel, StructuredRequest};

/// Name of the response schema sent with every request.
pub const SCHEMA_NAME: &str = "SlideDeck";

const SYSTEM_PROMPT: &str = "You are SlideSmith, a research assistant that synthesizes a crisp, factual presentation outline. \
Write in concise bullets, avoid marketing language, and prefer concrete facts with dates. \
All content must be self-contained, objective and neutral, written in the third person. \
Combine general knowledge with the provided sources; when using claims from sources, prefer those facts and \
reflect them accurately. Never invent URLs.";

/// Asks a language model for a [`SlideOutline`].
pub struct OutlineSynthesizer<M> {
    model: M,
    options: GenerationOptions,
    budget: SourceBudget,
}

impl<M: LanguageModel> OutlineSynthesizer<M> {
    pub fn new(model: M, options: GenerationOptions, budget: SourceBudget) -> Self {
        Self {
            model,
            options,
            budget,
        }
    }

    /// Trimmed view of the first `max_sources` excerpts.
    pub fn compact_sources(&self, excerpts: &[SourceExcerpt]) -> Vec<CompactSource> {
        excerpts
            .iter()
            .take(self.budget.max_sources)
            .map(|e| e.compact(&self.budget))
            .collect()
    }

    /// The request sent for `query` grounded in `excerpts`.
    pub fn request(&self, excerpts: &[SourceExcerpt], query: &str) -> Result<StructuredRequest> {
        let sources = self.compact_sources(excerpts);
        let sources_json = serde_json::to_string(&sources)
            .map_err(|e| Error::Synthesis(format!("Failed to encode sources: {}", e)))?;

        Ok(StructuredRequest::new(
            &self.options.model,
            SYSTEM_PROMPT,
            user_prompt(query, &sources_json),
            SCHEMA_NAME,
            outline_schema(),
        )
        .temperature(self.options.temperature)
        .max_tokens(self.options.max_tokens))
    }

    /// Generate an outline. The model is called even when `excerpts` is empty.
    pub fn synthesize(&self, excerpts: &[SourceExcerpt], query: &str) -> Result<SlideOutline> {
        let request = self.request(excerpts, query)?;
        log::info!(
            "Synthesizing outline for '{}' from {} sources",
            query,
            excerpts.len().min(self.budget.max_sources)
        );

        let content = self.model.complete(&request)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Synthesis(format!("Response does not match the outline schema: {}", e)))
    }
}

fn user_prompt(query: &str, sources_json: &str) -> String {
    format!(
        "Topic: {query}\n\n\
         Produce a 7-slide outline:\n\
         \x20 Slide 1: Title (just the title string)\n\
         \x20 Slide 2: Overview ({ov_min}-{ov_max} bullets)\n\
         \x20 Slides 3-6: Four key sections (each has a heading and {b_min}-{b_max} bullets)\n\
         \x20 Slide 7: Takeaways ({t_min}-{t_max} bullets)\n\n\
         Rules:\n\
         \x20- Use dates and numbers when available.\n\
         \x20- Keep each bullet under 25 words.\n\
         \x20- Do not invent URLs; cite from provided results where possible.\n\n\
         WebSources: {sources_json}",
        ov_min = OVERVIEW_BOUNDS.min,
        ov_max = OVERVIEW_BOUNDS.max,
        b_min = BULLET_BOUNDS.min,
        b_max = BULLET_BOUNDS.max,
        t_min = TAKEAWAY_BOUNDS.min,
        t_max = TAKEAWAY_BOUNDS.max,
    )
}

fn string_array(bounds: Bounds) -> Value {
    json!({
        "type": "array",
        "items": {"type": "string"},
        "minItems": bounds.min,
        "maxItems": bounds.max
    })
}

/// Strict JSON schema for [`SlideOutline`]: every object closed, every property required.
pub fn outline_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string"},
            "overview": string_array(OVERVIEW_BOUNDS),
            "slides": {
                "type": "array",
                "minItems": SECTION_BOUNDS.min,
                "maxItems": SECTION_BOUNDS.max,
                "items": {
                    "type": "object",
                    "properties": {
                        "heading": {"type": "string"},
                        "bullets": string_array(BULLET_BOUNDS)
                    },
                    "required": ["heading", "bullets"],
                    "additionalProperties": false
                }
            },
            "takeaways": string_array(TAKEAWAY_BOUNDS),
            "sources": {
                "type": "array",
                "minItems": SOURCE_BOUNDS.min,
                "maxItems": SOURCE_BOUNDS.max,
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "url": {"type": "string"}
                    },
                    "required": ["title", "url"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["title", "overview", "slides", "takeaways", "sources"],
        "additionalProperties": false
    })
}
