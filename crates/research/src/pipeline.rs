//! End-to-end driver: search, extract, synthesize, clamp, render.

use slidesmith_core::text::file_stem_for_topic;
use slidesmith_core::{DeckRenderer, Error, Result, Settings};
use std::path::{Path, PathBuf};

use crate::extract::{HttpFetcher, PageFetcher, SourceExtractor};
use crate::openai::{LanguageModel, OpenAiClient};
use crate::search::{GoogleSearch, SearchProvider};
use crate::synthesize::OutlineSynthesizer;

/// File extension of written decks.
const DECK_EXTENSION: &str = "pptx";

/// One collaborator per stage, run strictly in order.
pub struct Pipeline<S, F, M, R> {
    search: S,
    extractor: SourceExtractor<F>,
    synthesizer: OutlineSynthesizer<M>,
    renderer: R,
}

impl<R: DeckRenderer> Pipeline<GoogleSearch, HttpFetcher, OpenAiClient, R> {
    /// Wire the live search, fetch and model services from settings.
    pub fn from_settings(settings: &Settings, renderer: R) -> Result<Self> {
        let search = GoogleSearch::new(
            &settings.search_endpoint,
            &settings.credentials.search_api_key,
            &settings.credentials.search_engine_id,
        );
        let fetcher = HttpFetcher::new(&settings.extraction)?;
        let model = OpenAiClient::new(&settings.credentials.model_api_key)
            .with_base_url(&settings.model_base_url);

        Ok(Self::new(
            search,
            SourceExtractor::new(fetcher, settings.extraction.clone()),
            OutlineSynthesizer::new(model, settings.generation.clone(), settings.budget.clone()),
            renderer,
        ))
    }
}

impl<S, F, M, R> Pipeline<S, F, M, R>
where
    S: SearchProvider,
    F: PageFetcher,
    M: LanguageModel,
    R: DeckRenderer,
{
    pub fn new(
        search: S,
        extractor: SourceExtractor<F>,
        synthesizer: OutlineSynthesizer<M>,
        renderer: R,
    ) -> Self {
        Self {
            search,
            extractor,
            synthesizer,
            renderer,
        }
    }

    /// Path the deck for `topic` is written to inside `output_dir`.
    pub fn output_path(topic: &str, output_dir: &Path) -> Result<PathBuf> {
        let stem = file_stem_for_topic(topic)
            .ok_or_else(|| Error::Configuration("Topic must not be empty".to_string()))?;
        Ok(output_dir.join(format!("{}.{}", stem, DECK_EXTENSION)))
    }

    /// Build the deck for `topic` and return the written file's path.
    ///
    /// Nothing is written unless every stage before rendering succeeded.
    pub fn run(&self, topic: &str, output_dir: &Path) -> Result<PathBuf> {
        let path = Self::output_path(topic, output_dir)?;
        let query = topic.trim();

        let results = self.search.search(query)?;
        let excerpts = self.extractor.collect(&results);
        if excerpts.is_empty() {
            log::warn!("No usable sources for '{}'; the outline will rely on the model alone", query);
        }

        let outline = self.synthesizer.synthesize(&excerpts, query)?;
        let (outline, adjustments) = outline.clamp(query);
        for adjustment in &adjustments {
            log::warn!("Outline adjusted: {}", adjustment);
        }

        self.renderer.render(&outline, &path)?;
        log::info!(
            "Generated {} slides for '{}' at {}",
            outline.slide_count(),
            query,
            path.display()
        );
        Ok(path)
    }
}
