//! Validation boundary between the language model and the renderer.
//!
//! The model is asked for an outline that matches a strict schema, but the
//! renderer never relies on that alone. [`SlideOutline::clamp`] trims text,
//! drops blank entries and cuts over-long lists down to the schema maximum.
//! Short lists are reported, not padded: nothing is ever made up here.

use std::fmt;

use crate::types::{OutlineSection, SlideOutline, SourceRef};

/// Inclusive length bounds for one list in the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

pub const OVERVIEW_BOUNDS: Bounds = Bounds::new(4, 6);
pub const SECTION_BOUNDS: Bounds = Bounds::new(4, 4);
pub const BULLET_BOUNDS: Bounds = Bounds::new(3, 6);
pub const TAKEAWAY_BOUNDS: Bounds = Bounds::new(3, 5);
pub const SOURCE_BOUNDS: Bounds = Bounds::new(5, 10);

/// A change made (or a violation noticed) while clamping an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// The title was blank and the topic was used instead.
    TitleFromTopic,
    /// Blank entries were removed from a list.
    DroppedBlank { field: String, count: usize },
    /// A list was longer than allowed and was cut.
    Truncated { field: String, from: usize, to: usize },
    /// A list is shorter than the schema minimum; kept as is.
    BelowMinimum { field: String, len: usize, min: usize },
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleFromTopic => write!(f, "title was blank, using the topic"),
            Self::DroppedBlank { field, count } => {
                write!(f, "{}: dropped {} blank entries", field, count)
            }
            Self::Truncated { field, from, to } => {
                write!(f, "{}: truncated from {} to {} entries", field, from, to)
            }
            Self::BelowMinimum { field, len, min } => {
                write!(f, "{}: only {} entries, expected at least {}", field, len, min)
            }
        }
    }
}

impl SlideOutline {
    /// Bring the outline within the schema bounds without inventing content.
    ///
    /// Returns the clamped outline together with every adjustment made.
    pub fn clamp(self, topic: &str) -> (SlideOutline, Vec<Adjustment>) {
        let mut adjustments = Vec::new();

        let mut title = self.title.trim().to_string();
        if title.is_empty() {
            title = topic.trim().to_string();
            adjustments.push(Adjustment::TitleFromTopic);
        }

        let overview = clamp_strings(self.overview, "overview", OVERVIEW_BOUNDS, &mut adjustments);

        let mut slides = Vec::with_capacity(self.slides.len());
        let mut blank_sections = 0;
        for (idx, section) in self.slides.into_iter().enumerate() {
            let heading = section.heading.trim().to_string();
            let field = format!("slides[{}].bullets", idx);
            let bullets = clamp_strings(section.bullets, &field, BULLET_BOUNDS, &mut adjustments);

            if heading.is_empty() && bullets.is_empty() {
                blank_sections += 1;
                continue;
            }
            slides.push(OutlineSection { heading, bullets });
        }
        if blank_sections > 0 {
            adjustments.push(Adjustment::DroppedBlank {
                field: "slides".to_string(),
                count: blank_sections,
            });
        }
        let slides = clamp_len(slides, "slides", SECTION_BOUNDS, &mut adjustments);

        let takeaways =
            clamp_strings(self.takeaways, "takeaways", TAKEAWAY_BOUNDS, &mut adjustments);

        let before = self.sources.len();
        let sources: Vec<SourceRef> = self
            .sources
            .into_iter()
            .map(|s| SourceRef {
                title: s.title.trim().to_string(),
                url: s.url.trim().to_string(),
            })
            .filter(|s| !s.url.is_empty())
            .collect();
        if sources.len() < before {
            adjustments.push(Adjustment::DroppedBlank {
                field: "sources".to_string(),
                count: before - sources.len(),
            });
        }
        let sources = clamp_len(sources, "sources", SOURCE_BOUNDS, &mut adjustments);

        let outline = SlideOutline {
            title,
            overview,
            slides,
            takeaways,
            sources,
        };
        (outline, adjustments)
    }

    /// Whether every list is within its schema bounds.
    pub fn is_conforming(&self) -> bool {
        OVERVIEW_BOUNDS.contains(self.overview.len())
            && SECTION_BOUNDS.contains(self.slides.len())
            && self
                .slides
                .iter()
                .all(|s| BULLET_BOUNDS.contains(s.bullets.len()))
            && TAKEAWAY_BOUNDS.contains(self.takeaways.len())
            && SOURCE_BOUNDS.contains(self.sources.len())
    }
}

fn clamp_strings(
    items: Vec<String>,
    field: &str,
    bounds: Bounds,
    adjustments: &mut Vec<Adjustment>,
) -> Vec<String> {
    let before = items.len();
    let kept: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if kept.len() < before {
        adjustments.push(Adjustment::DroppedBlank {
            field: field.to_string(),
            count: before - kept.len(),
        });
    }

    clamp_len(kept, field, bounds, adjustments)
}

fn clamp_len<T>(
    mut items: Vec<T>,
    field: &str,
    bounds: Bounds,
    adjustments: &mut Vec<Adjustment>,
) -> Vec<T> {
    let len = items.len();
    if len > bounds.max {
        items.truncate(bounds.max);
        adjustments.push(Adjustment::Truncated {
            field: field.to_string(),
            from: len,
            to: bounds.max,
        });
    } else if len < bounds.min {
        adjustments.push(Adjustment::BelowMinimum {
            field: field.to_string(),
            len,
            min: bounds.min,
        });
    }
    items
}
