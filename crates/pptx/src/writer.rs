//! PPTX deck renderer.

use chrono::{Local, NaiveDate};
use slidesmith_core::{DeckRenderer, Error, RenderedSection, Result, SlideOutline};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::parts::{self, Layout};
use crate::slide::{centi_inch, slide_xml, Frame, Shape, ShapeKind, TextStyle};
use crate::template;

/// Accent colour for headings.
pub const ACCENT_RGB: &str = "2E74B5";

const HEADING_STYLE: TextStyle = TextStyle {
    size_pt: 36,
    bold: true,
    color: Some(ACCENT_RGB),
};

const BODY_STYLE: TextStyle = TextStyle {
    size_pt: 20,
    bold: false,
    color: None,
};

const FOOTER_STYLE: TextStyle = TextStyle {
    size_pt: 12,
    bold: false,
    color: None,
};

const CENTERED_TITLE_FRAME: Frame = Frame::new(685_800, 2_130_425, 7_772_400, 1_470_025);
const SUBTITLE_FRAME: Frame = Frame::new(1_371_600, 3_886_200, 6_400_800, 1_752_600);
const TITLE_FRAME: Frame = Frame::new(457_200, 274_638, 8_229_600, 1_143_000);
const BODY_FRAME: Frame = Frame::new(457_200, 1_600_200, 8_229_600, 4_525_963);
const DATE_FRAME: Frame = Frame::new(centi_inch(30), centi_inch(680), centi_inch(400), centi_inch(30));
const PAGE_FRAME: Frame = Frame::new(centi_inch(900), centi_inch(680), centi_inch(80), centi_inch(30));

/// Footer date format, e.g. "05 Mar 2024".
const FOOTER_DATE_FORMAT: &str = "%d %b %Y";

/// Renders a [`SlideOutline`] to a `.pptx` file.
///
/// Layout: one title slide, then one "Title and Content" slide per outline
/// section (overview, body sections, takeaways, sources). Every content slide
/// carries a footer with the generation date and `page/total`, where `total`
/// counts content slides only.
#[derive(Debug, Clone, Default)]
pub struct PptxRenderer {
    date: Option<NaiveDate>,
}

/// One slide ready to be serialized.
struct SlideSpec {
    layout: Layout,
    shapes: Vec<Shape>,
}

impl PptxRenderer {
    /// Create a renderer that stamps footers with today's date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp footers with a fixed date instead of today's.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Assemble the whole package in memory.
    pub fn render_to_bytes(&self, outline: &SlideOutline) -> Result<Vec<u8>> {
        let date = self.date();
        let slides = build_slides(outline, date);
        log::debug!("Rendering {} slides for '{}'", slides.len(), outline.title);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        add_part(&mut zip, options, "[Content_Types].xml", &parts::content_types_xml(slides.len())?)?;
        for (path, content) in template::static_parts() {
            add_part(&mut zip, options, path, content.as_bytes())?;
        }
        add_part(&mut zip, options, "docProps/core.xml", &parts::core_props_xml(&outline.title, date)?)?;
        add_part(&mut zip, options, "ppt/presentation.xml", &parts::presentation_xml(slides.len())?)?;
        add_part(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels_xml(slides.len())?,
        )?;

        for (idx, slide) in slides.iter().enumerate() {
            let number = idx + 1;
            add_part(&mut zip, options, &parts::slide_path(number), &slide_xml(&slide.shapes)?)?;
            add_part(
                &mut zip,
                options,
                &parts::slide_rels_path(number),
                &parts::slide_rels_xml(slide.layout)?,
            )?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::Render(format!("Failed to finish archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

impl DeckRenderer for PptxRenderer {
    fn render(&self, outline: &SlideOutline, path: &Path) -> Result<()> {
        let bytes = self.render_to_bytes(outline)?;
        write_atomically(path, &bytes)?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

fn build_slides(outline: &SlideOutline, date: NaiveDate) -> Vec<SlideSpec> {
    let sections = outline.sections();
    let total = sections.len();
    let date_text = date.format(FOOTER_DATE_FORMAT).to_string();

    let mut slides = Vec::with_capacity(total + 1);
    slides.push(title_slide(&outline.title));
    for (idx, section) in sections.iter().enumerate() {
        slides.push(content_slide(section, idx + 1, total, &date_text));
    }
    slides
}

fn title_slide(title: &str) -> SlideSpec {
    SlideSpec {
        layout: Layout::Title,
        shapes: vec![
            Shape {
                name: "Title 1".to_string(),
                kind: ShapeKind::CenteredTitle,
                frame: CENTERED_TITLE_FRAME,
                paragraphs: vec![title.to_string()],
                style: HEADING_STYLE,
                word_wrap: true,
            },
            Shape {
                name: "Subtitle 2".to_string(),
                kind: ShapeKind::Subtitle,
                frame: SUBTITLE_FRAME,
                paragraphs: Vec::new(),
                style: BODY_STYLE,
                word_wrap: true,
            },
        ],
    }
}

fn content_slide(section: &RenderedSection, page: usize, total: usize, date_text: &str) -> SlideSpec {
    SlideSpec {
        layout: Layout::Content,
        shapes: vec![
            Shape {
                name: "Title 1".to_string(),
                kind: ShapeKind::Title,
                frame: TITLE_FRAME,
                paragraphs: vec![section.heading.clone()],
                style: HEADING_STYLE,
                word_wrap: true,
            },
            Shape {
                name: "Content Placeholder 2".to_string(),
                kind: ShapeKind::Body,
                frame: BODY_FRAME,
                paragraphs: section.bullets.clone(),
                style: BODY_STYLE,
                word_wrap: true,
            },
            Shape {
                name: "Footer Date".to_string(),
                kind: ShapeKind::TextBox,
                frame: DATE_FRAME,
                paragraphs: vec![date_text.to_string()],
                style: FOOTER_STYLE,
                word_wrap: false,
            },
            Shape {
                name: "Footer Page".to_string(),
                kind: ShapeKind::TextBox,
                frame: PAGE_FRAME,
                paragraphs: vec![format!("{}/{}", page, total)],
                style: FOOTER_STYLE,
                word_wrap: false,
            },
        ],
    }
}

fn add_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    path: &str,
    content: &[u8],
) -> Result<()> {
    zip.start_file(path, options)
        .map_err(|e| Error::Render(format!("Failed to add '{}': {}", path, e)))?;
    zip.write_all(content)
        .map_err(|e| Error::Render(format!("Failed to write '{}': {}", path, e)))
}

/// Write to a sibling temp file, then rename over `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_sibling(path);

    let written = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Render(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::PptxReader;
    use slidesmith_core::{OutlineSection, SourceRef};
    use std::io::Read;
    use zip::ZipArchive;

    fn strings(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{} {}", prefix, i)).collect()
    }

    fn outline() -> SlideOutline {
        SlideOutline {
            title: "Quantum Computing".to_string(),
            overview: strings("Overview", 5),
            slides: (1..=4)
                .map(|i| OutlineSection {
                    heading: format!("Section {}", i),
                    bullets: strings(&format!("Point {}", i), 3 + i % 3),
                })
                .collect(),
            takeaways: strings("Takeaway", 3),
            sources: (1..=6)
                .map(|i| SourceRef {
                    title: format!("Source {}", i),
                    url: format!("https://example.com/{}", i),
                })
                .collect(),
        }
    }

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn renderer() -> PptxRenderer {
        PptxRenderer::new().with_date(fixed_date())
    }

    #[test]
    fn test_conforming_outline_renders_eight_slides() {
        let bytes = renderer().render_to_bytes(&outline()).unwrap();
        let deck = PptxReader::new().read(Cursor::new(bytes)).unwrap();

        assert_eq!(deck.slides.len(), 8);
    }

    #[test]
    fn test_slide_order_and_headings() {
        let bytes = renderer().render_to_bytes(&outline()).unwrap();
        let deck = PptxReader::new().read(Cursor::new(bytes)).unwrap();

        let headings: Vec<&str> = deck
            .slides
            .iter()
            .map(|s| s.lines[0].text.as_str())
            .collect();
        assert_eq!(
            headings,
            vec![
                "Quantum Computing",
                "Overview",
                "Section 1",
                "Section 2",
                "Section 3",
                "Section 4",
                "Key Takeaways",
                "Sources"
            ]
        );
    }

    #[test]
    fn test_content_slide_body_and_footer() {
        let bytes = renderer().render_to_bytes(&outline()).unwrap();
        let deck = PptxReader::new().read(Cursor::new(bytes)).unwrap();

        // Title slide has only the title (the subtitle is empty)
        assert_eq!(deck.slides[0].texts(), vec!["Quantum Computing"]);

        let overview = deck.slides[1].texts();
        assert_eq!(
            overview,
            vec![
                "Overview",
                "Overview 1\nOverview 2\nOverview 3\nOverview 4\nOverview 5",
                "05 Mar 2024",
                "1/7"
            ]
        );

        let sources = deck.slides[7].texts();
        assert_eq!(sources[0], "Sources");
        assert!(sources[1].starts_with("Source 1 - https://example.com/1\n"));
        assert_eq!(sources[3], "7/7");
    }

    #[test]
    fn test_total_counts_content_slides() {
        let mut short = outline();
        short.slides.truncate(2);
        let bytes = renderer().render_to_bytes(&short).unwrap();
        let deck = PptxReader::new().read(Cursor::new(bytes)).unwrap();

        assert_eq!(deck.slides.len(), 6);
        assert_eq!(deck.slides[5].texts().last().copied(), Some("5/5"));
    }

    #[test]
    fn test_heading_styled_with_accent() {
        let bytes = renderer().render_to_bytes(&outline()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide2.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        assert!(xml.contains(r#"sz="3600" b="1""#));
        assert!(xml.contains(r#"<a:srgbClr val="2E74B5"/>"#));
        assert!(xml.contains(r#"sz="2000""#));
        assert!(xml.contains(r#"sz="1200""#));
        assert!(xml.contains(r#"wrap="square""#));
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = renderer().render_to_bytes(&outline()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide8.xml",
            "ppt/slides/_rels/slide8.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let first = PptxReader::new()
            .read(Cursor::new(renderer().render_to_bytes(&outline()).unwrap()))
            .unwrap();
        let second = PptxReader::new()
            .read(Cursor::new(renderer().render_to_bytes(&outline()).unwrap()))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_render_writes_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Quantum Computing.pptx");

        renderer().render(&outline(), &path).unwrap();

        assert!(path.exists());
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let deck = PptxReader::new().read(fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(deck.slides.len(), 8);
    }

    #[test]
    fn test_render_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("deck.pptx");

        let err = renderer().render(&outline(), &path).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_sibling_name() {
        assert_eq!(
            temp_sibling(Path::new("/tmp/out/Deck.pptx")),
            PathBuf::from("/tmp/out/Deck.pptx.partial")
        );
    }
}
