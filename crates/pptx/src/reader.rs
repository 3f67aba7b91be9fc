//! PPTX reader used to inspect rendered decks.
//!
//! Recovers slides in presentation order and, per slide, the text of every
//! shape sorted top-to-bottom then left-to-right.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidesmith_core::{Error, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Text content of a whole deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub slides: Vec<DeckSlide>,
}

/// One slide and its positioned text.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSlide {
    /// 1-based slide number.
    pub number: usize,
    /// One entry per shape with text, in reading order.
    pub lines: Vec<SlideLine>,
}

impl DeckSlide {
    /// Shape texts in reading order.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn sort_by_position(&mut self) {
        self.lines.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });
    }
}

/// Text of one shape; paragraphs are joined with `\n`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Reader for PPTX (Office Open XML) files.
#[derive(Debug, Default)]
pub struct PptxReader;

impl PptxReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a deck from any seekable source.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Deck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::InvalidDeck(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.slide_order(&mut archive)?;
        let mut slides = Vec::with_capacity(slide_order.len());
        for (idx, slide_path) in slide_order.iter().enumerate() {
            slides.push(self.read_slide(&mut archive, slide_path, idx + 1)?);
        }

        log::debug!("Read {} slides", slides.len());
        Ok(Deck { slides })
    }

    /// Slide part paths ordered by relationship id.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = read_part(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let rel_type = attr(e, b"Type").unwrap_or_default();
                    let target = attr(e, b"Target").unwrap_or_default();
                    let id = attr(e, b"Id").unwrap_or_default();

                    if rel_type.ends_with("/slide") {
                        let order = trailing_number(&id).or_else(|| trailing_number(&target));
                        let path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::InvalidDeck(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    fn read_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        number: usize,
    ) -> Result<DeckSlide> {
        let content = read_part(archive, slide_path)?;
        let mut slide = DeckSlide {
            number,
            lines: shapes_from_xml(&content)?,
        };
        slide.sort_by_position();
        Ok(slide)
    }
}

/// Collect every shape that carries text, with its offset.
fn shapes_from_xml(xml: &str) -> Result<Vec<SlideLine>> {
    let mut lines = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut current: Option<SlideLine> = None;
    let mut in_text_body = false;
    let mut in_paragraph = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    current = Some(SlideLine {
                        text: String::new(),
                        x: 0.0,
                        y: 0.0,
                    });
                }
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    in_paragraph = true;
                    if !text.is_empty() {
                        text.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"off" {
                    if let Some(ref mut shape) = current {
                        if let Some(x) = attr(e, b"x").and_then(|v| v.parse().ok()) {
                            shape.x = x;
                        }
                        if let Some(y) = attr(e, b"y").and_then(|v| v.parse().ok()) {
                            shape.y = y;
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) if in_paragraph => {
                let unescaped = e
                    .unescape()
                    .map_err(|e| Error::InvalidDeck(format!("Bad text in slide: {}", e)))?;
                text.push_str(&unescaped);
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    if let Some(mut shape) = current.take() {
                        shape.text = text.trim().to_string();
                        if !shape.text.is_empty() {
                            lines.push(shape);
                        }
                    }
                    text.clear();
                    in_text_body = false;
                    in_paragraph = false;
                }
                b"txBody" => in_text_body = false,
                b"p" => in_paragraph = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::InvalidDeck(format!("Error parsing slide: {}", e))),
            _ => {}
        }
    }

    Ok(lines)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::InvalidDeck(format!("Part not found '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::InvalidDeck(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Value of attribute `key`, if present.
fn attr(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Trailing digits of strings like "rId7" or "slide3.xml".
fn trailing_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    s[start..].parse().ok()
}
