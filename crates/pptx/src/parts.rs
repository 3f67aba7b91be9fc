//! Package parts whose content depends on the deck: content types,
//! presentation, relationships and core properties.

use chrono::NaiveDate;
use slidesmith_core::Result;

use crate::xml::{XmlOut, NS_A, NS_P, NS_PKG_RELS, NS_R};

const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Relationship ids below this one are taken by master, theme and property parts.
const FIRST_SLIDE_REL: usize = 6;

/// Slide ids start at 256 per the PresentationML schema.
const FIRST_SLIDE_ID: usize = 256;

/// Slide size: 10in x 7.5in (4:3).
pub const SLIDE_WIDTH: i64 = 9_144_000;
pub const SLIDE_HEIGHT: i64 = 6_858_000;

/// Which layout a slide is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Title,
    Content,
}

impl Layout {
    fn target(self) -> &'static str {
        match self {
            Self::Title => "../slideLayouts/slideLayout1.xml",
            Self::Content => "../slideLayouts/slideLayout2.xml",
        }
    }
}

/// Archive path of the 1-based slide `number`.
pub fn slide_path(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

/// Archive path of the relationships part of slide `number`.
pub fn slide_rels_path(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

fn slide_rel_id(number: usize) -> String {
    format!("rId{}", FIRST_SLIDE_REL + number - 1)
}

pub fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.start(
        "Types",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
    )?;

    out.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    out.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let fixed = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
        ("/ppt/slideLayouts/slideLayout2.xml", CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/ppt/presProps.xml", CT_PRES_PROPS),
        ("/ppt/viewProps.xml", CT_VIEW_PROPS),
        ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
        ("/docProps/core.xml", CT_CORE_PROPS),
        ("/docProps/app.xml", CT_APP_PROPS),
    ];
    for (part, content_type) in fixed {
        out.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }

    for number in 1..=slide_count {
        let part = format!("/{}", slide_path(number));
        out.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", CT_SLIDE)],
        )?;
    }

    out.end("Types")?;
    Ok(out.into_bytes())
}

pub fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    out.start("p:sldMasterIdLst", &[])?;
    out.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    out.end("p:sldMasterIdLst")?;

    if slide_count > 0 {
        out.start("p:sldIdLst", &[])?;
        for number in 1..=slide_count {
            let id = (FIRST_SLIDE_ID + number - 1).to_string();
            let rel = slide_rel_id(number);
            out.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
        }
        out.end("p:sldIdLst")?;
    }

    let (cx, cy) = (SLIDE_WIDTH.to_string(), SLIDE_HEIGHT.to_string());
    out.empty(
        "p:sldSz",
        &[("cx", cx.as_str()), ("cy", cy.as_str()), ("type", "screen4x3")],
    )?;
    out.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;

    out.end("p:presentation")?;
    Ok(out.into_bytes())
}

pub fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;

    let fixed = [
        ("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        ("rId2", REL_THEME, "theme/theme1.xml"),
        ("rId3", REL_PRES_PROPS, "presProps.xml"),
        ("rId4", REL_VIEW_PROPS, "viewProps.xml"),
        ("rId5", REL_TABLE_STYLES, "tableStyles.xml"),
    ];
    for (id, rel_type, target) in fixed {
        out.empty(
            "Relationship",
            &[("Id", id), ("Type", rel_type), ("Target", target)],
        )?;
    }

    for number in 1..=slide_count {
        let id = slide_rel_id(number);
        let target = format!("slides/slide{}.xml", number);
        out.empty(
            "Relationship",
            &[
                ("Id", id.as_str()),
                ("Type", REL_SLIDE),
                ("Target", target.as_str()),
            ],
        )?;
    }

    out.end("Relationships")?;
    Ok(out.into_bytes())
}

pub fn slide_rels_xml(layout: Layout) -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;
    out.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    out.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_SLIDE_LAYOUT),
            ("Target", layout.target()),
        ],
    )?;
    out.end("Relationships")?;
    Ok(out.into_bytes())
}

/// Core properties carry the deck title and the generation date.
pub fn core_props_xml(title: &str, date: NaiveDate) -> Result<Vec<u8>> {
    let stamp = format!("{}T00:00:00Z", date.format("%Y-%m-%d"));

    let mut out = XmlOut::new()?;
    out.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    out.element("dc:title", title)?;
    out.element("dc:creator", "SlideSmith")?;
    for name in ["dcterms:created", "dcterms:modified"] {
        out.start(name, &[("xsi:type", "dcterms:W3CDTF")])?;
        out.text(&stamp)?;
        out.end(name)?;
    }
    out.end("cp:coreProperties")?;
    Ok(out.into_bytes())
}
