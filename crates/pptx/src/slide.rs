//! Slide XML generation.
//!
//! A slide is a list of [`Shape`]s, each either a layout placeholder or a free
//! text box, with one run per paragraph and an explicit frame in EMUs.

use slidesmith_core::text::collapse_whitespace;
use slidesmith_core::Result;

use crate::xml::{XmlOut, NS_A, NS_P, NS_R};

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert hundredths of an inch to EMUs.
pub const fn centi_inch(value: i64) -> i64 {
    value * EMU_PER_INCH / 100
}

/// Position and size of a shape in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// What a shape binds to on its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    CenteredTitle,
    Subtitle,
    Title,
    Body,
    TextBox,
}

impl ShapeKind {
    /// `(type, idx)` attributes of the `p:ph` element, if this is a placeholder.
    fn placeholder(self) -> Option<(Option<&'static str>, Option<&'static str>)> {
        match self {
            Self::CenteredTitle => Some((Some("ctrTitle"), None)),
            Self::Subtitle => Some((Some("subTitle"), Some("1"))),
            Self::Title => Some((Some("title"), None)),
            Self::Body => Some((None, Some("1"))),
            Self::TextBox => None,
        }
    }
}

/// Run formatting applied to every paragraph of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size_pt: u32,
    pub bold: bool,
    /// RGB hex without `#`.
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    pub frame: Frame,
    pub paragraphs: Vec<String>,
    pub style: TextStyle,
    pub word_wrap: bool,
}

/// Serialize one slide.
pub fn slide_xml(shapes: &[Shape]) -> Result<Vec<u8>> {
    let mut out = XmlOut::new()?;

    out.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    out.start("p:cSld", &[])?;
    out.start("p:spTree", &[])?;

    out.start("p:nvGrpSpPr", &[])?;
    out.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    out.empty("p:cNvGrpSpPr", &[])?;
    out.empty("p:nvPr", &[])?;
    out.end("p:nvGrpSpPr")?;
    out.start("p:grpSpPr", &[])?;
    write_xfrm(&mut out, Frame::new(0, 0, 0, 0), true)?;
    out.end("p:grpSpPr")?;

    for (idx, shape) in shapes.iter().enumerate() {
        // id 1 is the group itself
        write_shape(&mut out, shape, idx + 2)?;
    }

    out.end("p:spTree")?;
    out.end("p:cSld")?;
    out.start("p:clrMapOvr", &[])?;
    out.empty("a:masterClrMapping", &[])?;
    out.end("p:clrMapOvr")?;
    out.end("p:sld")?;

    Ok(out.into_bytes())
}

fn write_shape(out: &mut XmlOut, shape: &Shape, id: usize) -> Result<()> {
    let id = id.to_string();

    out.start("p:sp", &[])?;

    out.start("p:nvSpPr", &[])?;
    out.empty("p:cNvPr", &[("id", id.as_str()), ("name", shape.name.as_str())])?;
    match shape.kind.placeholder() {
        Some((ph_type, ph_idx)) => {
            out.start("p:cNvSpPr", &[])?;
            out.empty("a:spLocks", &[("noGrp", "1")])?;
            out.end("p:cNvSpPr")?;
            out.start("p:nvPr", &[])?;
            let mut attrs = Vec::with_capacity(2);
            if let Some(t) = ph_type {
                attrs.push(("type", t));
            }
            if let Some(i) = ph_idx {
                attrs.push(("idx", i));
            }
            out.empty("p:ph", &attrs)?;
            out.end("p:nvPr")?;
        }
        None => {
            out.empty("p:cNvSpPr", &[("txBox", "1")])?;
            out.empty("p:nvPr", &[])?;
        }
    }
    out.end("p:nvSpPr")?;

    out.start("p:spPr", &[])?;
    write_xfrm(out, shape.frame, false)?;
    if shape.kind == ShapeKind::TextBox {
        out.start("a:prstGeom", &[("prst", "rect")])?;
        out.empty("a:avLst", &[])?;
        out.end("a:prstGeom")?;
        out.empty("a:noFill", &[])?;
    }
    out.end("p:spPr")?;

    write_text_body(out, shape)?;

    out.end("p:sp")
}

fn write_xfrm(out: &mut XmlOut, frame: Frame, group: bool) -> Result<()> {
    let (x, y) = (frame.x.to_string(), frame.y.to_string());
    let (cx, cy) = (frame.cx.to_string(), frame.cy.to_string());

    out.start("a:xfrm", &[])?;
    out.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    out.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    if group {
        out.empty("a:chOff", &[("x", x.as_str()), ("y", y.as_str())])?;
        out.empty("a:chExt", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    }
    out.end("a:xfrm")
}

fn write_text_body(out: &mut XmlOut, shape: &Shape) -> Result<()> {
    out.start("p:txBody", &[])?;

    let wrap = if shape.word_wrap { "square" } else { "none" };
    if shape.kind == ShapeKind::Body {
        out.start("a:bodyPr", &[("wrap", wrap)])?;
        out.empty("a:normAutofit", &[])?;
        out.end("a:bodyPr")?;
    } else {
        out.empty("a:bodyPr", &[("wrap", wrap)])?;
    }
    out.empty("a:lstStyle", &[])?;

    if shape.paragraphs.is_empty() {
        out.start("a:p", &[])?;
        out.empty("a:endParaRPr", &[("lang", "en-US")])?;
        out.end("a:p")?;
    }

    let size = (shape.style.size_pt * 100).to_string();
    for paragraph in &shape.paragraphs {
        out.start("a:p", &[])?;
        out.start("a:r", &[])?;

        let mut attrs = vec![("lang", "en-US"), ("sz", size.as_str())];
        if shape.style.bold {
            attrs.push(("b", "1"));
        }
        attrs.push(("dirty", "0"));
        match shape.style.color {
            Some(rgb) => {
                out.start("a:rPr", &attrs)?;
                out.start("a:solidFill", &[])?;
                out.empty("a:srgbClr", &[("val", rgb)])?;
                out.end("a:solidFill")?;
                out.end("a:rPr")?;
            }
            None => out.empty("a:rPr", &attrs)?,
        }

        // a run holds a single line of text
        out.element("a:t", &collapse_whitespace(paragraph))?;
        out.end("a:r")?;
        out.end("a:p")?;
    }

    out.end("p:txBody")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: ShapeKind, paragraphs: &[&str]) -> Shape {
        Shape {
            name: "Test".to_string(),
            kind,
            frame: Frame::new(457200, 274638, 8229600, 1143000),
            paragraphs: paragraphs.iter().map(|s| s.to_string()).collect(),
            style: TextStyle {
                size_pt: 36,
                bold: true,
                color: Some("2E74B5"),
            },
            word_wrap: true,
        }
    }

    fn render(shapes: &[Shape]) -> String {
        String::from_utf8(slide_xml(shapes).unwrap()).unwrap()
    }

    #[test]
    fn test_centi_inch() {
        assert_eq!(centi_inch(100), EMU_PER_INCH);
        assert_eq!(centi_inch(30), 274_320);
        assert_eq!(centi_inch(680), 6_217_920);
    }

    #[test]
    fn test_title_placeholder_styled() {
        let xml = render(&[shape(ShapeKind::Title, &["Overview"])]);

        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains(r#"sz="3600""#));
        assert!(xml.contains(r#"b="1""#));
        assert!(xml.contains(r#"<a:srgbClr val="2E74B5"/>"#));
        assert!(xml.contains("<a:t>Overview</a:t>"));
        assert!(xml.contains(r#"<a:off x="457200" y="274638"/>"#));
    }

    #[test]
    fn test_body_placeholder_wraps_and_autofits() {
        let mut body = shape(ShapeKind::Body, &["one", "two"]);
        body.style = TextStyle {
            size_pt: 20,
            bold: false,
            color: None,
        };
        let xml = render(&[body]);

        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
        assert!(xml.contains(r#"<a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr>"#));
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(!xml.contains(r#"b="1""#));
    }

    #[test]
    fn test_text_box_is_not_placeholder() {
        let xml = render(&[shape(ShapeKind::TextBox, &["1/6"])]);

        assert!(xml.contains(r#"<p:cNvSpPr txBox="1"/>"#));
        assert!(!xml.contains("<p:ph"));
        assert!(xml.contains(r#"<a:prstGeom prst="rect">"#));
    }

    #[test]
    fn test_empty_shape_gets_end_paragraph() {
        let xml = render(&[shape(ShapeKind::Subtitle, &[])]);

        assert!(xml.contains(r#"<p:ph type="subTitle" idx="1"/>"#));
        assert!(xml.contains(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#));
    }

    #[test]
    fn test_run_text_whitespace_collapsed() {
        let xml = render(&[shape(ShapeKind::Body, &["Qubits\n  and\tgates ", "plain"])]);

        assert!(xml.contains("<a:t>Qubits and gates</a:t>"));
        assert!(xml.contains("<a:t>plain</a:t>"));
        assert!(!xml.contains('\t'));
    }

    #[test]
    fn test_shape_ids_are_unique() {
        let xml = render(&[
            shape(ShapeKind::Title, &["a"]),
            shape(ShapeKind::Body, &["b"]),
            shape(ShapeKind::TextBox, &["c"]),
        ]);

        assert!(xml.contains(r#"<p:cNvPr id="1" name=""/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Test"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="3" name="Test"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="4" name="Test"/>"#));
    }
}
