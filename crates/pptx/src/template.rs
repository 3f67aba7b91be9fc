//! Static package parts shared by every generated deck.
//!
//! These are the minimum parts PowerPoint and LibreOffice need besides the
//! slides themselves: one master, two layouts, a theme and the property parts.

pub const PACKAGE_RELS: &str = include_str!("../resources/_rels/.rels");
pub const APP_PROPS: &str = include_str!("../resources/docProps/app.xml");
pub const PRES_PROPS: &str = include_str!("../resources/presProps.xml");
pub const VIEW_PROPS: &str = include_str!("../resources/viewProps.xml");
pub const TABLE_STYLES: &str = include_str!("../resources/tableStyles.xml");
pub const THEME: &str = include_str!("../resources/theme/theme1.xml");
pub const SLIDE_MASTER: &str = include_str!("../resources/slideMasters/slideMaster1.xml");
pub const SLIDE_MASTER_RELS: &str =
    include_str!("../resources/slideMasters/_rels/slideMaster1.xml.rels");

/// "Title Slide" layout.
pub const TITLE_LAYOUT: &str = include_str!("../resources/slideLayouts/slideLayout1.xml");

/// "Title and Content" layout.
pub const CONTENT_LAYOUT: &str = include_str!("../resources/slideLayouts/slideLayout2.xml");

/// Both layouts point back at the single master.
pub const SLIDE_LAYOUT_RELS: &str =
    include_str!("../resources/slideLayouts/_rels/slideLayout.xml.rels");

/// Static parts as `(path in archive, content)`.
pub fn static_parts() -> [(&'static str, &'static str); 12] {
    [
        ("_rels/.rels", PACKAGE_RELS),
        ("docProps/app.xml", APP_PROPS),
        ("ppt/presProps.xml", PRES_PROPS),
        ("ppt/viewProps.xml", VIEW_PROPS),
        ("ppt/tableStyles.xml", TABLE_STYLES),
        ("ppt/theme/theme1.xml", THEME),
        ("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER),
        ("ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS),
        ("ppt/slideLayouts/slideLayout1.xml", TITLE_LAYOUT),
        ("ppt/slideLayouts/slideLayout2.xml", CONTENT_LAYOUT),
        ("ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS),
        ("ppt/slideLayouts/_rels/slideLayout2.xml.rels", SLIDE_LAYOUT_RELS),
    ]
}
