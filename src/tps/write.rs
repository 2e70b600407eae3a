use quick_xml::escape::escape;
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};

use super::dom::parse_document;
use super::parse::{ParsedPalette, TpsFileError};
use crate::model::{ColorPalette, PaletteColor};
use crate::palette_type::PaletteType;

const COLOR_PALETTE_TAG: &[u8] = b"color-palette";
const PREFERENCES_TAG: &[u8] = b"preferences";

/// The `type` attribute source: a registered type or a raw id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef<'a> {
    Known(&'a PaletteType),
    Raw(&'a str),
}

impl TypeRef<'_> {
    pub fn id(&self) -> &str {
        match self {
            TypeRef::Known(palette_type) => palette_type.id,
            TypeRef::Raw(id) => id,
        }
    }
}

impl<'a> From<&'a PaletteType> for TypeRef<'a> {
    fn from(palette_type: &'a PaletteType) -> Self {
        TypeRef::Known(palette_type)
    }
}

impl<'a> From<&'a str> for TypeRef<'a> {
    fn from(id: &'a str) -> Self {
        TypeRef::Raw(id)
    }
}

/// Borrowed view of anything that can be written as a `<color-palette>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteXml<'a> {
    pub name: &'a str,
    pub palette_type: TypeRef<'a>,
    pub colors: Vec<&'a str>,
}

impl<'a> PaletteXml<'a> {
    pub fn new(
        name: &'a str,
        palette_type: impl Into<TypeRef<'a>>,
        colors: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            name,
            palette_type: palette_type.into(),
            colors: colors.into_iter().collect(),
        }
    }

    /// Same as [`PaletteXml::new`], taking editor colours instead of strings.
    pub fn from_colors(
        name: &'a str,
        palette_type: impl Into<TypeRef<'a>>,
        colors: &'a [PaletteColor],
    ) -> Self {
        Self::new(name, palette_type, colors.iter().map(|c| c.hex.as_str()))
    }
}

impl<'a> From<&'a ColorPalette> for PaletteXml<'a> {
    fn from(palette: &'a ColorPalette) -> Self {
        Self::from_colors(&palette.name, palette.type_id.as_str(), &palette.colors)
    }
}

impl<'a> From<&'a ParsedPalette> for PaletteXml<'a> {
    fn from(palette: &'a ParsedPalette) -> Self {
        Self::new(
            &palette.name,
            palette.type_id.as_str(),
            palette.colors.iter().map(String::as_str),
        )
    }
}

/// Serialize one palette as a `<color-palette>` fragment, without a trailing newline.
pub fn color_palette_xml(palette: &PaletteXml<'_>) -> String {
    let mut out = format!(
        "<color-palette name=\"{}\" type=\"{}\">\n",
        escape(palette.name),
        escape(palette.palette_type.id())
    );
    for color in &palette.colors {
        out.push_str(&format!("    <color>{}</color>\n", escape(*color)));
    }
    out.push_str("</color-palette>");
    out
}

/// Serialize several palettes, one fragment per palette, separated by newlines.
pub fn color_palettes_xml(palettes: &[PaletteXml<'_>]) -> String {
    palettes
        .iter()
        .map(color_palette_xml)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Swap the palettes of the first `<preferences>` child of the root element for `palettes`.
///
/// Existing `<color-palette>` children are dropped, the new fragments are appended
/// just before `</preferences>`, and every other byte of the document is kept.
pub fn replace_palettes_in_tps_xml(
    xml: &str,
    palettes: &[PaletteXml<'_>],
) -> Result<String, TpsFileError> {
    if xml.is_empty() {
        return Err(TpsFileError::Empty);
    }
    parse_document(xml).map_err(|_| TpsFileError::Unparseable)?;

    let fragment = color_palettes_xml(palettes);
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    // Open elements before the current event.
    let mut depth = 0usize;
    // Depth of the children of the preferences element while it is open.
    let mut preferences_children: Option<usize> = None;
    // Depth of the palette being dropped.
    let mut skipping: Option<usize> = None;
    let mut spliced = false;

    loop {
        let event = reader.read_event().map_err(|_| TpsFileError::Unparseable)?;
        match event {
            Event::Start(ref start) => {
                if skipping.is_some() {
                    depth += 1;
                    continue;
                }
                let name = start.name();
                if preferences_children == Some(depth) && name.as_ref() == COLOR_PALETTE_TAG {
                    skipping = Some(depth);
                    depth += 1;
                    continue;
                }
                if !spliced
                    && depth == 1
                    && preferences_children.is_none()
                    && name.as_ref() == PREFERENCES_TAG
                {
                    preferences_children = Some(depth + 1);
                }
                depth += 1;
            }
            Event::Empty(ref start) => {
                if skipping.is_some() {
                    continue;
                }
                let name = start.name();
                if preferences_children == Some(depth) && name.as_ref() == COLOR_PALETTE_TAG {
                    continue;
                }
                if !spliced
                    && depth == 1
                    && preferences_children.is_none()
                    && name.as_ref() == PREFERENCES_TAG
                {
                    write(&mut writer, Event::Start(start.borrow()))?;
                    write(&mut writer, Event::Text(BytesText::from_escaped(fragment.as_str())))?;
                    write(&mut writer, Event::End(start.to_end()))?;
                    spliced = true;
                    continue;
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or(TpsFileError::Unparseable)?;
                if let Some(palette_depth) = skipping {
                    if depth == palette_depth {
                        skipping = None;
                    }
                    continue;
                }
                if preferences_children == Some(depth + 1) {
                    write(&mut writer, Event::Text(BytesText::from_escaped(fragment.as_str())))?;
                    preferences_children = None;
                    spliced = true;
                }
            }
            Event::Eof => break,
            _ => {
                if skipping.is_some() {
                    continue;
                }
            }
        }
        write(&mut writer, event)?;
    }

    if !spliced {
        return Err(TpsFileError::MissingPreferences);
    }
    String::from_utf8(writer.into_inner()).map_err(|_| TpsFileError::Unparseable)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), TpsFileError> {
    writer
        .write_event(event)
        .map_err(|_| TpsFileError::Unparseable)
}
