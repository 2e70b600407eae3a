use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::dom::{parse_document, Element};
use crate::model::Action;

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#[0-9a-f]{3}([0-9a-f]{3})?([0-9a-f]{5})?$").expect("colour regex is valid")
});

const COLOR_PALETTE_TAG: &str = "color-palette";
const COLOR_TAG: &str = "color";
const WORKBOOK_TAG: &str = "workbook";
const PREFERENCES_TAG: &str = "preferences";

/// A `<color-palette>` read from XML. Nothing is normalized: the type id is the raw
/// attribute and colours are the trimmed element text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPalette {
    pub name: String,
    pub type_id: String,
    pub colors: Vec<String>,
}

impl ParsedPalette {
    /// The reducer action that loads this palette into the editor.
    pub fn into_action(self) -> Action {
        Action::ReplacePalette {
            name: Some(self.name),
            type_id: Some(self.type_id),
            colors: self.colors,
        }
    }
}

/// Why a single palette fragment was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("")]
    Empty,
    #[error("Unable to parse XML")]
    Unparseable,
    #[error("Expected a root element of <color-palette>")]
    NotColorPalette,
    #[error("Expected one or more <color> elements")]
    NoColors,
    #[error("All <color> elements must contain a valid colour")]
    EmptyColor,
    #[error("'{0}' is not a valid colour")]
    InvalidColor(String),
}

/// A rejected palette, tagged with its `name` attribute once one could be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct InvalidPalette {
    pub error: PaletteError,
    pub palette_name: Option<String>,
}

impl From<PaletteError> for InvalidPalette {
    fn from(error: PaletteError) -> Self {
        Self {
            error,
            palette_name: None,
        }
    }
}

/// Why a preferences document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TpsFileError {
    #[error("")]
    Empty,
    #[error("Unable to parse XML")]
    Unparseable,
    #[error("Expected a root element of <workbook>, found <{0}>")]
    NotWorkbook(String),
    #[error("Expected a <preferences> element inside <workbook>")]
    MissingPreferences,
    #[error("{} invalid colour palette(s)", .0.len())]
    InvalidPalettes(Vec<InvalidPalette>),
}

/// Whether `value` is an accepted colour: `#` then 3, 6, 8 or 11 hex digits.
pub fn is_valid_color(value: &str) -> bool {
    COLOR_RE.is_match(value)
}

/// Parse a standalone `<color-palette>` fragment.
///
/// Checks run in order and the first failure is returned.
pub fn parse_color_palette(xml: &str) -> Result<ParsedPalette, InvalidPalette> {
    if xml.is_empty() {
        return Err(PaletteError::Empty.into());
    }
    let root = parse_document(xml).map_err(|_| PaletteError::Unparseable)?;
    if root.name != COLOR_PALETTE_TAG {
        return Err(PaletteError::NotColorPalette.into());
    }
    read_palette(&root, true)
}

/// Parse a `<workbook><preferences>` document and every palette inside it.
///
/// Palettes may be empty here. All palette errors are collected before returning.
pub fn parse_tps_file(xml: &str) -> Result<Vec<ParsedPalette>, TpsFileError> {
    if xml.is_empty() {
        return Err(TpsFileError::Empty);
    }
    let root = parse_document(xml).map_err(|_| TpsFileError::Unparseable)?;
    if root.name != WORKBOOK_TAG {
        return Err(TpsFileError::NotWorkbook(root.name));
    }
    let preferences = root
        .children_named(PREFERENCES_TAG)
        .next()
        .ok_or(TpsFileError::MissingPreferences)?;

    let mut palettes = Vec::new();
    let mut errors = Vec::new();
    for element in preferences.children_named(COLOR_PALETTE_TAG) {
        match read_palette(element, false) {
            Ok(palette) => palettes.push(palette),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(palettes)
    } else {
        Err(TpsFileError::InvalidPalettes(errors))
    }
}

fn read_palette(element: &Element, require_colors: bool) -> Result<ParsedPalette, InvalidPalette> {
    let name = element.attribute("name").unwrap_or_default().to_string();
    let type_id = element.attribute("type").unwrap_or_default().to_string();
    let fail = |error| InvalidPalette {
        error,
        palette_name: Some(name.clone()),
    };

    let texts: Vec<String> = element
        .children_named(COLOR_TAG)
        .map(|c| c.text_content().trim().to_string())
        .collect();

    if require_colors && texts.is_empty() {
        return Err(fail(PaletteError::NoColors));
    }
    if texts.iter().any(String::is_empty) {
        return Err(fail(PaletteError::EmptyColor));
    }
    if let Some(bad) = texts.iter().find(|t| !is_valid_color(t)) {
        return Err(fail(PaletteError::InvalidColor(bad.clone())));
    }

    Ok(ParsedPalette {
        name,
        type_id,
        colors: texts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_error(xml: &str) -> PaletteError {
        parse_color_palette(xml).unwrap_err().error
    }

    // --- colour pattern ---

    #[test]
    fn accepted_hex_lengths_are_locked_in() {
        let accepted: Vec<usize> = (1..=12)
            .filter(|&n| is_valid_color(&format!("#{}", "a".repeat(n))))
            .collect();
        assert_eq!(accepted, vec![3, 6, 8, 11]);
    }

    #[test]
    fn colour_pattern_is_case_insensitive() {
        assert!(is_valid_color("#ABCDEF"));
        assert!(is_valid_color("#abcDEF"));
        assert!(!is_valid_color("ABCDEF"));
        assert!(!is_valid_color("#GGG"));
        assert!(!is_valid_color(" #fff"));
    }

    // --- parse_color_palette ---

    #[test]
    fn parses_simple_palette() {
        let parsed = parse_color_palette(
            r#"<color-palette name="Test" type="regular"><color>#FF0000</color></color-palette>"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            ParsedPalette {
                name: "Test".into(),
                type_id: "regular".into(),
                colors: vec!["#FF0000".into()],
            }
        );
    }

    #[test]
    fn colours_are_trimmed_but_not_recased() {
        let parsed = parse_color_palette(
            "<color-palette name='a' type='b'>\n  <color>  #abc\n</color>\n  <color>#DdEeFf</color>\n</color-palette>",
        )
        .unwrap();
        assert_eq!(parsed.colors, vec!["#abc", "#DdEeFf"]);
    }

    #[test]
    fn missing_attributes_become_empty() {
        let parsed =
            parse_color_palette("<color-palette><color>#000</color></color-palette>").unwrap();
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.type_id, "");
    }

    #[test]
    fn type_is_not_validated() {
        let parsed = parse_color_palette(
            r#"<color-palette name="n" type="qualitative"><color>#000</color></color-palette>"#,
        )
        .unwrap();
        assert_eq!(parsed.type_id, "qualitative");
    }

    #[test]
    fn name_entities_are_decoded() {
        let parsed = parse_color_palette(
            r#"<color-palette name="R&amp;D &lt;1&gt;"><color>#000</color></color-palette>"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "R&D <1>");
    }

    #[test]
    fn empty_input_has_empty_message() {
        let err = parse_color_palette("").unwrap_err();
        assert_eq!(err.error, PaletteError::Empty);
        assert_eq!(err.to_string(), "");
    }

    #[test]
    fn unparseable_xml() {
        let err = parse_color_palette("<color-palette>").unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse XML");
        assert_eq!(err.palette_name, None);
    }

    #[test]
    fn wrong_root() {
        assert_eq!(
            palette_error("<palette><color>#fff</color></palette>").to_string(),
            "Expected a root element of <color-palette>"
        );
    }

    #[test]
    fn no_colours() {
        let err = parse_color_palette(r#"<color-palette name="X" type="r"></color-palette>"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected one or more <color> elements");
        assert_eq!(err.palette_name.as_deref(), Some("X"));
    }

    #[test]
    fn blank_colour() {
        assert_eq!(
            palette_error("<color-palette><color>#fff</color><color>   </color></color-palette>")
                .to_string(),
            "All <color> elements must contain a valid colour"
        );
    }

    #[test]
    fn blank_colour_reported_before_invalid_colour() {
        assert_eq!(
            palette_error("<color-palette><color>red</color><color/></color-palette>"),
            PaletteError::EmptyColor
        );
    }

    #[test]
    fn invalid_colour_reports_first_offender_trimmed() {
        assert_eq!(
            palette_error(
                "<color-palette><color>#fff</color><color> #12 </color><color>blue</color></color-palette>"
            )
            .to_string(),
            "'#12' is not a valid colour"
        );
    }

    #[test]
    fn nested_colours_are_ignored() {
        assert_eq!(
            palette_error("<color-palette><group><color>#fff</color></group></color-palette>"),
            PaletteError::NoColors
        );
    }

    // --- parse_tps_file ---

    const TPS: &str = r#"<?xml version='1.0'?>
<workbook>
  <preferences>
    <color-palette name="One" type="regular">
      <color>#111111</color>
    </color-palette>
    <color-palette name="Empty" type="ordered-sequential">
    </color-palette>
    <color-palette name="Two" type="ordered-diverging">
      <color>#222</color>
      <color>#333333</color>
    </color-palette>
  </preferences>
</workbook>"#;

    #[test]
    fn parses_all_palettes_in_order() {
        let palettes = parse_tps_file(TPS).unwrap();
        let names: Vec<&str> = palettes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Empty", "Two"]);
        assert!(palettes[1].colors.is_empty());
        assert_eq!(palettes[2].colors, vec!["#222", "#333333"]);
        assert_eq!(palettes[2].type_id, "ordered-diverging");
    }

    #[test]
    fn preferences_without_palettes_is_valid() {
        assert_eq!(
            parse_tps_file("<workbook><preferences/></workbook>").unwrap(),
            vec![]
        );
    }

    #[test]
    fn tps_structural_errors() {
        assert_eq!(parse_tps_file(""), Err(TpsFileError::Empty));
        assert_eq!(parse_tps_file("<workbook>"), Err(TpsFileError::Unparseable));
        assert_eq!(
            parse_tps_file("<color-palette/>").unwrap_err().to_string(),
            "Expected a root element of <workbook>, found <color-palette>"
        );
        assert_eq!(
            parse_tps_file("<workbook><other/></workbook>")
                .unwrap_err()
                .to_string(),
            "Expected a <preferences> element inside <workbook>"
        );
    }

    #[test]
    fn tps_collects_every_palette_error() {
        let xml = r#"<workbook><preferences>
            <color-palette name="Good"><color>#fff</color></color-palette>
            <color-palette name="Blank"><color></color></color-palette>
            <color-palette name="Bad"><color>#12345</color></color-palette>
        </preferences></workbook>"#;
        let Err(TpsFileError::InvalidPalettes(errors)) = parse_tps_file(xml) else {
            panic!("expected palette errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].palette_name.as_deref(), Some("Blank"));
        assert_eq!(errors[0].error, PaletteError::EmptyColor);
        assert_eq!(errors[1].palette_name.as_deref(), Some("Bad"));
        assert_eq!(errors[1].to_string(), "'#12345' is not a valid colour");
    }

    #[test]
    fn into_action_replaces_palette() {
        let parsed = ParsedPalette {
            name: "N".into(),
            type_id: "regular".into(),
            colors: vec!["#000".into()],
        };
        assert_eq!(
            parsed.into_action(),
            Action::ReplacePalette {
                name: Some("N".into()),
                type_id: Some("regular".into()),
                colors: vec!["#000".into()],
            }
        );
    }
}
