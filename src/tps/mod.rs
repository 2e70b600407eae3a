//! Reading and writing colour palettes in the preferences (`.tps`) XML format.

mod dom;
pub mod parse;
pub mod write;

pub use parse::{
    is_valid_color, parse_color_palette, parse_tps_file, InvalidPalette, PaletteError,
    ParsedPalette, TpsFileError,
};
pub use write::{
    color_palette_xml, color_palettes_xml, replace_palettes_in_tps_xml, PaletteXml, TypeRef,
};
