pub mod reducer;

use crate::palette_type::{self, PaletteType};

pub use reducer::{reduce, Action};

/// Most colours a single palette may hold.
pub const MAXIMUM_PALETTE_COLORS: usize = 20;

/// Hex used for new and placeholder colours.
pub const DEFAULT_COLOR_HEX: &str = "#FFFFFF";

/// Stable identity of a colour within an editing session.
pub type ColorId = u64;

/// Hands out colour ids. Ids only ever increase and are never reused.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: ColorId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ColorId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// One swatch in a palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteColor {
    pub id: ColorId,
    pub hex: String,
    pub is_selected: bool,
}

impl PaletteColor {
    pub fn new(ids: &mut IdAllocator, hex: impl Into<String>) -> Self {
        Self {
            id: ids.allocate(),
            hex: hex.into(),
            is_selected: false,
        }
    }
}

/// The palette being edited.
///
/// The type is kept as its id so the state serializes straight back into a
/// `<color-palette type="...">` attribute; use [`ColorPalette::palette_type`] to
/// resolve it for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    pub name: String,
    pub type_id: String,
    pub colors: Vec<PaletteColor>,
    pub is_open: bool,
    pub has_changes: bool,
}

impl ColorPalette {
    /// A fresh palette: one unselected white colour, no name, regular type.
    pub fn new(ids: &mut IdAllocator) -> Self {
        Self {
            name: String::new(),
            type_id: PaletteType::default_type().id.to_string(),
            colors: vec![PaletteColor::new(ids, DEFAULT_COLOR_HEX)],
            is_open: false,
            has_changes: false,
        }
    }

    pub fn palette_type(&self) -> &'static PaletteType {
        palette_type::get(&self.type_id)
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= MAXIMUM_PALETTE_COLORS
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.colors.iter().position(|c| c.is_selected)
    }

    pub fn selected(&self) -> Option<&PaletteColor> {
        self.colors.iter().find(|c| c.is_selected)
    }

    pub fn index_of(&self, id: ColorId) -> Option<usize> {
        self.colors.iter().position(|c| c.id == id)
    }

    pub fn hexes(&self) -> Vec<&str> {
        self.colors.iter().map(|c| c.hex.as_str()).collect()
    }
}
