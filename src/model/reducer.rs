use tracing::warn;

use super::{
    ColorId, ColorPalette, IdAllocator, PaletteColor, DEFAULT_COLOR_HEX, MAXIMUM_PALETTE_COLORS,
};
use crate::palette_type::{self, PaletteType};

/// Every mutation a host can make to a palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Append a colour (white when `None`) and select it.
    AddColor(Option<String>),
    ChangeColor { id: ColorId, hex: String },
    RemoveColor(ColorId),
    /// Splice the colour out and back in at `new_index` of the shortened list.
    MoveColor { id: ColorId, new_index: usize },
    SelectColor(ColorId),
    ReplaceColors(Vec<String>),
    ReplacePalette {
        name: Option<String>,
        type_id: Option<String>,
        colors: Vec<String>,
    },
    Rename(String),
    SetType(String),
    /// Throw away the content and start over from a single white colour.
    Discard,
}

/// Apply `action` to `state`, returning the next state.
///
/// Requests that cannot apply (unknown id, palette full) return the state unchanged.
pub fn reduce(mut state: ColorPalette, action: &Action, ids: &mut IdAllocator) -> ColorPalette {
    match action {
        Action::AddColor(hex) => {
            if state.colors.len() >= MAXIMUM_PALETTE_COLORS {
                return state;
            }
            let hex = hex.as_deref().unwrap_or(DEFAULT_COLOR_HEX);
            let mut color = PaletteColor::new(ids, hex);
            color.is_selected = true;
            deselect_all(&mut state.colors);
            state.colors.push(color);
            state.has_changes = true;
        }
        Action::ChangeColor { id, hex } => {
            let Some(color) = state.colors.iter_mut().find(|c| c.id == *id) else {
                return state;
            };
            color.hex.clone_from(hex);
            state.has_changes = true;
        }
        Action::RemoveColor(id) => {
            let Some(index) = state.index_of(*id) else {
                return state;
            };
            let removed = state.colors.remove(index);
            if removed.is_selected && !state.colors.is_empty() {
                let next = index.min(state.colors.len() - 1);
                state.colors[next].is_selected = true;
            }
            state.has_changes = true;
        }
        Action::MoveColor { id, new_index } => {
            let Some(index) = state.index_of(*id) else {
                return state;
            };
            let color = state.colors.remove(index);
            let new_index = (*new_index).min(state.colors.len());
            state.colors.insert(new_index, color);
            state.has_changes = true;
        }
        Action::SelectColor(id) => {
            if state.index_of(*id).is_none() {
                return state;
            }
            for color in &mut state.colors {
                color.is_selected = color.id == *id;
            }
        }
        Action::ReplaceColors(hexes) => {
            state.colors = fresh_colors(hexes, ids);
            state.has_changes = true;
        }
        Action::ReplacePalette {
            name,
            type_id,
            colors,
        } => {
            state.name = name.clone().unwrap_or_default();
            state.type_id = resolve_type(type_id.as_deref()).id.to_string();
            state.colors = fresh_colors(colors, ids);
            state.has_changes = true;
        }
        Action::Rename(name) => {
            state.name.clone_from(name);
            state.has_changes = true;
        }
        Action::SetType(type_id) => {
            state.type_id = resolve_type(Some(type_id.as_str())).id.to_string();
            state.has_changes = true;
        }
        Action::Discard => {
            let is_open = state.is_open;
            state = ColorPalette::new(ids);
            state.is_open = is_open;
        }
    }
    state
}

fn deselect_all(colors: &mut [PaletteColor]) {
    for color in colors {
        color.is_selected = false;
    }
}

/// Build a replacement colour list with new ids and the first colour selected.
fn fresh_colors(hexes: &[String], ids: &mut IdAllocator) -> Vec<PaletteColor> {
    let mut colors: Vec<PaletteColor> = if hexes.is_empty() {
        vec![PaletteColor::new(ids, DEFAULT_COLOR_HEX)]
    } else {
        hexes
            .iter()
            .take(MAXIMUM_PALETTE_COLORS)
            .map(|hex| PaletteColor::new(ids, hex.as_str()))
            .collect()
    };
    colors[0].is_selected = true;
    colors
}

fn resolve_type(type_id: Option<&str>) -> &'static PaletteType {
    let type_id = type_id.unwrap_or_default();
    palette_type::find(type_id).unwrap_or_else(|| {
        warn!(type_id, "unrecognised palette type, using the default");
        PaletteType::default_type()
    })
}
