use crate::palette_type::{self, PaletteType, ALL};

/// Keys the type selector reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKey {
    Next,
    Previous,
    Toggle,
}

/// Dropdown over the fixed list of palette types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSelector {
    index: usize,
    open: bool,
}

impl TypeSelector {
    /// A closed selector positioned on `type_id` (the first type if unknown).
    pub fn new(type_id: &str) -> Self {
        Self {
            index: palette_type::index_of(type_id).unwrap_or(0),
            open: false,
        }
    }

    pub fn current(&self) -> &'static PaletteType {
        &ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Handle a key. Returns the newly chosen type when the choice changed.
    pub fn handle_key(&mut self, key: SelectorKey) -> Option<&'static PaletteType> {
        match key {
            SelectorKey::Next if self.index + 1 < ALL.len() => {
                self.index += 1;
                Some(self.current())
            }
            SelectorKey::Previous if self.index > 0 => {
                self.index -= 1;
                Some(self.current())
            }
            SelectorKey::Toggle => {
                self.open = !self.open;
                None
            }
            _ => None,
        }
    }

    /// Pick the type at `index` directly and close.
    pub fn click(&mut self, index: usize) -> Option<&'static PaletteType> {
        self.open = false;
        if index >= ALL.len() {
            return None;
        }
        self.index = index;
        Some(self.current())
    }

    /// Focus moved elsewhere.
    pub fn blur(&mut self) {
        self.open = false;
    }

    /// Follow a type change made outside the selector.
    pub fn sync(&mut self, type_id: &str) {
        if let Some(index) = palette_type::index_of(type_id) {
            self.index = index;
        }
    }
}
