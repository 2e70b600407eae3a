/// A palette classification understood by the preferences file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteType {
    pub id: &'static str,
    pub name: &'static str,
}

pub const REGULAR: PaletteType = PaletteType {
    id: "regular",
    name: "Regular",
};

pub const SEQUENTIAL: PaletteType = PaletteType {
    id: "ordered-sequential",
    name: "Sequential",
};

pub const DIVERGING: PaletteType = PaletteType {
    id: "ordered-diverging",
    name: "Diverging",
};

/// Every known palette type, in display order.
pub static ALL: [PaletteType; 3] = [REGULAR, SEQUENTIAL, DIVERGING];

impl PaletteType {
    /// The type used whenever an id is missing or unknown.
    pub fn default_type() -> &'static PaletteType {
        &ALL[0]
    }
}

impl std::fmt::Display for PaletteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Look up a palette type by its id.
pub fn find(id: &str) -> Option<&'static PaletteType> {
    ALL.iter().find(|t| t.id == id)
}

/// Look up a palette type on a path where the id has already been validated.
///
/// Unknown ids resolve to the default type rather than failing.
pub fn get(id: &str) -> &'static PaletteType {
    find(id).unwrap_or_else(PaletteType::default_type)
}

/// Position of a type id in [`ALL`].
pub fn index_of(id: &str) -> Option<usize> {
    ALL.iter().position(|t| t.id == id)
}
