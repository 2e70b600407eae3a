use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::Color as AppColor;
use crate::grid::{cell_of, column_count, GRID_ROWS};
use crate::model::ColorPalette;
use crate::palette_type::ALL;
use crate::type_selector::TypeSelector;

const SWATCH_WIDTH: usize = 11;

/// Renders the palette as a column-major grid of colored swatches, five rows per
/// column. Highlights the selected colour.
pub struct PaletteWidget<'a> {
    palette: &'a ColorPalette,
    focused: bool,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(palette: &'a ColorPalette, focused: bool) -> Self {
        Self { palette, focused }
    }
}

/// Terminal colour for a hex string, if it parses.
fn to_color(hex: &str) -> Option<Color> {
    AppColor::from_hex(hex)
        .ok()
        .map(|c| Color::Rgb(c.r, c.g, c.b))
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(hex: &str) -> Color {
    match AppColor::from_hex(hex) {
        Ok(c) if c.relative_luminance() > 0.4 => Color::Black,
        Ok(_) => Color::White,
        Err(_) => Color::Red,
    }
}

/// One grid row: the colours at `row`, `row + 5`, `row + 10`, ...
fn build_grid_row(palette: &ColorPalette, row: usize) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for column in 0..column_count(palette.colors.len()) {
        let index = column * GRID_ROWS + row;
        let Some(color) = palette.colors.get(index) else {
            continue;
        };
        let label = format!("{:^width$}", color.hex, width = SWATCH_WIDTH);
        let mut style = Style::default().fg(contrast_fg(&color.hex));
        if let Some(bg) = to_color(&color.hex) {
            style = style.bg(bg);
        }
        if color.is_selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED | Modifier::REVERSED);
        }
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dirty = if self.palette.has_changes { " *" } else { "" };
        let title = format!(
            "{} ({}/{}){dirty}",
            if self.palette.name.is_empty() {
                "Untitled"
            } else {
                self.palette.name.as_str()
            },
            self.palette.colors.len(),
            crate::model::MAXIMUM_PALETTE_COLORS,
        );
        let mut block = Block::bordered().title(title);
        if self.focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line<'_>> = (0..GRID_ROWS)
            .map(|row| build_grid_row(self.palette, row))
            .collect();

        if let Some(index) = self.palette.selected_index() {
            let (row, column) = cell_of(index);
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "  #{} {}  row {} column {}",
                index + 1,
                self.palette.colors[index].hex,
                row + 1,
                column + 1
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// The palette type dropdown.
pub struct TypeSelectorWidget<'a> {
    selector: &'a TypeSelector,
    focused: bool,
}

impl<'a> TypeSelectorWidget<'a> {
    pub fn new(selector: &'a TypeSelector, focused: bool) -> Self {
        Self { selector, focused }
    }
}

impl Widget for TypeSelectorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::bordered().title("Type");
        if self.focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.selector.is_open() {
            let mut spans = Vec::new();
            for (i, palette_type) in ALL.iter().enumerate() {
                let style = if i == self.selector.index() {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                spans.push(Span::styled(format!(" {}:{} ", i + 1, palette_type.name), style));
            }
            Line::from(spans)
        } else {
            Line::from(format!(" {} ▾", self.selector.current().name))
        };
        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{reduce, Action, IdAllocator};

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn grid_renders_column_major() {
        let mut ids = IdAllocator::new();
        let hexes = (0..7).map(|i| format!("#00000{i}")).collect();
        let palette = reduce(ColorPalette::new(&mut ids), &Action::ReplaceColors(hexes), &mut ids);

        let line = build_grid_row(&palette, 1);
        let text: String = line.spans.iter().map(|s| &*s.content).collect();
        assert!(text.contains("#000001"));
        assert!(text.contains("#000006"));
        assert!(!text.contains("#000002"));

        let line = build_grid_row(&palette, 3);
        let text: String = line.spans.iter().map(|s| &*s.content).collect();
        assert!(text.contains("#000003"));
        assert!(!text.contains("#000008"));
    }

    #[test]
    fn palette_widget_shows_name_and_selection() {
        let mut ids = IdAllocator::new();
        let palette = reduce(
            ColorPalette::new(&mut ids),
            &Action::ReplacePalette {
                name: Some("Ocean".into()),
                type_id: None,
                colors: vec!["#003366".into()],
            },
            &mut ids,
        );
        let area = Rect::new(0, 0, 50, 10);
        let mut buf = Buffer::empty(area);
        PaletteWidget::new(&palette, true).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Ocean (1/20) *"));
        assert!(text.contains("#1 #003366"));
    }

    #[test]
    fn invalid_hex_still_renders() {
        assert_eq!(to_color("oops"), None);
        assert_eq!(contrast_fg("oops"), Color::Red);
        assert_eq!(contrast_fg("#FFFFFF"), Color::Black);
        assert_eq!(contrast_fg("#000"), Color::White);
    }

    #[test]
    fn type_selector_lists_types_when_open() {
        let mut selector = TypeSelector::new("ordered-sequential");
        let area = Rect::new(0, 0, 60, 3);

        let mut buf = Buffer::empty(area);
        TypeSelectorWidget::new(&selector, false).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("Sequential"));
        assert!(!buffer_text(&buf).contains("Diverging"));

        selector.handle_key(crate::type_selector::SelectorKey::Toggle);
        let mut buf = Buffer::empty(area);
        TypeSelectorWidget::new(&selector, true).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("1:Regular"));
        assert!(text.contains("3:Diverging"));
    }
}
