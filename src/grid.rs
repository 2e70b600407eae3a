//! Keyboard navigation over the palette's colour grid.
//!
//! Colours are laid out column-major in columns of [`GRID_ROWS`]: index `i` sits at
//! row `i % GRID_ROWS`, column `i / GRID_ROWS`. Storage order is unaffected.

use crate::model::{Action, ColorPalette};

/// Rows per grid column.
pub const GRID_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A grid-level request produced by the input router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCommand {
    /// Move the selection.
    Select(Direction),
    /// Move the selected colour, keeping it selected.
    Move(Direction),
    DeleteSelected,
}

/// Index reached from `current` by one step in `direction`, if a colour exists there.
///
/// Vertical steps never leave the column. Horizontal steps must land exactly on an
/// existing colour; gaps are not skipped.
pub fn compute_target_index(current: usize, direction: Direction, total: usize) -> Option<usize> {
    let target = match direction {
        Direction::Up => {
            if current % GRID_ROWS == 0 {
                return None;
            }
            current - 1
        }
        Direction::Down => {
            let target = current + 1;
            if target % GRID_ROWS == 0 {
                return None;
            }
            target
        }
        Direction::Left => current.checked_sub(GRID_ROWS)?,
        Direction::Right => current + GRID_ROWS,
    };
    (target < total).then_some(target)
}

/// Translate a grid command into the reducer action it stands for.
///
/// Returns `None` when nothing is selected or the target cell is empty.
pub fn grid_action(palette: &ColorPalette, command: GridCommand) -> Option<Action> {
    let current = palette.selected_index()?;
    let selected_id = palette.colors[current].id;
    let total = palette.colors.len();

    match command {
        GridCommand::Select(direction) => {
            let target = compute_target_index(current, direction, total)?;
            Some(Action::SelectColor(palette.colors[target].id))
        }
        GridCommand::Move(direction) => {
            let target = compute_target_index(current, direction, total)?;
            Some(Action::MoveColor {
                id: selected_id,
                new_index: target,
            })
        }
        GridCommand::DeleteSelected => Some(Action::RemoveColor(selected_id)),
    }
}

/// Row and column of `index` in the grid.
pub fn cell_of(index: usize) -> (usize, usize) {
    (index % GRID_ROWS, index / GRID_ROWS)
}

/// Number of columns needed to show `total` colours.
pub fn column_count(total: usize) -> usize {
    total.div_ceil(GRID_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{reduce, IdAllocator};

    fn palette_of(n: usize, ids: &mut IdAllocator) -> ColorPalette {
        let hexes = (0..n).map(|i| format!("#{i:06X}")).collect();
        reduce(ColorPalette::new(ids), &Action::ReplaceColors(hexes), ids)
    }

    fn select_index(palette: ColorPalette, index: usize, ids: &mut IdAllocator) -> ColorPalette {
        let id = palette.colors[index].id;
        reduce(palette, &Action::SelectColor(id), ids)
    }

    fn apply(palette: ColorPalette, command: GridCommand, ids: &mut IdAllocator) -> ColorPalette {
        match grid_action(&palette, command) {
            Some(action) => reduce(palette, &action, ids),
            None => palette,
        }
    }

    // --- compute_target_index ---

    #[test]
    fn vertical_moves_stay_in_column() {
        assert_eq!(compute_target_index(0, Direction::Up, 10), None);
        assert_eq!(compute_target_index(5, Direction::Up, 10), None);
        assert_eq!(compute_target_index(6, Direction::Up, 10), Some(5));
        assert_eq!(compute_target_index(4, Direction::Down, 10), None);
        assert_eq!(compute_target_index(3, Direction::Down, 10), Some(4));
    }

    #[test]
    fn down_past_last_colour_is_none() {
        assert_eq!(compute_target_index(2, Direction::Down, 3), None);
        assert_eq!(compute_target_index(1, Direction::Down, 3), Some(2));
    }

    #[test]
    fn horizontal_moves_jump_a_column() {
        assert_eq!(compute_target_index(0, Direction::Right, 6), Some(5));
        assert_eq!(compute_target_index(5, Direction::Right, 6), None);
        assert_eq!(compute_target_index(7, Direction::Left, 10), Some(2));
        assert_eq!(compute_target_index(4, Direction::Left, 10), None);
    }

    #[test]
    fn horizontal_move_into_gap_is_none() {
        // 7 colours: column 1 holds 5 and 6 only.
        assert_eq!(compute_target_index(3, Direction::Right, 7), None);
        assert_eq!(compute_target_index(1, Direction::Right, 7), Some(6));
    }

    #[test]
    fn grid_geometry_helpers() {
        assert_eq!(cell_of(0), (0, 0));
        assert_eq!(cell_of(7), (2, 1));
        assert_eq!(column_count(0), 0);
        assert_eq!(column_count(5), 1);
        assert_eq!(column_count(6), 2);
        assert_eq!(column_count(20), 4);
    }

    // --- grid_action ---

    #[test]
    fn right_then_right_again_with_six_colours() {
        let mut ids = IdAllocator::new();
        let palette = palette_of(6, &mut ids);
        let palette = select_index(palette, 0, &mut ids);

        let palette = apply(palette, GridCommand::Select(Direction::Right), &mut ids);
        assert_eq!(palette.selected_index(), Some(5));

        assert!(grid_action(&palette, GridCommand::Select(Direction::Right)).is_none());
    }

    #[test]
    fn selection_does_not_mark_changes() {
        let mut ids = IdAllocator::new();
        let mut palette = palette_of(3, &mut ids);
        palette.has_changes = false;
        let palette = apply(palette, GridCommand::Select(Direction::Down), &mut ids);
        assert_eq!(palette.selected_index(), Some(1));
        assert!(!palette.has_changes);
    }

    #[test]
    fn shift_up_at_top_is_noop() {
        let mut ids = IdAllocator::new();
        let palette = palette_of(3, &mut ids);
        let palette = select_index(palette, 0, &mut ids);
        assert!(grid_action(&palette, GridCommand::Move(Direction::Up)).is_none());
    }

    #[test]
    fn shift_down_moves_colour_and_selection_follows() {
        let mut ids = IdAllocator::new();
        let palette = palette_of(3, &mut ids);
        let moved = palette.colors[0].clone();
        let palette = apply(palette, GridCommand::Move(Direction::Down), &mut ids);

        assert_eq!(palette.colors[1].id, moved.id);
        assert_eq!(palette.selected_index(), Some(1));
        assert!(palette.has_changes);
    }

    #[test]
    fn shift_right_moves_into_next_column() {
        let mut ids = IdAllocator::new();
        let palette = palette_of(8, &mut ids);
        let palette = select_index(palette, 1, &mut ids);
        let moved = palette.colors[1].id;
        let palette = apply(palette, GridCommand::Move(Direction::Right), &mut ids);

        assert_eq!(palette.colors[6].id, moved);
        assert_eq!(palette.selected_index(), Some(6));
        assert_eq!(palette.colors.len(), 8);
    }

    #[test]
    fn shift_left_moves_into_previous_column() {
        let mut ids = IdAllocator::new();
        let palette = palette_of(8, &mut ids);
        let palette = select_index(palette, 7, &mut ids);
        let moved = palette.colors[7].id;
        let palette = apply(palette, GridCommand::Move(Direction::Left), &mut ids);

        assert_eq!(palette.colors[2].id, moved);
        assert_eq!(palette.selected_index(), Some(2));
    }

    #[test]
    fn commands_without_selection_are_noops() {
        let mut ids = IdAllocator::new();
        let palette = ColorPalette::new(&mut ids);
        assert!(palette.selected().is_none());
        assert!(grid_action(&palette, GridCommand::Select(Direction::Down)).is_none());
        assert!(grid_action(&palette, GridCommand::Move(Direction::Down)).is_none());
        assert!(grid_action(&palette, GridCommand::DeleteSelected).is_none());
    }

    #[test]
    fn delete_selected_follows_remove_rules() {
        let mut ids = IdAllocator::new();
        let palette = palette_of(3, &mut ids);
        let palette = select_index(palette, 1, &mut ids);
        let next = palette.colors[2].id;
        let palette = apply(palette, GridCommand::DeleteSelected, &mut ids);

        assert_eq!(palette.colors.len(), 2);
        assert_eq!(palette.selected().map(|c| c.id), Some(next));
    }
}
