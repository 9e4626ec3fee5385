//! Pure navigation arithmetic for the album grid and the photo overlay.
//!
//! Kept free of any state so the wraparound rules can be tested in isolation.

use crate::config::{GRID_BREAKPOINTS, GRID_MIN_COLUMNS};

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Next => 1,
            Direction::Previous => -1,
        }
    }
}

/// Axis of a grid move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Responsive column count of the album grid for a viewport width.
pub fn grid_columns(viewport_width: u32) -> usize {
    GRID_BREAKPOINTS
        .iter()
        .find(|(min_width, _)| viewport_width >= *min_width)
        .map(|(_, columns)| *columns)
        .unwrap_or(GRID_MIN_COLUMNS)
}

/// Moves a position inside a grid of `len` items laid out in `columns`
/// columns.
///
/// Horizontal moves wrap from the last item to the first and back. Vertical
/// moves jump a full row and wrap while keeping the column; going up from the
/// first row lands on the last row, clamped to the last item when that row is
/// short.
pub fn step_grid(
    position: usize,
    len: usize,
    columns: usize,
    direction: Direction,
    axis: Axis,
) -> usize {
    if len == 0 {
        return 0;
    }
    let position = position.min(len - 1);
    let columns = columns.max(1);
    let last = len - 1;

    match axis {
        Axis::Horizontal => match direction {
            Direction::Next if position == last => 0,
            Direction::Next => position + 1,
            Direction::Previous if position == 0 => last,
            Direction::Previous => position - 1,
        },
        Axis::Vertical => {
            let target = position as isize + direction.delta() * columns as isize;
            let column = position % columns;
            if target < 0 {
                let last_row_start = (last / columns) * columns;
                (last_row_start + column).min(last)
            } else if target as usize >= len {
                column
            } else {
                target as usize
            }
        }
    }
}

/// Moves a 1-based overlay selection by one photo. Moves past either end are
/// rejected rather than wrapped.
pub fn step_overlay(selected: usize, photo_count: usize, direction: Direction) -> Option<usize> {
    let target = selected as isize + direction.delta();
    if target >= 1 && target as usize <= photo_count {
        Some(target as usize)
    } else {
        None
    }
}
