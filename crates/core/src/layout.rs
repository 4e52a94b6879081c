//! Logical key grid: maps 2-D board coordinates to firmware LED IDs.
//!
//! The canvas is 22 columns by 6 rows, wide enough for a full-size board
//! including the nav cluster and numpad. Cells with no physical key map to
//! [`LedId::None`] and are skipped by the color-grid driver.

use crate::protocol::LedId;

/// Grid width in columns.
pub const GRID_COLUMNS: usize = 22;
/// Grid height in rows.
pub const GRID_ROWS: usize = 6;

/// Gram Spectrum key positions as `(led, column, row)`.
///
/// Column 0 is the left edge (Escape column), row 0 the function row.
const GRAM_SPECTRUM_KEYS: &[(LedId, usize, usize)] = &[
    // Function row
    (LedId::Escape, 0, 0),
    (LedId::F1, 2, 0),
    (LedId::F2, 3, 0),
    (LedId::F3, 4, 0),
    (LedId::F4, 5, 0),
    (LedId::F5, 6, 0),
    (LedId::F6, 7, 0),
    (LedId::F7, 8, 0),
    (LedId::F8, 9, 0),
    (LedId::F9, 11, 0),
    (LedId::F10, 12, 0),
    (LedId::F11, 13, 0),
    (LedId::F12, 14, 0),
    (LedId::PrintScreen, 15, 0),
    (LedId::ScrollLock, 16, 0),
    (LedId::Pause, 17, 0),
    // Number row
    (LedId::Grave, 0, 1),
    (LedId::D1, 1, 1),
    (LedId::D2, 2, 1),
    (LedId::D3, 3, 1),
    (LedId::D4, 4, 1),
    (LedId::D5, 5, 1),
    (LedId::D6, 6, 1),
    (LedId::D7, 7, 1),
    (LedId::D8, 8, 1),
    (LedId::D9, 9, 1),
    (LedId::D0, 10, 1),
    (LedId::Minus, 11, 1),
    (LedId::Equals, 12, 1),
    (LedId::Backspace, 13, 1),
    (LedId::Insert, 15, 1),
    (LedId::Home, 16, 1),
    (LedId::PageUp, 17, 1),
    (LedId::NumLock, 18, 1),
    (LedId::NumDivide, 19, 1),
    (LedId::NumMultiply, 20, 1),
    (LedId::NumSubtract, 21, 1),
    // Top letter row
    (LedId::Tab, 0, 2),
    (LedId::Q, 1, 2),
    (LedId::W, 2, 2),
    (LedId::E, 3, 2),
    (LedId::R, 5, 2),
    (LedId::T, 6, 2),
    (LedId::Y, 7, 2),
    (LedId::U, 8, 2),
    (LedId::I, 9, 2),
    (LedId::O, 10, 2),
    (LedId::P, 11, 2),
    (LedId::LeftBracket, 12, 2),
    (LedId::RightBracket, 13, 2),
    (LedId::Backslash, 14, 2),
    (LedId::Delete, 15, 2),
    (LedId::End, 16, 2),
    (LedId::PageDown, 17, 2),
    (LedId::NumPad7, 18, 2),
    (LedId::NumPad8, 19, 2),
    (LedId::NumPad9, 20, 2),
    (LedId::NumAdd, 21, 2),
    // Home row
    (LedId::CapsLock, 0, 3),
    (LedId::A, 1, 3),
    (LedId::S, 3, 3),
    (LedId::D, 4, 3),
    (LedId::F, 5, 3),
    (LedId::G, 6, 3),
    (LedId::H, 7, 3),
    (LedId::J, 8, 3),
    (LedId::K, 9, 3),
    (LedId::L, 10, 3),
    (LedId::Semicolon, 11, 3),
    (LedId::Apostrophe, 12, 3),
    (LedId::Enter, 14, 3),
    (LedId::NumPad4, 17, 3),
    (LedId::NumPad5, 18, 3),
    (LedId::NumPad6, 19, 3),
    // Bottom letter row
    (LedId::LeftShift, 1, 4),
    (LedId::Z, 2, 4),
    (LedId::X, 3, 4),
    (LedId::C, 4, 4),
    (LedId::V, 5, 4),
    (LedId::B, 6, 4),
    (LedId::N, 7, 4),
    (LedId::M, 8, 4),
    (LedId::Comma, 9, 4),
    (LedId::Period, 10, 4),
    (LedId::Slash, 11, 4),
    (LedId::RightShift, 13, 4),
    (LedId::Up, 16, 4),
    (LedId::NumPad1, 18, 4),
    (LedId::NumPad2, 19, 4),
    (LedId::NumPad3, 20, 4),
    (LedId::NumPadEnter, 21, 4),
    // Modifier row
    (LedId::LeftControl, 0, 5),
    (LedId::Windows, 1, 5),
    (LedId::Alt, 3, 5),
    (LedId::Space, 6, 5),
    (LedId::AltGr, 11, 5),
    (LedId::Fn, 12, 5),
    (LedId::Menu, 13, 5),
    (LedId::RightControl, 14, 5),
    (LedId::Left, 15, 5),
    (LedId::Down, 16, 5),
    (LedId::Right, 17, 5),
    (LedId::NumPad0, 18, 5),
    (LedId::NumDecimal, 20, 5),
];

/// Immutable coordinate-to-LED lookup, built once and shared by all grid
/// operations.
#[derive(Debug, Clone)]
pub struct KeyLayout {
    cells: [[LedId; GRID_ROWS]; GRID_COLUMNS],
}

impl KeyLayout {
    /// Layout with every cell unmapped. Starting point for boards whose
    /// table is assembled elsewhere.
    pub fn empty() -> Self {
        Self {
            cells: [[LedId::None; GRID_ROWS]; GRID_COLUMNS],
        }
    }

    /// The Gram Spectrum full-size ANSI layout.
    pub fn gram_spectrum() -> Self {
        let mut layout = Self::empty();
        for &(led, col, row) in GRAM_SPECTRUM_KEYS {
            layout.assign(led, col, row);
        }
        layout
    }

    /// Assign a key to a cell. Out-of-range coordinates are ignored.
    fn assign(&mut self, led: LedId, col: usize, row: usize) {
        if col < GRID_COLUMNS && row < GRID_ROWS {
            self.cells[col][row] = led;
        }
    }

    /// LED at a grid coordinate. Out-of-range coordinates report
    /// [`LedId::None`], the same as an unmapped cell.
    pub fn led_at(&self, col: usize, row: usize) -> LedId {
        if col < GRID_COLUMNS && row < GRID_ROWS {
            self.cells[col][row]
        } else {
            LedId::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_positions_resolve() {
        let layout = KeyLayout::gram_spectrum();
        assert_eq!(layout.led_at(0, 0), LedId::Escape);
        assert_eq!(layout.led_at(2, 0), LedId::F1);
        assert_eq!(layout.led_at(0, 1), LedId::Grave);
        assert_eq!(layout.led_at(6, 5), LedId::Space);
        assert_eq!(layout.led_at(21, 4), LedId::NumPadEnter);
        assert_eq!(layout.led_at(20, 5), LedId::NumDecimal);
    }

    #[test]
    fn unassigned_cells_are_none() {
        let layout = KeyLayout::gram_spectrum();
        // Gaps in the physical board: right of Escape, right of F8,
        // below the spacebar row has none, but (2,5) sits between Win and Alt.
        assert_eq!(layout.led_at(1, 0), LedId::None);
        assert_eq!(layout.led_at(10, 0), LedId::None);
        assert_eq!(layout.led_at(2, 5), LedId::None);
        assert_eq!(layout.led_at(19, 5), LedId::None);
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let layout = KeyLayout::gram_spectrum();
        assert_eq!(layout.led_at(GRID_COLUMNS, 0), LedId::None);
        assert_eq!(layout.led_at(0, GRID_ROWS), LedId::None);
    }

    #[test]
    fn every_table_entry_is_in_bounds_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for &(led, col, row) in GRAM_SPECTRUM_KEYS {
            assert!(col < GRID_COLUMNS && row < GRID_ROWS, "{led:?} out of bounds");
            assert!(seen.insert(led), "{led:?} assigned twice");
            assert_ne!(led, LedId::None);
        }
    }

    #[test]
    fn assigned_cell_count_matches_table() {
        let layout = KeyLayout::gram_spectrum();
        let assigned = (0..GRID_COLUMNS)
            .flat_map(|c| (0..GRID_ROWS).map(move |r| (c, r)))
            .filter(|&(c, r)| layout.led_at(c, r) != LedId::None)
            .count();
        assert_eq!(assigned, GRAM_SPECTRUM_KEYS.len());
    }

    #[test]
    fn empty_layout_is_fully_unmapped() {
        let layout = KeyLayout::empty();
        for col in 0..GRID_COLUMNS {
            for row in 0..GRID_ROWS {
                assert_eq!(layout.led_at(col, row), LedId::None);
            }
        }
    }
}
