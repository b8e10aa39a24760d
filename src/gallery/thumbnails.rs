//! Which grid rows hold decoded thumbnails.
//!
//! The grid reports rows as they come into view. Each newly shown row is
//! loaded; rows that drift more than `resident_rows` away from the last shown
//! row are released, so memory follows the viewport rather than the library.

use log::debug;
use std::collections::BTreeSet;
use std::ops::Range;

/// Item ranges to decode and to release after a row came into view.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RowUpdate {
    pub load: Range<usize>,
    pub release: Vec<Range<usize>>,
}

#[derive(Debug)]
pub struct ThumbnailWindow {
    columns: usize,
    resident_rows: usize,
    item_count: usize,
    resident: BTreeSet<usize>,
}

impl ThumbnailWindow {
    pub fn new(columns: usize, resident_rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            resident_rows,
            item_count: 0,
            resident: BTreeSet::new(),
        }
    }

    /// Starts over for a new item list. Nothing is resident afterwards.
    pub fn reset(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.resident.clear();
    }

    fn items_of(&self, row: usize) -> Range<usize> {
        let start = (row * self.columns).min(self.item_count);
        let end = (start + self.columns).min(self.item_count);
        start..end
    }

    /// Records that `row` is visible.
    pub fn show_row(&mut self, row: usize) -> RowUpdate {
        let load = self.items_of(row);
        if load.is_empty() || !self.resident.insert(row) {
            return RowUpdate::default();
        }

        let low = row.saturating_sub(self.resident_rows);
        let high = row.saturating_add(self.resident_rows);
        let far: Vec<usize> = self
            .resident
            .iter()
            .copied()
            .filter(|&r| r < low || r > high)
            .collect();
        let release = far
            .into_iter()
            .map(|r| {
                self.resident.remove(&r);
                self.items_of(r)
            })
            .collect::<Vec<_>>();

        if !release.is_empty() {
            debug!("Row {} shown; releasing {} rows", row, release.len());
        }
        RowUpdate { load, release }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_showing_loads_the_row() {
        let mut window = ThumbnailWindow::new(4, 10);
        window.reset(10);

        assert_eq!(window.show_row(0).load, 0..4);
        assert_eq!(window.show_row(2).load, 8..10);
        assert_eq!(window.show_row(0), RowUpdate::default());
    }

    #[test]
    fn rows_past_the_end_load_nothing() {
        let mut window = ThumbnailWindow::new(4, 10);
        window.reset(10);
        assert_eq!(window.show_row(3), RowUpdate::default());

        window.reset(0);
        assert_eq!(window.show_row(0), RowUpdate::default());
    }

    #[test]
    fn distant_rows_are_released() {
        let mut window = ThumbnailWindow::new(2, 1);
        window.reset(20);
        window.show_row(0);
        assert!(window.show_row(1).release.is_empty());
        assert_eq!(window.show_row(2).release, vec![0..2]);

        let update = window.show_row(3);
        assert_eq!(update.load, 6..8);
        assert_eq!(update.release, vec![2..4]);

        // Released rows load again when they come back.
        assert_eq!(window.show_row(0).load, 0..2);
    }

    #[test]
    fn reset_forgets_resident_rows() {
        let mut window = ThumbnailWindow::new(3, 5);
        window.reset(9);
        window.show_row(1);

        window.reset(9);
        assert_eq!(window.show_row(1).load, 3..6);
    }
}
