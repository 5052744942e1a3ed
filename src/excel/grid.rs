//! Raw cell grid plus merge regions, as read from (or planned for) a sheet

use super::layout::SEQUENCE_TITLE;

/// Inclusive, 0-indexed rectangle of merged cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRegion {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRegion {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Columns spanned (at least 1)
    pub fn width(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col) + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row) && (self.start_col..=self.end_col).contains(&col)
    }
}

/// Cell values of one worksheet. Absent cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    rows: Vec<Vec<Option<String>>>,
    merges: Vec<MergeRegion>,
}

impl SheetGrid {
    pub fn new(rows: Vec<Vec<Option<String>>>, merges: Vec<MergeRegion>) -> Self {
        Self { rows, merges }
    }

    /// Build a grid from plain text rows; empty strings become absent cells
    pub fn from_text_rows<R, S>(rows: R, merges: Vec<MergeRegion>) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell = cell.as_ref();
                        (!cell.is_empty()).then(|| cell.to_string())
                    })
                    .collect()
            })
            .collect();
        Self { rows, merges }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether any merge region covers the cell
    pub fn is_merged(&self, row: u32, col: u32) -> bool {
        self.merges.iter().any(|m| m.contains(row, col))
    }

    pub fn merges(&self) -> &[MergeRegion] {
        &self.merges
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&str> {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .and_then(|c| c.as_deref())
    }

    /// Trimmed cell text, "" when absent
    pub fn text(&self, row: u32, col: u32) -> &str {
        self.cell(row, col).map(str::trim).unwrap_or("")
    }

    /// Row index of the "STT" title header, if the sheet has one
    pub fn header_row(&self) -> Option<u32> {
        (0..self.rows.len() as u32).find(|&row| self.text(row, 0).eq_ignore_ascii_case(SEQUENCE_TITLE))
    }

    /// The part of the sheet starting at the "STT" header row.
    ///
    /// Banner and title rows of a full report sit above the header; they and
    /// any merges starting there are dropped and the rest is shifted up. A
    /// sheet without the header is returned unchanged.
    pub fn importable_region(&self) -> SheetGrid {
        let offset = match self.header_row() {
            Some(row) if row > 0 => row,
            _ => return self.clone(),
        };

        let rows = self.rows[offset as usize..].to_vec();
        let merges = self
            .merges
            .iter()
            .filter(|m| m.start_row >= offset)
            .map(|m| MergeRegion::new(m.start_row - offset, m.start_col, m.end_row - offset, m.end_col))
            .collect();

        SheetGrid { rows, merges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_region_geometry() {
        let region = MergeRegion::new(1, 2, 1, 6);
        assert_eq!(region.width(), 5);
        assert!(!region.is_single_cell());
        assert!(region.contains(1, 4));
        assert!(!region.contains(2, 4));
        assert!(MergeRegion::new(3, 3, 3, 3).is_single_cell());
    }

    #[test]
    fn test_cell_access_and_trim() {
        let grid = SheetGrid::from_text_rows(vec![vec!["", " An "]], vec![]);
        assert_eq!(grid.cell(0, 0), None);
        assert_eq!(grid.cell(0, 1), Some(" An "));
        assert_eq!(grid.text(0, 1), "An");
        assert_eq!(grid.text(5, 5), "");
    }

    #[test]
    fn test_importable_region_shifts_rows_and_merges() {
        let grid = SheetGrid::from_text_rows(
            vec![
                vec!["TRƯỜNG MG BÌNH HÒA"],
                vec!["Lớp: Lá 1"],
                vec!["stt", "Họ và tên", "MỤC TIÊU"],
                vec!["", "", "PTTC"],
            ],
            vec![
                MergeRegion::new(0, 0, 0, 5),
                MergeRegion::new(2, 0, 3, 0),
                MergeRegion::new(3, 2, 3, 4),
            ],
        );

        assert_eq!(grid.header_row(), Some(2));
        let region = grid.importable_region();
        assert_eq!(region.height(), 2);
        assert_eq!(region.text(1, 2), "PTTC");
        assert_eq!(
            region.merges(),
            &[MergeRegion::new(0, 0, 1, 0), MergeRegion::new(1, 2, 1, 4)]
        );
    }

    #[test]
    fn test_width_and_merge_cover() {
        let grid = SheetGrid::from_text_rows(
            vec![vec!["a"], vec!["b", "c", "d"]],
            vec![MergeRegion::new(0, 0, 1, 0)],
        );
        assert_eq!(grid.width(), 3);
        assert!(grid.is_merged(1, 0));
        assert!(!grid.is_merged(1, 1));
    }

    #[test]
    fn test_importable_region_without_header_is_identity() {
        let grid = SheetGrid::from_text_rows(vec![vec!["x"], vec!["y"]], vec![]);
        assert_eq!(grid.importable_region(), grid);
    }
}
