//! Dense occupancy grid that serves as the authoritative collision map.

use slither_core::{CellClass, CellTag, GridCoord};

/// Width of the margin between the grid edge and the playable interior,
/// measured from the left, right, and bottom edges.
const SIDE_MARGIN: u32 = 2;

/// First playable row; the rows above hold the score strip and top border.
const TOP_MARGIN: u32 = 4;

#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<CellTag>,
}

impl OccupancyGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut grid = Self {
            columns,
            rows,
            cells: vec![CellTag::Wall; capacity],
        };
        grid.reset();
        grid
    }

    /// Restores every playable cell to empty and every other cell to wall.
    pub(crate) fn reset(&mut self) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = GridCoord::new(column, row);
                let tag = if self.is_interior(cell) {
                    CellTag::Empty
                } else {
                    CellTag::Wall
                };
                self.set(cell, tag);
            }
        }
    }

    /// Reports whether the cell lies strictly inside the border box.
    pub(crate) fn is_interior(&self, cell: GridCoord) -> bool {
        cell.column() >= SIDE_MARGIN
            && cell.column() + SIDE_MARGIN < self.columns
            && cell.row() >= TOP_MARGIN
            && cell.row() + SIDE_MARGIN <= self.rows
    }

    /// Inclusive interior bounds as `(min_column, max_column, min_row, max_row)`.
    pub(crate) fn interior_span(&self) -> (u32, u32, u32, u32) {
        (
            SIDE_MARGIN,
            self.columns - SIDE_MARGIN - 1,
            TOP_MARGIN,
            self.rows - SIDE_MARGIN,
        )
    }

    pub(crate) fn tag(&self, cell: GridCoord) -> CellTag {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellTag::Wall)
    }

    pub(crate) fn classify(&self, cell: GridCoord) -> CellClass {
        self.tag(cell).classify()
    }

    /// Records a tag for the cell; out-of-bounds writes are ignored.
    pub(crate) fn set(&mut self, cell: GridCoord, tag: CellTag) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = tag;
            }
        }
    }

    pub(crate) fn cells(&self) -> &[CellTag] {
        &self.cells
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
