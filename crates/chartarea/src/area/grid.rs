use smallvec::SmallVec;

use chartarea_core::{
    geometry::{Bounds, Point},
    region::{HitTest, Region},
};

/// Child indices recorded in one grid cell.
pub type Cell = SmallVec<[u32; 8]>;

/// A coarse spatial index over the children of a container.
///
/// The container bounds are split into `columns × rows` cells; each cell
/// records the indices of the children whose regions intersect it. A point
/// query then only tests the children listed in the cell under the point.
#[derive(Debug, Clone, PartialEq)]
pub struct GridIndex {
    columns: u8,
    rows: u8,
    bounds: Bounds,
    cells: Vec<Cell>,
}

impl GridIndex {
    /// Builds an index over `children`, given as the regions of each child in
    /// the same coordinate space as `bounds`.
    pub fn build<'a>(
        bounds: Bounds,
        columns: usize,
        rows: usize,
        children: impl IntoIterator<Item = &'a [Region]>,
    ) -> Self {
        let columns = columns.clamp(1, u8::MAX as usize) as u8;
        let rows = rows.clamp(1, u8::MAX as usize) as u8;
        let mut index = Self {
            columns,
            rows,
            bounds,
            cells: vec![Cell::new(); columns as usize * rows as usize],
        };

        let cell_bounds: Vec<Bounds> = (0..index.cells.len())
            .map(|cell| index.cell_bounds(cell))
            .collect();
        for (child, regions) in children.into_iter().enumerate() {
            for (cell, area) in cell_bounds.iter().enumerate() {
                if regions.iter().any(|region| region.intersects(*area)) {
                    index.cells[cell].push(child as u32);
                }
            }
        }
        index
    }

    /// Restores an index from its parts.
    pub fn from_parts(columns: u8, rows: u8, bounds: Bounds, cells: Vec<Cell>) -> Self {
        Self {
            columns,
            rows,
            bounds,
            cells,
        }
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the bounds of the cell at `index`, counted row by row.
    pub fn cell_bounds(&self, index: usize) -> Bounds {
        let columns = self.columns as usize;
        let (column, row) = (index % columns, index / columns);
        let width = self.bounds.width() / f64::from(self.columns);
        let height = self.bounds.height() / f64::from(self.rows);
        Bounds::from_rect(
            self.bounds.min_x() + width * column as f64,
            self.bounds.min_y() + height * row as f64,
            width,
            height,
        )
    }

    /// Returns the cell index under `point`.
    pub fn cell_at(&self, point: Point) -> Option<usize> {
        if !self.bounds.contains(point) {
            return None;
        }
        let fx = (point.x() - self.bounds.min_x()) / self.bounds.width();
        let fy = (point.y() - self.bounds.min_y()) / self.bounds.height();
        let column = ((fx * f64::from(self.columns)) as usize).min(self.columns as usize - 1);
        let row = ((fy * f64::from(self.rows)) as usize).min(self.rows as usize - 1);
        Some(row * self.columns as usize + column)
    }

    /// Returns the children that may contain `point`, or `None` when the
    /// point lies outside the indexed bounds.
    pub fn candidates(&self, point: Point) -> Option<&[u32]> {
        self.cell_at(point)
            .and_then(|cell| self.cells.get(cell))
            .map(|cell| cell.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use chartarea_core::region::RectRegion;

    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<Region> {
        vec![RectRegion::new(Bounds::from_rect(x, y, w, h)).into()]
    }

    #[test]
    fn test_cells_record_intersecting_children() {
        let children = [
            rect(0.0, 0.0, 10.0, 10.0),
            rect(50.0, 50.0, 80.0, 10.0),
            rect(250.0, 250.0, 20.0, 20.0),
        ];
        let grid = GridIndex::build(
            Bounds::from_rect(0.0, 0.0, 300.0, 300.0),
            3,
            3,
            children.iter().map(Vec::as_slice),
        );

        assert_eq!(grid.cells().len(), 9);
        assert_eq!(grid.cells()[0].as_slice(), &[0, 1]);
        assert_eq!(grid.cells()[1].as_slice(), &[1]);
        assert_eq!(grid.cells()[8].as_slice(), &[2]);
        assert!(grid.cells()[4].is_empty());
    }

    #[test]
    fn test_candidates() {
        let children = [rect(0.0, 0.0, 10.0, 10.0), rect(250.0, 250.0, 20.0, 20.0)];
        let grid = GridIndex::build(
            Bounds::from_rect(0.0, 0.0, 300.0, 300.0),
            3,
            3,
            children.iter().map(Vec::as_slice),
        );

        assert_eq!(grid.candidates(Point::new(5.0, 5.0)), Some(&[0u32][..]));
        assert_eq!(grid.candidates(Point::new(299.0, 299.0)), Some(&[1u32][..]));
        assert_eq!(grid.candidates(Point::new(150.0, 150.0)), Some(&[][..]));
        assert_eq!(grid.candidates(Point::new(300.0, 10.0)), None);
    }

    #[test]
    fn test_cell_bounds_tile_the_grid() {
        let grid = GridIndex::build(
            Bounds::from_rect(10.0, 20.0, 90.0, 60.0),
            3,
            3,
            std::iter::empty::<&[Region]>(),
        );
        assert_eq!(grid.cell_bounds(0), Bounds::from_rect(10.0, 20.0, 30.0, 20.0));
        assert_eq!(grid.cell_bounds(8), Bounds::from_rect(70.0, 60.0, 30.0, 20.0));
        assert_eq!(grid.cell_at(Point::new(45.0, 45.0)), Some(4));
    }
}
