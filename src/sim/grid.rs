//! Uniform spatial grid over static world content
//!
//! Obstacles and pickups are bucketed once at world generation. Movers are never
//! stored here; they only query it for the static content around them.

use glam::Vec2;

/// Handle to a static entity stored in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridEntry {
    /// Index into the world's obstacle list
    Obstacle(usize),
    /// Index into the world's pickup list
    Pickup(usize),
}

/// Fixed-size square cells covering a W×H world
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: i32,
    rows: i32,
    /// Row-major cells
    cells: Vec<Vec<GridEntry>>,
}

impl SpatialGrid {
    pub fn new(world_w: f32, world_h: f32, cell_size: f32) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = ((world_w / cell_size).ceil() as i32).max(1);
        let rows = ((world_h / cell_size).ceil() as i32).max(1);
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); (cols * rows) as usize],
        }
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Unclamped cell coordinate of a world position
    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Place an entry in the cell containing `pos`. Out-of-world positions clamp
    /// into the nearest edge cell.
    pub fn insert(&mut self, entry: GridEntry, pos: Vec2) {
        let (col, row) = self.cell_of(pos);
        let col = col.clamp(0, self.cols - 1);
        let row = row.clamp(0, self.rows - 1);
        let idx = (row * self.cols + col) as usize;
        self.cells[idx].push(entry);
    }

    /// Remove every entry (world regeneration)
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// All entries in cells within `cell_radius` (Chebyshev) of the cell holding
    /// `pos`, centre cell included. No ordering guarantee.
    pub fn query_neighborhood(&self, pos: Vec2, cell_radius: i32) -> Vec<GridEntry> {
        self.neighborhood(pos, cell_radius).copied().collect()
    }

    /// Borrowing variant of [`Self::query_neighborhood`] for the hot path
    pub fn neighborhood(&self, pos: Vec2, cell_radius: i32) -> impl Iterator<Item = &GridEntry> {
        let (col, row) = self.cell_of(pos);
        let r = cell_radius.max(0);
        let col_lo = (col - r).max(0);
        let col_hi = (col + r).min(self.cols - 1);
        let row_lo = (row - r).max(0);
        let row_hi = (row + r).min(self.rows - 1);
        let cols = self.cols;

        (row_lo..=row_hi)
            .flat_map(move |rr| (col_lo..=col_hi).map(move |cc| (rr * cols + cc) as usize))
            .flat_map(move |idx| self.cells[idx].iter())
    }

    /// Total number of stored entries
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_insert_and_query_center_cell() {
        let mut grid = SpatialGrid::new(1024.0, 1024.0, 256.0);
        grid.insert(GridEntry::Obstacle(0), Vec2::new(10.0, 10.0));
        grid.insert(GridEntry::Obstacle(1), Vec2::new(900.0, 900.0));

        let near = grid.query_neighborhood(Vec2::new(100.0, 100.0), 1);
        assert_eq!(near, vec![GridEntry::Obstacle(0)]);
    }

    #[test]
    fn test_out_of_range_insert_clamps_to_edge() {
        let mut grid = SpatialGrid::new(512.0, 512.0, 256.0);
        grid.insert(GridEntry::Pickup(3), Vec2::new(-50.0, 9000.0));
        // Bottom-left edge cell
        let near = grid.query_neighborhood(Vec2::new(10.0, 500.0), 0);
        assert_eq!(near, vec![GridEntry::Pickup(3)]);
    }

    #[test]
    fn test_empty_region_returns_empty() {
        let grid = SpatialGrid::new(2048.0, 2048.0, 256.0);
        assert!(grid.query_neighborhood(Vec2::new(1000.0, 1000.0), 2).is_empty());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_query_outside_world_clips_range() {
        let mut grid = SpatialGrid::new(1024.0, 1024.0, 256.0);
        grid.insert(GridEntry::Obstacle(7), Vec2::new(5.0, 5.0));
        // One cell left of the world still reaches column 0 with radius 1
        assert_eq!(
            grid.query_neighborhood(Vec2::new(-100.0, 5.0), 1),
            vec![GridEntry::Obstacle(7)]
        );
        // Two cells away does not
        assert!(grid.query_neighborhood(Vec2::new(-300.0, 5.0), 1).is_empty());
    }

    proptest! {
        #[test]
        fn prop_neighborhood_matches_chebyshev(
            points in prop::collection::vec((0.0f32..2000.0, 0.0f32..2000.0), 1..60),
            qx in 0.0f32..2000.0,
            qy in 0.0f32..2000.0,
            radius in 0i32..3,
        ) {
            let mut grid = SpatialGrid::new(2000.0, 2000.0, 256.0);
            for (i, &(x, y)) in points.iter().enumerate() {
                grid.insert(GridEntry::Obstacle(i), Vec2::new(x, y));
            }
            let result = grid.query_neighborhood(Vec2::new(qx, qy), radius);
            let (qc, qr) = grid.cell_of(Vec2::new(qx, qy));

            for (i, &(x, y)) in points.iter().enumerate() {
                let (c, r) = grid.cell_of(Vec2::new(x, y));
                let within = (c - qc).abs() <= radius && (r - qr).abs() <= radius;
                let found = result.contains(&GridEntry::Obstacle(i));
                prop_assert_eq!(within, found);
            }
        }
    }
}
