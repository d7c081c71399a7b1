//! Procedurally generated track terrain
//!
//! The track is an append-only, row-major occupancy grid. The row index is
//! longitudinal distance along the track and the column index is lateral
//! position. Column 0 and column `track_breadth + 1` are the outer walls;
//! the `track_breadth` columns between them are the playable lanes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_ROW_RESAMPLES;

/// Occupancy of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

/// The expanding track grid.
///
/// Rows are appended in strictly increasing order and never removed. Every
/// generated row is passable: an obstacle row always keeps at least one inner
/// lane open.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    track_breadth: usize,
    cells: Vec<Cell>,
    rng: Pcg32,
}

impl TerrainGrid {
    /// Create a track seeded with a solid boundary row followed by a run-in
    /// of fully open rows.
    pub fn new(track_breadth: usize, initial_open_rows: usize, seed: u64) -> Self {
        assert!(track_breadth > 0, "track needs at least one lane");

        let mut grid = Self {
            track_breadth,
            cells: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };

        grid.push_row_cells(vec![Cell::Wall; track_breadth]);
        for _ in 0..initial_open_rows {
            grid.push_open_row();
        }
        grid
    }

    /// Total grid width including the two outer wall columns.
    pub fn width(&self) -> usize {
        self.track_breadth + 2
    }

    /// Number of generated rows.
    pub fn len(&self) -> usize {
        self.cells.len() / self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupancy at `(row, col)`.
    ///
    /// Panics when the cell has not been generated or `col` lies outside the
    /// track. Both indicate a control-flow bug in the caller: extension must
    /// precede queries.
    pub fn occupied(&self, row: usize, col: usize) -> bool {
        assert!(
            col < self.width(),
            "lateral index {col} outside track of width {}",
            self.width()
        );
        assert!(
            row < self.len(),
            "row {row} queried before generation (grid length {})",
            self.len()
        );
        self.cells[row * self.width() + col] == Cell::Wall
    }

    /// Append rows until the grid reaches `player_row + lookahead`.
    ///
    /// Every `spacing`-th absolute row index becomes an obstacle row; all
    /// other rows are fully open.
    pub fn extend(
        &mut self,
        player_row: usize,
        lookahead: usize,
        spacing: usize,
        obstacle_probability: f64,
    ) {
        while self.len() < player_row + lookahead {
            if self.len() % spacing == 0 {
                self.push_obstacle_row(obstacle_probability);
            } else {
                self.push_open_row();
            }
        }
    }

    /// Sample an obstacle row: each lane is a wall with the given
    /// probability, rejecting fully blocked rows. The retry budget is capped;
    /// if it runs out, one random lane is forced open so the row stays
    /// passable.
    fn push_obstacle_row(&mut self, obstacle_probability: f64) {
        let mut lanes = vec![Cell::Wall; self.track_breadth];

        let mut passable = false;
        for _ in 0..MAX_ROW_RESAMPLES {
            for lane in lanes.iter_mut() {
                *lane = if self.rng.random_bool(obstacle_probability) {
                    Cell::Wall
                } else {
                    Cell::Open
                };
            }
            if lanes.contains(&Cell::Open) {
                passable = true;
                break;
            }
        }

        if !passable {
            let gap = self.rng.random_range(0..self.track_breadth);
            lanes[gap] = Cell::Open;
        }

        self.push_row_cells(lanes);
    }

    fn push_open_row(&mut self) {
        self.push_row_cells(vec![Cell::Open; self.track_breadth]);
    }

    /// Append one row: the given lane cells flanked by the outer walls.
    fn push_row_cells(&mut self, lanes: Vec<Cell>) {
        debug_assert_eq!(lanes.len(), self.track_breadth);
        self.cells.push(Cell::Wall);
        self.cells.extend(lanes);
        self.cells.push(Cell::Wall);
    }
}

#[cfg(test)]
impl TerrainGrid {
    /// Append an arbitrary row of lane cells. Tests use this to stage
    /// layouts the generator would never produce, like a fully blocked row.
    pub(crate) fn push_test_row(&mut self, lanes: Vec<Cell>) {
        self.push_row_cells(lanes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_outer_columns_are_always_wall() {
        let mut grid = TerrainGrid::new(7, 10, 42);
        grid.extend(0, 120, 30, 0.6);

        for row in 0..grid.len() {
            assert!(grid.occupied(row, 0));
            assert!(grid.occupied(row, 8));
        }
    }

    #[test]
    fn test_extend_reaches_requested_length_and_only_grows() {
        let mut grid = TerrainGrid::new(7, 10, 7);
        grid.extend(0, 60, 30, 0.6);
        let len = grid.len();
        assert!(len >= 60);

        // A satisfied request appends nothing.
        grid.extend(0, 60, 30, 0.6);
        assert_eq!(grid.len(), len);

        grid.extend(100, 60, 30, 0.6);
        assert!(grid.len() >= 160);
    }

    #[test]
    fn test_obstacle_rows_on_spacing_multiples_open_rows_elsewhere() {
        // Run-in of 29 open rows puts the grid length at 30, so extension
        // starts exactly at row 30.
        let mut grid = TerrainGrid::new(7, 29, 99);
        grid.extend(29, 31, 30, 0.6);
        assert!(grid.len() >= 60);

        // Row 30 is an obstacle row and must keep at least one lane open.
        let open_lanes = (1..=7).filter(|&col| !grid.occupied(30, col)).count();
        assert!(open_lanes >= 1);

        // Rows 31..60 are not multiples of 30 and are fully open inside.
        for row in 31..60 {
            for col in 1..=7 {
                assert!(!grid.occupied(row, col), "row {row} col {col} blocked");
            }
        }
    }

    #[test]
    fn test_certain_walls_still_leave_a_gap() {
        // probability 1.0 defeats rejection sampling every time; the forced
        // gap has to keep the row passable.
        let mut grid = TerrainGrid::new(7, 0, 3);
        grid.extend(0, 91, 30, 1.0);

        for row in (30..=90).step_by(30) {
            let open_lanes = (1..=7).filter(|&col| !grid.occupied(row, col)).count();
            assert_eq!(open_lanes, 1);
        }
    }

    #[test]
    #[should_panic(expected = "queried before generation")]
    fn test_occupied_panics_on_ungenerated_row() {
        let grid = TerrainGrid::new(7, 5, 0);
        grid.occupied(1000, 3);
    }

    #[test]
    #[should_panic(expected = "outside track")]
    fn test_occupied_panics_on_out_of_track_column() {
        let grid = TerrainGrid::new(7, 5, 0);
        grid.occupied(0, 9);
    }

    proptest! {
        #[test]
        fn prop_every_generated_row_is_passable(
            seed in any::<u64>(),
            probability in 0.0f64..=1.0,
        ) {
            let mut grid = TerrainGrid::new(5, 0, seed);
            grid.extend(0, 50, 10, probability);

            // Row 0 is the start boundary; every row after it must have an
            // open lane.
            for row in 1..grid.len() {
                let open = (1..=5).any(|col| !grid.occupied(row, col));
                prop_assert!(open, "row {} fully blocked", row);
            }
        }
    }
}
