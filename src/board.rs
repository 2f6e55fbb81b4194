use rand::{rngs::StdRng, Rng};

/// Side length of the square board canvas, in board units.
pub(crate) const BOARD_EXTENT: u32 = 900;

/// Cell side lengths the size control steps through, finest first. Integer
/// division keeps whole cells only: at 40 the canvas holds 22 of them and
/// the remainder is margin, not a partial cell.
pub(crate) const CELL_SIZES: [u32; 3] = [20, 30, 40];

/// The next finer allowed cell size, clamped at the low end.
pub(crate) fn size_below(size: u32) -> u32 {
    match CELL_SIZES.iter().position(|&s| s == size) {
        Some(i) if i > 0 => CELL_SIZES[i - 1],
        _ => size,
    }
}

/// The next coarser allowed cell size, clamped at the high end.
pub(crate) fn size_above(size: u32) -> u32 {
    match CELL_SIZES.iter().position(|&s| s == size) {
        Some(i) if i + 1 < CELL_SIZES.len() => CELL_SIZES[i + 1],
        _ => size,
    }
}

/// The allowed cell size closest to `wanted` (ties go to the finer one).
pub(crate) fn nearest_cell_size(wanted: u32) -> u32 {
    *CELL_SIZES
        .iter()
        .min_by_key(|&&s| s.abs_diff(wanted))
        .unwrap_or(&CELL_SIZES[0])
}

/// One automaton cell. Dead or alive, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cell {
    Dead,
    Alive,
}

impl Cell {
    pub(crate) fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    pub(crate) fn toggled(self) -> Cell {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }
}

/// The full board: a `dim` x `dim` arena of cells, row-major.
///
/// `dim` is tied to the chosen cell size (`BOARD_EXTENT / cell_size`), so a
/// size change always goes through a full rebuild; there is no partial
/// reshape.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    cell_size: u32,
    dim: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a fresh all-dead board for the given cell size.
    pub(crate) fn new(cell_size: u32) -> Self {
        let dim = (BOARD_EXTENT / cell_size) as usize;
        Self {
            cell_size,
            dim,
            cells: vec![Cell::Dead; dim * dim],
        }
    }

    pub(crate) fn dim(&self) -> usize {
        self.dim
    }

    pub(crate) fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.dim + col
    }

    // With row-major storage a bad `col` can still land inside the
    // allocation, so bounds must be checked per axis, not per index.
    fn check_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.dim && col < self.dim,
            "cell ({row}, {col}) out of bounds on a {}x{} board",
            self.dim,
            self.dim
        );
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> Cell {
        self.check_bounds(row, col);
        self.cells[self.idx(row, col)]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.check_bounds(row, col);
        let i = self.idx(row, col);
        self.cells[i] = cell;
    }

    /// Row-major view of the current generation.
    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Replaces the whole arena with a prepared next generation.
    pub(crate) fn commit(&mut self, cells: Vec<Cell>) {
        assert_eq!(
            cells.len(),
            self.dim * self.dim,
            "generation size mismatch"
        );
        self.cells = cells;
    }

    /// Live cells in the Moore neighborhood of `(row, col)`. Positions past
    /// an edge are skipped, not wrapped, so corners see at most 3 neighbors
    /// and edges at most 5.
    pub(crate) fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        self.check_bounds(row, col);
        let mut count = 0;
        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = row as i32 + dr;
                let c = col as i32 + dc;
                if r < 0 || c < 0 || r >= self.dim as i32 || c >= self.dim as i32 {
                    continue;
                }
                if self.cells[self.idx(r as usize, c as usize)].is_alive() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Number of live cells on the board.
    pub(crate) fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::Dead);
    }

    /// Refills every cell independently, alive with probability `density`.
    pub(crate) fn randomize(&mut self, rng: &mut StdRng, density: f32) {
        let p = f64::from(density.clamp(0.0, 1.0));
        for cell in &mut self.cells {
            *cell = if rng.gen_bool(p) {
                Cell::Alive
            } else {
                Cell::Dead
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn new_board_is_all_dead_at_every_size() {
        for (&size, &dim) in CELL_SIZES.iter().zip([45usize, 30, 22].iter()) {
            let board = Board::new(size);
            assert_eq!(board.dim(), dim);
            assert_eq!(board.cell_size(), size);
            assert_eq!(board.population(), 0);
            assert_eq!(board.cells().len(), dim * dim);
        }
    }

    #[test]
    fn get_set_roundtrip() {
        let mut board = Board::new(30);
        assert_eq!(board.get(7, 9), Cell::Dead);
        board.set(7, 9, Cell::Alive);
        assert_eq!(board.get(7, 9), Cell::Alive);
        board.set(7, 9, Cell::Dead);
        assert_eq!(board.get(7, 9), Cell::Dead);
    }

    #[test]
    fn full_ring_counts_eight() {
        let mut board = Board::new(30);
        for r in 4..=6 {
            for c in 4..=6 {
                board.set(r, c, Cell::Alive);
            }
        }
        // Center excluded from its own count.
        assert_eq!(board.live_neighbors(5, 5), 8);
    }

    #[test]
    fn neighbor_count_skips_positions_past_the_edge() {
        let mut board = Board::new(30);
        let dim = board.dim();
        for r in 0..dim {
            for c in 0..dim {
                board.set(r, c, Cell::Alive);
            }
        }
        // Corners reach 3 in-bounds neighbors, edges 5, interior 8.
        assert_eq!(board.live_neighbors(0, 0), 3);
        assert_eq!(board.live_neighbors(0, dim - 1), 3);
        assert_eq!(board.live_neighbors(dim - 1, 0), 3);
        assert_eq!(board.live_neighbors(dim - 1, dim - 1), 3);
        assert_eq!(board.live_neighbors(0, 5), 5);
        assert_eq!(board.live_neighbors(5, 0), 5);
        assert_eq!(board.live_neighbors(5, 5), 8);
    }

    #[test]
    fn dead_ring_counts_zero() {
        let mut board = Board::new(30);
        board.set(5, 5, Cell::Alive);
        assert_eq!(board.live_neighbors(5, 5), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn read_past_the_edge_panics() {
        let board = Board::new(30);
        board.get(0, 30);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn write_past_the_edge_panics() {
        let mut board = Board::new(30);
        board.set(30, 0, Cell::Alive);
    }

    #[test]
    fn randomize_tracks_density() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(20);
        let n = board.dim() * board.dim();

        board.randomize(&mut rng, 0.0);
        assert_eq!(board.population(), 0);

        board.randomize(&mut rng, 1.0);
        assert_eq!(board.population(), n);

        board.randomize(&mut rng, 0.3);
        let pop = board.population();
        assert!(pop > n / 6 && pop < n / 2, "unlikely population {pop}");
    }

    #[test]
    fn clear_kills_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(40);
        board.randomize(&mut rng, 0.5);
        assert!(board.population() > 0);
        board.clear();
        assert_eq!(board.population(), 0);
    }

    #[test]
    fn size_stepping_clamps_at_the_ends() {
        assert_eq!(size_below(20), 20);
        assert_eq!(size_below(30), 20);
        assert_eq!(size_below(40), 30);
        assert_eq!(size_above(20), 30);
        assert_eq!(size_above(30), 40);
        assert_eq!(size_above(40), 40);
    }

    #[test]
    fn nearest_cell_size_snaps() {
        assert_eq!(nearest_cell_size(0), 20);
        assert_eq!(nearest_cell_size(20), 20);
        assert_eq!(nearest_cell_size(24), 20);
        assert_eq!(nearest_cell_size(29), 30);
        assert_eq!(nearest_cell_size(35), 30);
        assert_eq!(nearest_cell_size(99), 40);
    }
}
