use rand::rngs::StdRng;

use crate::board::{Board, Cell};

/// Owns the board and drives it through generations.
///
/// The run flag only gates the timer path (`advance`). Manual stepping,
/// edits and resizes work the same whether running or stopped.
pub(crate) struct Sim {
    board: Board,
    running: bool,
    generation: u64,
}

impl Sim {
    pub(crate) fn new(cell_size: u32) -> Self {
        Self {
            board: Board::new(cell_size),
            running: false,
            generation: 0,
        }
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Flips run/stop and reports the new state, so the caller knows
    /// whether to arm the generation timer.
    pub(crate) fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Computes and commits one generation.
    ///
    /// Every neighbor count reads the board as it stood when the step
    /// began; nothing becomes visible until the commit at the end.
    pub(crate) fn step(&mut self) {
        let dim = self.board.dim();
        // The next generation starts as a copy; the rule rewrites only
        // births and deaths.
        let mut next = self.board.cells().to_vec();
        for row in 0..dim {
            for col in 0..dim {
                let n = self.board.live_neighbors(row, col);
                match self.board.get(row, col) {
                    Cell::Dead if n == 3 => next[row * dim + col] = Cell::Alive,
                    Cell::Alive if !(2..=3).contains(&n) => {
                        next[row * dim + col] = Cell::Dead
                    }
                    _ => {}
                }
            }
        }
        self.board.commit(next);
        self.generation += 1;
    }

    /// Timer entry point. A tick that lands after a stop leaves the board
    /// untouched and returns false so the caller does not re-arm.
    pub(crate) fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.step();
        self.running
    }

    /// Rebuilds the board at a new cell size; every cell resets to dead.
    /// A request for the current size is a no-op, and the run state is
    /// never touched either way.
    pub(crate) fn resize(&mut self, cell_size: u32) {
        if cell_size == self.board.cell_size() {
            return;
        }
        self.board = Board::new(cell_size);
        self.generation = 0;
    }

    /// Click edit: flips the cell and returns its new value. The caller
    /// holds on to that value as the paint color for a drag started here.
    pub(crate) fn toggle_cell(&mut self, row: usize, col: usize) -> Cell {
        let cell = self.board.get(row, col).toggled();
        self.board.set(row, col, cell);
        cell
    }

    /// Drag edit: writes the value captured at the start of the gesture.
    pub(crate) fn paint_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.board.set(row, col, cell);
    }

    pub(crate) fn clear(&mut self) {
        self.board.clear();
        self.generation = 0;
    }

    pub(crate) fn randomize(&mut self, rng: &mut StdRng, density: f32) {
        self.board.randomize(rng, density);
        self.generation = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_alive(sim: &mut Sim, cells: &[(usize, usize)]) {
        for &(row, col) in cells {
            sim.paint_cell(row, col, Cell::Alive);
        }
    }

    fn assert_exactly_alive(sim: &Sim, cells: &[(usize, usize)]) {
        assert_eq!(sim.board().population(), cells.len());
        for &(row, col) in cells {
            assert!(
                sim.board().get(row, col).is_alive(),
                "expected ({row}, {col}) alive"
            );
        }
    }

    #[test]
    fn dead_board_stays_dead() {
        let mut sim = Sim::new(30);
        for _ in 0..5 {
            sim.step();
        }
        assert_eq!(sim.board().population(), 0);
        assert_eq!(sim.generation(), 5);
    }

    #[test]
    fn lone_cell_dies_of_isolation() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(10, 10)]);
        sim.step();
        assert_eq!(sim.board().population(), 0);
    }

    #[test]
    fn block_is_a_still_life() {
        let mut sim = Sim::new(30);
        let block = [(3, 3), (3, 4), (4, 3), (4, 4)];
        set_alive(&mut sim, &block);
        sim.step();
        assert_exactly_alive(&sim, &block);
        sim.step();
        assert_exactly_alive(&sim, &block);
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let mut sim = Sim::new(30);
        let horizontal = [(5, 4), (5, 5), (5, 6)];
        let vertical = [(4, 5), (5, 5), (6, 5)];
        set_alive(&mut sim, &horizontal);

        sim.step();
        assert_exactly_alive(&sim, &vertical);

        sim.step();
        assert_exactly_alive(&sim, &horizontal);
    }

    #[test]
    fn glider_translates_one_cell_per_period() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)]);
        for _ in 0..4 {
            sim.step();
        }
        // One full period moves the glider one cell down-right.
        assert_exactly_alive(&sim, &[(2, 3), (3, 4), (4, 2), (4, 3), (4, 4)]);
    }

    #[test]
    fn step_runs_whether_or_not_the_sim_is_running() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(5, 4), (5, 5), (5, 6)]);
        assert!(!sim.is_running());

        sim.step();
        assert_eq!(sim.generation(), 1);
        assert_exactly_alive(&sim, &[(4, 5), (5, 5), (6, 5)]);
    }

    #[test]
    fn advance_is_a_no_op_while_stopped() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(5, 4), (5, 5), (5, 6)]);

        assert!(!sim.advance());
        assert_eq!(sim.generation(), 0);
        assert_exactly_alive(&sim, &[(5, 4), (5, 5), (5, 6)]);
    }

    #[test]
    fn advance_steps_and_rearms_while_running() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(5, 4), (5, 5), (5, 6)]);
        sim.toggle_running();

        assert!(sim.advance());
        assert_eq!(sim.generation(), 1);

        // A tick armed before the stop still fires once; it must neither
        // step nor ask to be re-armed.
        sim.toggle_running();
        assert!(!sim.advance());
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn double_toggle_restores_state_and_touches_nothing() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(8, 8), (8, 9)]);
        let before = sim.board().cells().to_vec();

        assert!(sim.toggle_running());
        assert!(!sim.toggle_running());
        assert!(!sim.is_running());
        assert_eq!(sim.board().cells(), &before[..]);
        assert_eq!(sim.generation(), 0);
    }

    #[test]
    fn resize_resets_the_board_and_keeps_the_run_state() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(1, 1), (2, 2), (3, 3)]);
        sim.toggle_running();
        sim.step();

        sim.resize(20);
        assert_eq!(sim.board().dim(), 45);
        assert_eq!(sim.board().population(), 0);
        assert_eq!(sim.generation(), 0);
        assert!(sim.is_running());

        // The next advance works against the rebuilt board.
        assert!(sim.advance());
        assert_eq!(sim.board().population(), 0);
    }

    #[test]
    fn resize_to_the_same_size_changes_nothing() {
        let mut sim = Sim::new(30);
        set_alive(&mut sim, &[(6, 6)]);
        sim.step();

        sim.resize(30);
        assert_eq!(sim.board().dim(), 30);
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn toggle_cell_returns_the_painted_value() {
        let mut sim = Sim::new(30);
        assert_eq!(sim.toggle_cell(2, 2), Cell::Alive);
        assert!(sim.board().get(2, 2).is_alive());
        assert_eq!(sim.toggle_cell(2, 2), Cell::Dead);
        assert!(!sim.board().get(2, 2).is_alive());
    }

    #[test]
    fn bulk_resets_zero_the_generation_counter() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);

        let mut sim = Sim::new(30);
        sim.step();
        sim.randomize(&mut rng, 0.4);
        assert_eq!(sim.generation(), 0);
        assert!(sim.board().population() > 0);

        sim.step();
        sim.clear();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.board().population(), 0);
    }
}
