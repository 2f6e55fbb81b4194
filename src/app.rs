use crate::board::{self, Cell};
use crate::config::{self, load_settings, project_paths, save_settings_atomic, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_key_to_action, Action, InputEvent};
use crate::render::{draw_board, draw_hud, layout_for, Palette, Terminal};
use crate::sim::Sim;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// How much one speed keypress moves the generation interval.
const STEP_MS_INCREMENT: u64 = 50;

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    sim: Sim,
    term: Terminal,
    rng: StdRng,
    /// Value painted for the rest of the current drag, captured from the
    /// cell the gesture started on.
    drag_paint: Option<Cell>,
    /// When the next timed generation fires. Stays armed across a stop so
    /// one stale fire can arrive and be refused.
    next_step_at: Option<Instant>,
    should_quit: bool,
}

impl App {
    fn init(cli: &crate::Cli) -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let mut settings = load_settings(&paths.settings_path);
        cli.apply_to(&mut settings);
        settings.sanitize();

        let rng = if settings.seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(settings.seed)
        };

        let sim = Sim::new(settings.cell_size);
        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            paths,
            sim,
            term,
            rng,
            drag_paint: None,
            next_step_at: None,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_millis(33);

        while !self.should_quit {
            let _resized = self.term.resize_if_needed()?;

            // input
            let events = collect_input_nonblocking(frame_dt)?;
            for ev in events {
                match ev {
                    InputEvent::Key(code, mods) => {
                        if let Some(action) = map_key_to_action(code, mods) {
                            self.apply(action);
                            if self.should_quit {
                                break;
                            }
                        }
                    }
                    InputEvent::Mouse(m) => self.handle_mouse(m),
                }
            }

            self.fire_timer_if_due();

            // render
            self.render_frame()?;

            // frame cap
            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleRun => {
                if self.sim.toggle_running() {
                    // A fresh start runs its first generation right away.
                    self.next_step_at = Some(Instant::now());
                }
                // Stopping leaves the deadline armed; the one fire that
                // slips through is refused by advance().
            }
            Action::StepOnce => self.sim.step(),
            Action::ShrinkCells => {
                self.resize_board(board::size_below(self.sim.board().cell_size()));
            }
            Action::GrowCells => {
                self.resize_board(board::size_above(self.sim.board().cell_size()));
            }
            Action::SlowDown => {
                self.settings.step_ms =
                    (self.settings.step_ms + STEP_MS_INCREMENT).min(config::MAX_STEP_MS);
            }
            Action::SpeedUp => {
                self.settings.step_ms = self
                    .settings
                    .step_ms
                    .saturating_sub(STEP_MS_INCREMENT)
                    .max(config::MIN_STEP_MS);
            }
            Action::Randomize => {
                let density = self.settings.fill_density;
                self.sim.randomize(&mut self.rng, density);
            }
            Action::Clear => self.sim.clear(),
            Action::Quit => self.should_quit = true,
        }
    }

    fn resize_board(&mut self, cell_size: u32) {
        self.sim.resize(cell_size);
        self.settings.cell_size = self.sim.board().cell_size();
        // Any in-flight drag was aimed at the old lattice.
        self.drag_paint = None;
    }

    fn handle_mouse(&mut self, ev: MouseEvent) {
        let lay = layout_for(self.term.cols, self.term.rows, self.sim.board().dim());
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, col)) = lay.cell_at(ev.column, ev.row) {
                    // The flipped value becomes the paint for the whole drag.
                    self.drag_paint = Some(self.sim.toggle_cell(row, col));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let (Some(cell), Some((row, col))) =
                    (self.drag_paint, lay.cell_at(ev.column, ev.row))
                {
                    self.sim.paint_cell(row, col, cell);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_paint = None,
            _ => {}
        }
    }

    /// Runs a timed generation when its deadline has passed. Re-arming only
    /// happens while the sim keeps running; a deadline that outlived a stop
    /// is dropped here after its one refused fire.
    fn fire_timer_if_due(&mut self) {
        let Some(due) = self.next_step_at else { return };
        if Instant::now() < due {
            return;
        }
        if self.sim.advance() {
            self.next_step_at = Some(Instant::now() + Duration::from_millis(self.settings.step_ms));
        } else {
            self.next_step_at = None;
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let bg = crossterm::style::Color::Black;
        self.term.cur.clear(bg);

        let pal = Palette::new(self.settings.enable_color);
        let lay = layout_for(self.term.cols, self.term.rows, self.sim.board().dim());
        draw_board(&mut self.term.cur, self.sim.board(), &lay, &pal);
        draw_hud(&mut self.term.cur, &self.sim, &self.settings, &pal);

        self.term.present(true)?;
        Ok(())
    }
}

pub(crate) fn run(cli: &crate::Cli) -> anyhow::Result<()> {
    let mut app = App::init(cli)?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
