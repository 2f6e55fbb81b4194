use crate::board::{self, Board};
use crate::config::Settings;
use crate::sim::Sim;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Terminal columns per board cell. Two columns make a cell roughly
/// square in most fonts.
pub(crate) const CELL_COLS: u16 = 2;
/// Rows reserved at the bottom for status and key help.
pub(crate) const HUD_ROWS: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct GlyphBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Glyph>,
}

impl GlyphBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Glyph::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, g: Glyph) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = g;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for g in &mut self.cells {
            g.ch = ' ';
            g.fg = Color::White;
            g.bg = bg;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: GlyphBuffer,
    pub(crate) cur: GlyphBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        let prev = GlyphBuffer::new(cols, rows);
        let cur = GlyphBuffer::new(cols, rows);

        Ok(Self {
            out,
            cols,
            rows,
            prev,
            cur,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = GlyphBuffer::new(c, r);
        self.cur = GlyphBuffer::new(c, r);
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let g = self.cur.cells[i];
                if diff_only && g == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(g.fg) {
                    queue!(self.out, SetForegroundColor(g.fg))?;
                    last_fg = Some(g.fg);
                }
                if last_bg != Some(g.bg) {
                    queue!(self.out, SetBackgroundColor(g.bg))?;
                    last_bg = Some(g.bg);
                }

                queue!(self.out, Print(g.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Board placement and hit-testing
------------------------------ */

#[derive(Clone, Copy, Debug)]
pub(crate) struct BoardLayout {
    pub(crate) origin_x: u16,
    pub(crate) origin_y: u16,
    pub(crate) dim: usize,
}

pub(crate) fn layout_for(cols: u16, rows: u16, dim: usize) -> BoardLayout {
    let need_w = dim as u16 * CELL_COLS;
    let need_h = dim as u16;
    let free_rows = rows.saturating_sub(HUD_ROWS);
    BoardLayout {
        origin_x: cols.saturating_sub(need_w) / 2,
        origin_y: free_rows.saturating_sub(need_h) / 2,
        dim,
    }
}

impl BoardLayout {
    /// Maps a terminal position to the board cell under it, if any.
    pub(crate) fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let col = ((x - self.origin_x) / CELL_COLS) as usize;
        let row = (y - self.origin_y) as usize;
        if row < self.dim && col < self.dim {
            Some((row, col))
        } else {
            None
        }
    }
}

/* -----------------------------
   Drawing
------------------------------ */

pub(crate) struct Palette {
    pub(crate) alive: Color,
    pub(crate) lattice: Color,
    pub(crate) border: Color,
    pub(crate) text: Color,
    pub(crate) go: Color,
    pub(crate) stop: Color,
}

impl Palette {
    pub(crate) fn new(enable_color: bool) -> Self {
        if enable_color {
            Self {
                alive: Color::Rgb {
                    r: 120,
                    g: 230,
                    b: 140,
                },
                lattice: Color::DarkGrey,
                border: Color::DarkGrey,
                text: Color::White,
                go: Color::Green,
                stop: Color::Red,
            }
        } else {
            Self {
                alive: Color::White,
                lattice: Color::White,
                border: Color::White,
                text: Color::White,
                go: Color::White,
                stop: Color::White,
            }
        }
    }
}

pub(crate) fn draw_board(buf: &mut GlyphBuffer, board: &Board, lay: &BoardLayout, pal: &Palette) {
    draw_border(buf, lay, pal.border);
    let bg = Color::Black;
    for row in 0..board.dim() {
        let y = lay.origin_y + row as u16;
        for col in 0..board.dim() {
            let x = lay.origin_x + col as u16 * CELL_COLS;
            if board.get(row, col).is_alive() {
                for dx in 0..CELL_COLS {
                    buf.set(
                        x + dx,
                        y,
                        Glyph {
                            ch: '█',
                            fg: pal.alive,
                            bg,
                        },
                    );
                }
            } else {
                // A faint dot marks each empty cell so the lattice stays
                // visible for the mouse.
                buf.set(
                    x,
                    y,
                    Glyph {
                        ch: '·',
                        fg: pal.lattice,
                        bg,
                    },
                );
            }
        }
    }
}

fn draw_border(buf: &mut GlyphBuffer, lay: &BoardLayout, fg: Color) {
    let (Some(left), Some(top)) = (lay.origin_x.checked_sub(1), lay.origin_y.checked_sub(1))
    else {
        // Cropped terminal; the board itself still draws.
        return;
    };
    let right = lay.origin_x + lay.dim as u16 * CELL_COLS;
    let bottom = lay.origin_y + lay.dim as u16;
    let bg = Color::Black;

    for x in left..=right {
        buf.set(x, top, Glyph { ch: '─', fg, bg });
        buf.set(x, bottom, Glyph { ch: '─', fg, bg });
    }
    for y in top..=bottom {
        buf.set(left, y, Glyph { ch: '│', fg, bg });
        buf.set(right, y, Glyph { ch: '│', fg, bg });
    }
    buf.set(left, top, Glyph { ch: '┌', fg, bg });
    buf.set(right, top, Glyph { ch: '┐', fg, bg });
    buf.set(left, bottom, Glyph { ch: '└', fg, bg });
    buf.set(right, bottom, Glyph { ch: '┘', fg, bg });
}

/* -----------------------------
   HUD (status + key help)
------------------------------ */

pub(crate) fn draw_text(buf: &mut GlyphBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Glyph { ch, fg, bg });
    }
}

/// One mark per legal cell size, the current one filled in.
fn slider(cell_size: u32) -> String {
    let mut s = String::from("[");
    for &size in &board::CELL_SIZES {
        s.push(if size == cell_size { '■' } else { '·' });
    }
    s.push(']');
    s
}

pub(crate) fn draw_hud(buf: &mut GlyphBuffer, sim: &Sim, settings: &Settings, pal: &Palette) {
    let bg = Color::Black;
    let y_status = buf.h.saturating_sub(2);
    let y_help = buf.h.saturating_sub(1);

    // The label names the action space would take, like a toggle button.
    let (label, label_fg) = if sim.is_running() {
        ("[Stop!]", pal.stop)
    } else {
        ("[ Go! ]", pal.go)
    };
    draw_text(buf, 1, y_status, label, label_fg, bg);

    let dim = sim.board().dim();
    let status = format!(
        "gen {:>5}  pop {:>4}  {dim}x{dim}  cells {} {}px  step {}ms",
        sim.generation(),
        sim.board().population(),
        slider(sim.board().cell_size()),
        sim.board().cell_size(),
        settings.step_ms,
    );
    draw_text(buf, 1 + label.len() as u16 + 2, y_status, &status, pal.text, bg);

    let help =
        "space go/stop | s step | click/drag edit | [ ] cell size | -/= speed | r random | c clear | q quit";
    draw_text(buf, 1, y_help, help, pal.text, bg);
}
