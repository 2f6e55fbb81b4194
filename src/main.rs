mod app;
mod board;
mod config;
mod input;
mod render;
mod sim;

use anyhow::Result;
use clap::Parser;

use crate::config::Settings;

#[derive(Parser, Debug, Clone)]
#[command(name = "lifeboard")]
#[command(about = "Conway's Game of Life on a clickable terminal board")]
pub(crate) struct Cli {
    /// Cell edge in board units (20, 30 or 40; anything else snaps to the nearest)
    #[arg(long)]
    cell_size: Option<u32>,

    /// Milliseconds between timed generations
    #[arg(long)]
    step_ms: Option<u64>,

    /// Fill density used by the `r` key, 0.0 to 1.0
    #[arg(long, allow_negative_numbers = true)]
    density: Option<f32>,

    /// RNG seed for random fills (0 = draw one from the OS)
    #[arg(long)]
    seed: Option<u64>,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    mono: bool,
}

impl Cli {
    /// Flags beat the settings file; absent flags leave it alone.
    pub(crate) fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = self.cell_size {
            settings.cell_size = v;
        }
        if let Some(v) = self.step_ms {
            settings.step_ms = v;
        }
        if let Some(v) = self.density {
            settings.fill_density = v;
        }
        if let Some(v) = self.seed {
            settings.seed = v;
        }
        if self.mono {
            settings.enable_color = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    app::run(&cli)
}
