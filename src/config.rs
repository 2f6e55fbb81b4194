use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::board;

pub(crate) const MIN_STEP_MS: u64 = 50;
pub(crate) const MAX_STEP_MS: u64 = 2000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub(crate) cell_size: u32,
    pub(crate) step_ms: u64,
    pub(crate) fill_density: f32,
    pub(crate) enable_color: bool,
    pub(crate) seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: 40,
            step_ms: 500,
            fill_density: 0.3,
            // seed 0 means "draw one from the OS".
            enable_color: true,
            seed: 0,
        }
    }
}

impl Settings {
    /// Pulls flag-supplied or hand-edited values back into range: the cell
    /// size snaps to the nearest legal size, the rest clamp.
    pub(crate) fn sanitize(&mut self) {
        self.cell_size = board::nearest_cell_size(self.cell_size);
        self.step_ms = self.step_ms.clamp(MIN_STEP_MS, MAX_STEP_MS);
        if !self.fill_density.is_finite() {
            self.fill_density = Settings::default().fill_density;
        }
        self.fill_density = self.fill_density.clamp(0.0, 1.0);
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "lifeboard", "Lifeboard")
        .context("could not resolve project directories")?;
    let dir = proj.config_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
    })
}

/// A missing or unreadable file falls back to defaults; a readable one is
/// still sanitized, since nothing stops hand edits.
pub(crate) fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();
    if let Ok(text) = fs::read_to_string(path) {
        if let Ok(parsed) = serde_json::from_str::<Settings>(&text) {
            settings = parsed;
        }
    }
    settings.sanitize();
    settings
}

pub(crate) fn save_settings_atomic(path: &Path, settings: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(settings)?;
    fs::write(&tmp, data).with_context(|| format!("could not write {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // Replace-by-rename; the remove keeps Windows happy when the target
    // already exists.
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}
