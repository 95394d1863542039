//! COSMIC desktop backend.
//!
//! COSMIC reads its background configuration from RON files under
//! `~/.config/cosmic/com.system76.CosmicBackground/v1/`. There is no reload
//! call, so after writing the config `cosmic-bg` is restarted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{is_flatpak, run_host_command, utf8_path, WallpaperSetter};
use crate::error::{Error, Result};

pub struct CosmicSetter;

impl WallpaperSetter for CosmicSetter {
    fn name(&self) -> &'static str {
        "cosmic"
    }

    /// Writes the `all` output entry, forces it onto every display, and
    /// restarts `cosmic-bg` so it picks up the new source.
    fn apply(&self, image: &Path) -> Result<()> {
        // home_dir() rather than config_dir(): inside Flatpak config_dir() is
        // the sandboxed path, but COSMIC reads the host's ~/.config
        let base = dirs::home_dir()
            .ok_or_else(|| Error::Unsupported("could not find home directory".to_string()))?
            .join(".config/cosmic/com.system76.CosmicBackground/v1");

        write_config(&base, utf8_path(image)?)?;
        restart_cosmic_bg()
    }
}

fn background_entry(image: &str) -> String {
    format!(
        r#"(
    output: "all",
    source: Path("{}"),
    filter_by_theme: false,
    rotation_frequency: 300,
    filter_method: Lanczos,
    scaling_mode: Zoom,
    sampling_method: Alphanumeric,
)"#,
        image.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

fn write_config(base: &Path, image: &str) -> Result<()> {
    std::fs::create_dir_all(base).map_err(Error::io("create", base))?;

    let same_on_all: PathBuf = base.join("same-on-all");
    std::fs::write(&same_on_all, "true").map_err(Error::io("write", &same_on_all))?;

    let all = base.join("all");
    std::fs::write(&all, background_entry(image)).map_err(Error::io("write", &all))
}

fn restart_cosmic_bg() -> Result<()> {
    // SIGTERM; the session normally respawns cosmic-bg by itself
    let _ = run_host_command("pkill", &["-TERM", "-x", "cosmic-bg"]);
    std::thread::sleep(Duration::from_millis(1000));

    match run_host_command("pgrep", &["-x", "cosmic-bg"]) {
        Ok(output) if output.status.success() => Ok(()),
        _ => {
            tracing::debug!("cosmic-bg did not respawn, starting it");
            spawn_cosmic_bg()
        }
    }
}

fn spawn_cosmic_bg() -> Result<()> {
    let child = if is_flatpak() {
        std::process::Command::new("flatpak-spawn")
            .args(["--host", "cosmic-bg"])
            .spawn()
    } else {
        std::process::Command::new("cosmic-bg").spawn()
    };

    child
        .map(|_| std::thread::sleep(Duration::from_millis(500)))
        .map_err(|source| Error::Spawn { program: "cosmic-bg".to_string(), source })
}
