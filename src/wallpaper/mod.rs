//! # Wallpaper Backends
//!
//! Applying a wallpaper is the only OS-coupled step of a run. The pipeline
//! talks to a [`WallpaperSetter`] and never to a particular desktop.
//!
//! ## Backends
//! - `macos.rs` - AppleScript via `osascript`, every desktop
//! - `cosmic.rs` - COSMIC background config + `cosmic-bg` restart
//! - `gnome.rs` - `gsettings` background keys
//! - `kde.rs` - PlasmaShell script via `qdbus`, every desktop
//!
//! Every backend runs external programs through [`run_host_command`] and
//! judges success by exit status.

use std::path::Path;
use std::process::Output;
use std::sync::Arc;

use crate::config::Desktop;
use crate::error::{Error, Result};

mod cosmic;
mod gnome;
mod kde;
mod macos;

pub use cosmic::CosmicSetter;
pub use gnome::GnomeSetter;
pub use kde::KdeSetter;
pub use macos::MacOsSetter;

/// Something that can make an image file the desktop background.
pub trait WallpaperSetter: Send + Sync {
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;

    /// Applies `image` (an absolute path) to every desktop/display the backend controls.
    fn apply(&self, image: &Path) -> Result<()>;
}

/// Resolves the configured desktop to a backend.
///
/// `Desktop::Auto` picks macOS on Apple targets, otherwise inspects
/// `XDG_CURRENT_DESKTOP`.
pub fn setter_for(desktop: Desktop) -> Result<Arc<dyn WallpaperSetter>> {
    let resolved = match desktop {
        Desktop::Auto => detect_desktop(
            cfg!(target_os = "macos"),
            std::env::var("XDG_CURRENT_DESKTOP").ok().as_deref(),
        ),
        explicit => Some(explicit),
    };

    resolved.and_then(backend_for).ok_or_else(|| {
        Error::Unsupported("unrecognised desktop; set \"desktop\" in the config file".to_string())
    })
}

/// The backend for a concrete desktop; `Auto` has none of its own.
fn backend_for(desktop: Desktop) -> Option<Arc<dyn WallpaperSetter>> {
    let setter: Arc<dyn WallpaperSetter> = match desktop {
        Desktop::Auto => return None,
        Desktop::Macos => Arc::new(MacOsSetter),
        Desktop::Cosmic => Arc::new(CosmicSetter),
        Desktop::Gnome => Arc::new(GnomeSetter),
        Desktop::Kde => Arc::new(KdeSetter),
    };
    Some(setter)
}

/// Maps the platform and `XDG_CURRENT_DESKTOP` to a concrete desktop.
///
/// `XDG_CURRENT_DESKTOP` is a colon-separated list such as `ubuntu:GNOME`.
fn detect_desktop(is_macos: bool, current_desktop: Option<&str>) -> Option<Desktop> {
    if is_macos {
        return Some(Desktop::Macos);
    }

    current_desktop?
        .split(':')
        .find_map(|name| match name.trim().to_ascii_lowercase().as_str() {
            "cosmic" => Some(Desktop::Cosmic),
            "gnome" | "unity" | "budgie" => Some(Desktop::Gnome),
            "kde" | "plasma" => Some(Desktop::Kde),
            _ => None,
        })
}

/// Checks if the application is running inside a Flatpak sandbox.
fn is_flatpak() -> bool {
    Path::new("/.flatpak-info").exists()
}

/// Runs a command on the host, capturing stdout and stderr.
///
/// Inside Flatpak the command is prefixed with `flatpak-spawn --host` so it
/// reaches the real desktop session instead of the sandbox.
pub(crate) fn run_host_command(program: &str, args: &[&str]) -> Result<Output> {
    let output = if is_flatpak() {
        std::process::Command::new("flatpak-spawn")
            .arg("--host")
            .arg(program)
            .args(args)
            .output()
    } else {
        std::process::Command::new(program).args(args).output()
    };

    output.map_err(|source| Error::Spawn { program: program.to_string(), source })
}

/// Turns captured output into success or [`Error::Process`], logging both streams.
pub(crate) fn check_output(program: &str, output: Output) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !stdout.trim().is_empty() {
        tracing::debug!("{program} stdout: {}", stdout.trim());
    }

    if output.status.success() {
        if !stderr.trim().is_empty() {
            tracing::warn!("{program} stderr: {}", stderr.trim());
        }
        Ok(())
    } else {
        Err(Error::Process {
            program: program.to_string(),
            status: output.status,
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Runs a host command and requires a zero exit status.
pub(crate) fn run_checked(program: &str, args: &[&str]) -> Result<()> {
    let output = run_host_command(program, args)?;
    check_output(program, output)
}

/// Returns the path as UTF-8, which every backend's script or config needs.
pub(crate) fn utf8_path(image: &Path) -> Result<&str> {
    image
        .to_str()
        .ok_or_else(|| Error::Unsupported(format!("path is not valid UTF-8: {}", image.display())))
}

/// Percent-encoded `file://` URI for an absolute path.
pub(crate) fn file_uri(image: &Path) -> Result<String> {
    url::Url::from_file_path(image)
        .map(String::from)
        .map_err(|()| Error::Unsupported(format!("not an absolute path: {}", image.display())))
}
