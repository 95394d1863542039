//! # Update Pipeline
//!
//! One run is a fixed chain of four steps, each gated on the one before:
//!
//! ```text
//! Locate ──found──▶ Download ──ok──▶ SetWallpaper ──ok──▶ Cleanup
//!    │ none/err          │ err              │ err
//!    ▼                   ▼                  ▼
//!   stop                stop               stop (old files kept)
//! ```
//!
//! Cleanup problems never fail a run: the wallpaper is already applied by
//! then, and they are reported in the [`Outcome`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cleaner::{self, CleanupReport};
use crate::config::Config;
use crate::error::Error;
use crate::fetcher;
use crate::locator;
use crate::wallpaper::WallpaperSetter;

/// The step a run stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Locate,
    Download,
    SetWallpaper,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Locate => "locating the latest image",
            Stage::Download => "downloading the image",
            Stage::SetWallpaper => "setting the wallpaper",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("error {stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl StageError {
    fn at(stage: Stage) -> impl FnOnce(Error) -> Self {
        move |source| StageError { stage, source }
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The listing held no qualifying image; nothing was downloaded.
    NoImage,
    /// The new image is the wallpaper.
    Applied {
        path: PathBuf,
        /// `None` if the folder could not be listed for cleanup.
        cleanup: Option<CleanupReport>,
    },
}

/// Runs the full pipeline once.
pub async fn run(
    config: &Config,
    client: &reqwest::Client,
    setter: Arc<dyn WallpaperSetter>,
) -> Result<Outcome, StageError> {
    let Some(image_url) =
        locator::locate_latest(client, &config.page_url, &config.image_suffix)
            .await
            .map_err(StageError::at(Stage::Locate))?
    else {
        tracing::info!("No high-resolution images found.");
        return Ok(Outcome::NoImage);
    };
    tracing::info!("Latest high-res image URL: {image_url}");

    let path = fetcher::download_image(
        client,
        &image_url,
        &config.destination_dir,
        &config.file_prefix,
    )
    .await
    .map_err(StageError::at(Stage::Download))?;
    tracing::info!("Downloaded the latest image to {}", path.display());

    // The setter blocks on an external process
    let apply_path = path.clone();
    let backend = setter.name();
    tokio::task::spawn_blocking(move || setter.apply(&apply_path))
        .await
        .map_err(|source| Error::Task { backend, source })
        .and_then(|applied| applied)
        .map_err(StageError::at(Stage::SetWallpaper))?;
    tracing::info!("Wallpaper updated successfully ({backend}).");

    let cleanup = match cleaner::cleanup_folder(&config.destination_dir, &path) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!("Error during cleanup: {e}");
            None
        }
    };

    Ok(Outcome::Applied { path, cleanup })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve, test_client, Route};
    use std::path::Path;
    use std::sync::Mutex;

    const LISTING: &str = concat!(
        "<pre><a href=\"../\">../</a>\n",
        "<a href=\"20240101_1200_x21696x21696.jpg\">a</a>\n",
        "<a href=\"20240101_1800_x21696x21696.jpg\">b</a>\n",
        "<a href=\"20240101_1800_x1808x1808.jpg\">c</a>\n",
        "</pre>"
    );

    /// Records every path it was asked to apply.
    #[derive(Default)]
    struct RecordingSetter {
        applied: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    impl WallpaperSetter for RecordingSetter {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn apply(&self, image: &Path) -> crate::error::Result<()> {
            self.applied.lock().unwrap().push(image.to_path_buf());
            if self.fail {
                return Err(Error::Unsupported("no desktop in tests".to_string()));
            }
            Ok(())
        }
    }

    struct PanickingSetter;

    impl WallpaperSetter for PanickingSetter {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn apply(&self, _image: &Path) -> crate::error::Result<()> {
            panic!("backend blew up");
        }
    }

    async fn noaa_server() -> String {
        serve(vec![
            Route::ok("/GEOCOLOR/", LISTING),
            Route::ok("/GEOCOLOR/20240101_1800_x21696x21696.jpg", b"newest".to_vec()),
            Route::ok("/GEOCOLOR/20240101_1200_x21696x21696.jpg", b"older".to_vec()),
        ])
        .await
    }

    fn config_for(base: &str, destination_dir: PathBuf) -> Config {
        Config {
            page_url: format!("{base}/GEOCOLOR/"),
            destination_dir,
            ..Config::default()
        }
    }

    fn files_in(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        files
    }

    #[tokio::test]
    async fn test_successful_run_leaves_only_new_image() {
        let base = noaa_server().await;
        let tmp = tempfile::tempdir().unwrap();
        let dir = std::fs::canonicalize(tmp.path()).unwrap().join("FullDisk");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("NOAA_FullDisk_20231231_000000.jpg"), b"stale").unwrap();
        std::fs::write(dir.join("partial.jpg"), b"half").unwrap();

        let setter = Arc::new(RecordingSetter::default());
        let outcome = run(&config_for(&base, dir.clone()), &test_client(), setter.clone())
            .await
            .unwrap();

        let Outcome::Applied { path, cleanup } = outcome else {
            panic!("expected an applied wallpaper");
        };
        assert_eq!(files_in(&dir), vec![path.clone()]);
        assert_eq!(std::fs::read(&path).unwrap(), b"newest");
        assert_eq!(cleanup.unwrap().removed.len(), 2);
        assert_eq!(*setter.applied.lock().unwrap(), vec![path]);
    }

    #[tokio::test]
    async fn test_setter_failure_skips_cleanup() {
        let base = noaa_server().await;
        let tmp = tempfile::tempdir().unwrap();
        let dir = std::fs::canonicalize(tmp.path()).unwrap();
        let old = dir.join("NOAA_FullDisk_20231231_000000.jpg");
        std::fs::write(&old, b"stale").unwrap();

        let setter = Arc::new(RecordingSetter { fail: true, ..Default::default() });
        let err = run(&config_for(&base, dir.clone()), &test_client(), setter.clone())
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::SetWallpaper);
        assert_eq!(setter.applied.lock().unwrap().len(), 1);
        // Old image plus the freshly downloaded one
        assert_eq!(files_in(&dir).len(), 2);
        assert!(old.exists());
    }

    #[tokio::test]
    async fn test_setter_panic_is_task_error_and_keeps_files() {
        let base = noaa_server().await;
        let tmp = tempfile::tempdir().unwrap();
        let dir = std::fs::canonicalize(tmp.path()).unwrap();
        let old = dir.join("NOAA_FullDisk_20231231_000000.jpg");
        std::fs::write(&old, b"stale").unwrap();

        let err = run(&config_for(&base, dir.clone()), &test_client(), Arc::new(PanickingSetter))
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::SetWallpaper);
        match err.source {
            Error::Task { backend, source } => {
                assert_eq!(backend, "panicking");
                assert!(source.is_panic());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(old.exists());
    }

    #[tokio::test]
    async fn test_no_qualifying_image_stops_before_download() {
        let base = serve(vec![Route::ok("/GEOCOLOR/", "<a href=\"thumb_678x678.jpg\">t</a>")]).await;
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("FullDisk");

        let setter = Arc::new(RecordingSetter::default());
        let outcome = run(&config_for(&base, dir.clone()), &test_client(), setter.clone())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::NoImage));
        assert!(!dir.exists());
        assert!(setter.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_stops_at_locate() {
        let base = serve(vec![Route::status("/GEOCOLOR/", 500)]).await;
        let tmp = tempfile::tempdir().unwrap();

        let setter = Arc::new(RecordingSetter::default());
        let err = run(&config_for(&base, tmp.path().join("FullDisk")), &test_client(), setter)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Locate);
        assert!(matches!(err.source, Error::Status { .. }));
    }

    #[tokio::test]
    async fn test_missing_image_stops_at_download() {
        let base = serve(vec![Route::ok("/GEOCOLOR/", LISTING)]).await;
        let tmp = tempfile::tempdir().unwrap();

        let setter = Arc::new(RecordingSetter::default());
        let err = run(&config_for(&base, tmp.path().join("FullDisk")), &test_client(), setter.clone())
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Download);
        assert!(setter.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_destination_is_created() {
        let base = noaa_server().await;
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("scripts").join("FullDisk");

        let outcome = run(
            &config_for(&base, dir.clone()),
            &test_client(),
            Arc::new(RecordingSetter::default()),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, Outcome::Applied { .. }));
        assert_eq!(files_in(&dir).len(), 1);
    }
}
