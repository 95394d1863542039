use std::path::Path;

use super::{file_uri, run_checked, WallpaperSetter};
use crate::error::Result;

const SCHEMA: &str = "org.gnome.desktop.background";

/// GNOME keeps one background for all monitors in dconf.
pub struct GnomeSetter;

impl WallpaperSetter for GnomeSetter {
    fn name(&self) -> &'static str {
        "gnome"
    }

    fn apply(&self, image: &Path) -> Result<()> {
        let uri = file_uri(image)?;

        run_checked("gsettings", &["set", SCHEMA, "picture-uri", &uri])?;

        // GNOME 42+ reads a separate key in dark mode; older versions lack it
        if let Err(e) = run_checked("gsettings", &["set", SCHEMA, "picture-uri-dark", &uri]) {
            tracing::debug!("picture-uri-dark not set: {e}");
        }

        Ok(())
    }
}
