use std::path::Path;

use super::{file_uri, run_checked, run_host_command, WallpaperSetter};
use crate::error::{Error, Result};

/// Drives PlasmaShell's scripting interface over D-Bus.
pub struct KdeSetter;

impl WallpaperSetter for KdeSetter {
    fn name(&self) -> &'static str {
        "kde"
    }

    fn apply(&self, image: &Path) -> Result<()> {
        let qdbus = find_qdbus()
            .ok_or_else(|| Error::Unsupported("qdbus not found (qdbus6/qdbus)".to_string()))?;
        let script = plasma_script(&file_uri(image)?);

        run_checked(
            qdbus,
            &[
                "org.kde.plasmashell",
                "/PlasmaShell",
                "org.kde.PlasmaShell.evaluateScript",
                &script,
            ],
        )
    }
}

/// Plasma 6 ships `qdbus6`, Plasma 5 ships `qdbus`.
fn find_qdbus() -> Option<&'static str> {
    ["qdbus6", "qdbus"]
        .into_iter()
        .find(|exe| run_host_command(exe, &["--version"]).is_ok())
}

fn plasma_script(uri: &str) -> String {
    let uri = uri.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "var allDesktops = desktops();\n\
         for (var i = 0; i < allDesktops.length; i++) {{\n\
           var d = allDesktops[i];\n\
           d.wallpaperPlugin = 'org.kde.image';\n\
           d.currentConfigGroup = ['Wallpaper', 'org.kde.image', 'General'];\n\
           d.writeConfig('Image', '{uri}');\n\
         }}\n"
    )
}
