use std::path::Path;

use super::{run_checked, utf8_path, WallpaperSetter};
use crate::error::Result;

/// Sets the picture of every desktop through System Events.
pub struct MacOsSetter;

impl WallpaperSetter for MacOsSetter {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn apply(&self, image: &Path) -> Result<()> {
        let script = desktop_script(utf8_path(image)?);
        run_checked("osascript", &["-e", &script])
    }
}

/// AppleScript that walks every desktop (one per display/space) and sets its picture.
fn desktop_script(image: &str) -> String {
    format!(
        r#"tell application "System Events"
    set theDesktops to a reference to every desktop
    repeat with aDesktop in theDesktops
        set picture of aDesktop to "{}"
    end repeat
end tell"#,
        applescript_escape(image)
    )
}

/// Escapes backslashes and double quotes for an AppleScript string literal.
fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
