use std::path::PathBuf;

const APP_ID: &str = "com.examplanner.app";
const DATA_DIR_ENV: &str = "EXAM_PLANNER_DATA_DIR";

/// Directory holding `records.json` and `settings.toml`.
/// `EXAM_PLANNER_DATA_DIR` takes precedence over the platform app data directory.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    // Use platform-specific app data directory
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support");
            dir.push(APP_ID);
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push(APP_ID);
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share");
            dir.push(APP_ID);
            return dir;
        }
    }

    // Fallback
    PathBuf::from("data")
}
