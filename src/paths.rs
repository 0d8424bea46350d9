//! Path utilities for app data, exports, and logs directories.

use std::path::PathBuf;
use tauri::{AppHandle, Manager};

/// Get the app data directory (e.g. %APPDATA%/cutlist on Windows).
pub fn app_data_dir(app: &AppHandle) -> Result<PathBuf, String> {
    app.path().app_data_dir().map_err(|e| e.to_string())
}

/// Get the exports directory, creating it if necessary. Rendered cuts and
/// subtitle files default here.
pub fn exports_dir(app: &AppHandle) -> Result<PathBuf, String> {
    let dir = app_data_dir(app)?.join("exports");
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    Ok(dir)
}

/// Get the log file path (e.g. %APPDATA%/cutlist/logs/cutlist.log on Windows).
pub fn log_file_path(app: &AppHandle) -> Result<PathBuf, String> {
    let dir = app_data_dir(app)?.join("logs");
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    Ok(dir.join("cutlist.log"))
}

/// Ensure all app directories exist.
pub fn ensure_directories(app: &AppHandle) -> Result<(), String> {
    app_data_dir(app)?;
    exports_dir(app)?;
    let _ = log_file_path(app);
    Ok(())
}
