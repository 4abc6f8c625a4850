use super::app_dirs::get_cache_dir;
use crate::kernel::services::ports::settings::NotebookSettings;
use std::path::{Path, PathBuf};

const SETTINGS_DIR: &str = ".zbook";
const SETTINGS_FILE: &str = "settings.json";

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    write_default_settings(&path)?;
    Ok(path)
}

fn write_default_settings(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&NotebookSettings::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

/// 读取设置；文件缺失或损坏时使用默认值
pub fn load_settings() -> NotebookSettings {
    match get_settings_path() {
        Some(path) => load_settings_from(&path),
        None => NotebookSettings::default(),
    }
}

pub fn load_settings_from(path: &Path) -> NotebookSettings {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return NotebookSettings::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "read settings failed");
            return NotebookSettings::default();
        }
    };

    match serde_json::from_str(&data) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid settings, using defaults");
            NotebookSettings::default()
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
