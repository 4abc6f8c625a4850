//! 应用目录
//!
//! - 数据目录（日志）:
//!   - macOS: ~/Library/Application Support/zbook
//!   - Linux: $XDG_DATA_HOME/zbook 或 ~/.local/share/zbook
//!   - Windows: %APPDATA%\zbook
//! - 缓存目录（设置文件）: ~/Library/Caches, $XDG_CACHE_HOME / ~/.cache, %LOCALAPPDATA%
//!
//! 环境变量查找以参数传入。

use std::path::PathBuf;

const APP_NAME: &str = "zbook";
const LOG_DIR: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirKind {
    Data,
    Cache,
}

/// 空值视为未设置
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn platform_dir(kind: DirKind, var: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs_path_macos(kind, var)
    }

    #[cfg(target_os = "linux")]
    {
        dirs_path_linux(kind, var)
    }

    #[cfg(target_os = "windows")]
    {
        dirs_path_windows(kind, var)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = (kind, var);
        None
    }
}

#[cfg(target_os = "macos")]
fn dirs_path_macos(kind: DirKind, var: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let sub = match kind {
        DirKind::Data => "Library/Application Support",
        DirKind::Cache => "Library/Caches",
    };
    var("HOME").map(|home| PathBuf::from(home).join(sub))
}

#[cfg(target_os = "linux")]
fn dirs_path_linux(kind: DirKind, var: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let (xdg, fallback) = match kind {
        DirKind::Data => ("XDG_DATA_HOME", ".local/share"),
        DirKind::Cache => ("XDG_CACHE_HOME", ".cache"),
    };
    var(xdg)
        .map(PathBuf::from)
        .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(fallback)))
}

#[cfg(target_os = "windows")]
fn dirs_path_windows(kind: DirKind, var: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    match kind {
        DirKind::Data => var("APPDATA").map(PathBuf::from),
        DirKind::Cache => var("LOCALAPPDATA")
            .or_else(|| var("APPDATA"))
            .map(PathBuf::from),
    }
}

fn log_dir_with(var: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    platform_dir(DirKind::Data, var).map(|dir| dir.join(APP_NAME).join(LOG_DIR))
}

/// 设置文件所在的缓存根目录，应用子目录由调用方拼接。
pub(crate) fn get_cache_dir() -> Option<PathBuf> {
    platform_dir(DirKind::Cache, &env_var)
}

pub fn get_log_dir() -> Option<PathBuf> {
    log_dir_with(&env_var)
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine log directory",
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/app_dirs.rs"]
mod tests;
