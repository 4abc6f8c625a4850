use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 稳定的单元标识，移动和保存/加载后不变
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CellId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 已加载笔记本在进程内的身份，不持久化
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const UNTITLED_PREFIX: &str = "untitled-";

/// 笔记本存放位置的不透明句柄。本地存储使用文件路径；
/// 从未保存的笔记本使用 `untitled-N` 占位。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageId {
    Untitled(u32),
    Path(PathBuf),
}

impl StorageId {
    pub fn untitled(n: u32) -> Self {
        StorageId::Untitled(n)
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        StorageId::Path(path.into())
    }

    pub fn is_untitled(&self) -> bool {
        matches!(self, StorageId::Untitled(_))
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            StorageId::Path(p) => Some(p.as_path()),
            StorageId::Untitled(_) => None,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            StorageId::Untitled(n) => format!("{UNTITLED_PREFIX}{n}"),
            StorageId::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string()),
        }
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageId::Untitled(n) => write!(f, "{UNTITLED_PREFIX}{n}"),
            StorageId::Path(p) => write!(f, "{}", p.display()),
        }
    }
}
