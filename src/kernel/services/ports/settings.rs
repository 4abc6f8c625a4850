use crate::models::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NODEJS_VERSION: &str = "20.11.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookSettings {
    /// 笔记本没有 `nodejs` 覆盖时使用
    pub default_nodejs_version: String,
    pub default_language: String,
    /// 求值引擎的 argv；为空表示没有引擎
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub engine_command: Vec<String>,
    pub pretty_json: bool,
}

impl Default for NotebookSettings {
    fn default() -> Self {
        Self {
            default_nodejs_version: DEFAULT_NODEJS_VERSION.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            engine_command: Vec::new(),
            pretty_json: true,
        }
    }
}

impl NotebookSettings {
    pub fn has_engine(&self) -> bool {
        !self.engine_command.is_empty()
    }
}
