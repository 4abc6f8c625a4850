use serde::{Deserialize, Serialize};

/// 代码单元显示的一个值，负载保留为原始 JSON，由 UI 负责渲染
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    pub value: serde_json::Value,
}

impl CellOutput {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            display_type: None,
            value,
        }
    }

    pub fn with_display_type(display_type: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            display_type: Some(display_type.into()),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellError {
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ErrorLocation>,
}

impl CellError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            stack: None,
            location: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// 单元文本内的光标位置，从 0 开始，列按字符计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaretPosition {
    pub line: usize,
    pub column: usize,
}

impl CaretPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
