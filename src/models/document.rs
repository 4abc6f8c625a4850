//! 笔记本文档格式（带版本）
//!
//! - v3（当前）: `{ version, language, nodejs?, description?, cells }`
//! - v2（旧版，只读兼容）: `{ version, nodejs?, sheet: { id, language?, cells? } }`
//!
//! 加载时只做一次迁移，之后内存中只有 v3 形状。

use super::error::DocumentError;
use super::ids::CellId;
use super::output::{CellError, CellOutput};
use serde::{Deserialize, Deserializer, Serialize};

pub const CURRENT_VERSION: u32 = 3;
pub const DEFAULT_LANGUAGE: &str = "javascript";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cellType", rename_all = "lowercase")]
pub enum SerializedCell {
    Code(SerializedCodeCell),
    Markdown(SerializedMarkdownCell),
}

impl SerializedCell {
    pub fn id(&self) -> &CellId {
        match self {
            SerializedCell::Code(c) => &c.id,
            SerializedCell::Markdown(c) => &c.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedCodeCell {
    pub id: CellId,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<CellOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CellError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedMarkdownCell {
    pub id: CellId,
    #[serde(default)]
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentV3 {
    pub version: u32,
    #[serde(default = "default_language", deserialize_with = "language_or_default")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodejs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "cells_or_default")]
    pub cells: Vec<SerializedCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentV2 {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodejs: Option<String>,
    pub sheet: SheetV2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetV2 {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<SerializedCell>>,
}

/// 磁盘上的笔记本文档，按 schema 版本区分
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedNotebook {
    V2(DocumentV2),
    V3(DocumentV3),
}

impl SerializedNotebook {
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// 按 `version` 分派；缺失时看结构：
    /// 有 `sheet` 包装的是 v2，其余按 v3 读取。
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        let object = value.as_object().ok_or(DocumentError::NotAnObject)?;
        let version = match object.get("version").and_then(|v| v.as_u64()) {
            Some(v) => v,
            None if object.contains_key("sheet") => 2,
            None => u64::from(CURRENT_VERSION),
        };

        let mut value = value;
        if let Some(object) = value.as_object_mut() {
            object.insert("version".to_string(), serde_json::Value::from(version));
        }

        match version {
            2 => Ok(SerializedNotebook::V2(serde_json::from_value(value)?)),
            3 => Ok(SerializedNotebook::V3(serde_json::from_value(value)?)),
            other => Err(DocumentError::UnsupportedVersion(other)),
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            SerializedNotebook::V2(_) => 2,
            SerializedNotebook::V3(_) => CURRENT_VERSION,
        }
    }

    pub fn migrate(self) -> DocumentV3 {
        match self {
            SerializedNotebook::V3(doc) => doc,
            SerializedNotebook::V2(doc) => migrate_v2(doc),
        }
    }
}

fn migrate_v2(doc: DocumentV2) -> DocumentV3 {
    DocumentV3 {
        version: CURRENT_VERSION,
        language: normalize_language(doc.sheet.language),
        nodejs: doc.nodejs,
        description: None,
        cells: doc.sheet.cells.unwrap_or_default(),
    }
}

impl DocumentV3 {
    pub fn to_json(&self, pretty: bool) -> Result<String, DocumentError> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

pub(crate) fn normalize_language(language: Option<String>) -> String {
    match language {
        Some(lang) if !lang.trim().is_empty() => lang,
        _ => default_language(),
    }
}

fn language_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let language = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_language(language))
}

fn cells_or_default<'de, D>(deserializer: D) -> Result<Vec<SerializedCell>, D::Error>
where
    D: Deserializer<'de>,
{
    let cells = Option::<Vec<SerializedCell>>::deserialize(deserializer)?;
    Ok(cells.unwrap_or_default())
}

#[cfg(test)]
#[path = "../../tests/unit/models/document.rs"]
mod tests;
