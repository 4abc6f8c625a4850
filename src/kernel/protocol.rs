//! 与求值引擎之间的消息格式
//!
//! 引擎 → 编辑器：`EngineMessage`，按 `type` 标签区分事件。
//! 编辑器 → 引擎：`EvalRequest`，按 `request` 标签区分请求（JSON 行）。

use crate::models::{CellError, CellId, CellOutput, DocumentV3, InstanceId};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_CAP: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineMessage {
    #[serde(
        rename = "instanceId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub instance_id: Option<InstanceId>,
    #[serde(flatten)]
    pub event: EvalEvent,
}

impl EngineMessage {
    pub fn new(instance_id: &InstanceId, event: EvalEvent) -> Self {
        Self {
            instance_id: Some(instance_id.clone()),
            event,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EvalEvent {
    CellEvalStarted {
        #[serde(rename = "cellId")]
        cell_id: CellId,
    },
    CellEvalCompleted {
        #[serde(rename = "cellId")]
        cell_id: CellId,
    },
    NotebookEvalCompleted,
    OutputCapped {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u64>,
    },
    ReceiveDisplay {
        #[serde(default)]
        outputs: Vec<DisplayItem>,
    },
    ReceiveError {
        #[serde(rename = "cellId", default, skip_serializing_if = "Option::is_none")]
        cell_id: Option<CellId>,
        error: CellError,
    },
}

impl EvalEvent {
    pub fn tag(&self) -> &'static str {
        match self {
            EvalEvent::CellEvalStarted { .. } => "cell-eval-started",
            EvalEvent::CellEvalCompleted { .. } => "cell-eval-completed",
            EvalEvent::NotebookEvalCompleted => "notebook-eval-completed",
            EvalEvent::OutputCapped { .. } => "output-capped",
            EvalEvent::ReceiveDisplay { .. } => "receive-display",
            EvalEvent::ReceiveError { .. } => "receive-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    pub cell_id: CellId,
    pub output: CellOutput,
}

#[derive(Debug, Serialize)]
#[serde(tag = "request", rename_all = "kebab-case")]
pub enum EvalRequest<'a> {
    #[serde(rename_all = "camelCase")]
    InstallNotebook {
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        containing_path: Option<&'a Path>,
    },
    #[serde(rename_all = "camelCase")]
    EvalNotebook {
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        containing_path: Option<&'a Path>,
    },
    #[serde(rename_all = "camelCase")]
    EvalToCell {
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        cell_id: &'a CellId,
        containing_path: Option<&'a Path>,
    },
    #[serde(rename_all = "camelCase")]
    EvalSingleCell {
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        cell_id: &'a CellId,
        containing_path: Option<&'a Path>,
    },
    #[serde(rename_all = "camelCase")]
    StopEvaluation { instance_id: &'a InstanceId },
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/protocol.rs"]
mod tests;
