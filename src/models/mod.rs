//! 数据模型：笔记本、单元格、输出与文档格式

pub mod cell;
pub mod document;
pub mod error;
pub mod ids;
pub mod notebook;
pub mod output;

pub use cell::{Cell, CellEvents, CellKind};
pub use document::{
    DocumentV2, DocumentV3, SerializedCell, SerializedCodeCell, SerializedMarkdownCell,
    SerializedNotebook, SheetV2, CURRENT_VERSION, DEFAULT_LANGUAGE,
};
pub use error::{DocumentError, NotebookError, Result};
pub use ids::{CellId, InstanceId, StorageId};
pub use notebook::{CellMut, Notebook, NotebookEvents, SaveTicket};
pub use output::{CaretPosition, CellError, CellOutput, ErrorLocation};
