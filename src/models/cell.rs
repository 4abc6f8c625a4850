//! 单元格模型：代码单元格 / Markdown 单元格
//!
//! 单元格不持有所属笔记本的引用。内容变更会推进 `revision`，
//! 由笔记本比较前后 revision 来决定是否标记为已修改。

use super::document::{SerializedCell, SerializedCodeCell, SerializedMarkdownCell};
use super::ids::CellId;
use super::output::{CaretPosition, CellError, CellOutput};
use crate::core::Emitter;
use ropey::Rope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Code,
    Markdown,
}

#[derive(Debug, Default)]
pub struct CellEvents {
    pub source_changed: Emitter<()>,
    pub outputs_changed: Emitter<()>,
    pub errors_changed: Emitter<()>,
    pub executing_changed: Emitter<bool>,
    pub selection_changed: Emitter<bool>,
    pub caret_changed: Emitter<CaretPosition>,
}

#[derive(Debug, Default)]
struct CodeState {
    outputs: Vec<CellOutput>,
    errors: Vec<CellError>,
    executing: bool,
    notebook_executing: bool,
}

#[derive(Debug)]
enum CellBody {
    Code(CodeState),
    Markdown,
}

#[derive(Debug)]
pub struct Cell {
    id: CellId,
    text: Rope,
    pending_edit: Option<String>,
    caret: CaretPosition,
    selected: bool,
    body: CellBody,
    revision: u64,
    events: CellEvents,
}

impl Cell {
    pub fn new_code(source: &str) -> Self {
        Self::with_id(CellId::generate(), CellKind::Code, source)
    }

    pub fn new_markdown(text: &str) -> Self {
        Self::with_id(CellId::generate(), CellKind::Markdown, text)
    }

    pub fn with_id(id: CellId, kind: CellKind, text: &str) -> Self {
        let body = match kind {
            CellKind::Code => CellBody::Code(CodeState::default()),
            CellKind::Markdown => CellBody::Markdown,
        };
        Self {
            id,
            text: Rope::from_str(text),
            pending_edit: None,
            caret: CaretPosition::default(),
            selected: false,
            body,
            revision: 0,
            events: CellEvents::default(),
        }
    }

    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub fn kind(&self) -> CellKind {
        match self.body {
            CellBody::Code(_) => CellKind::Code,
            CellBody::Markdown => CellKind::Markdown,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self.body, CellBody::Code(_))
    }

    pub fn events(&self) -> &CellEvents {
        &self.events
    }

    pub fn text(&self) -> &Rope {
        &self.text
    }

    /// 已提交的文本；暂存的编辑在 flush 之前不可见
    pub fn source(&self) -> String {
        self.text.to_string()
    }

    pub fn set_source(&mut self, source: &str) {
        self.pending_edit = None;
        if self.text == source {
            return;
        }
        self.text = Rope::from_str(source);
        self.revision += 1;
        self.clamp_caret();
        self.events.source_changed.emit(&());
    }

    /// 暂存 UI 中进行中的编辑，见 [`Cell::flush_changes`]
    pub fn stage_edit(&mut self, source: impl Into<String>) {
        self.pending_edit = Some(source.into());
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending_edit.is_some()
    }

    pub fn flush_changes(&mut self) -> bool {
        let Some(pending) = self.pending_edit.take() else {
            return false;
        };
        let before = self.revision;
        self.set_source(&pending);
        self.revision != before
    }

    pub fn caret(&self) -> CaretPosition {
        self.caret
    }

    /// 移动光标并限制在已提交文本内，返回最终位置
    pub fn set_caret(&mut self, caret: CaretPosition) -> CaretPosition {
        let clamped = clamp_to_rope(&self.text, caret);
        if clamped != self.caret {
            self.caret = clamped;
            self.events.caret_changed.emit(&clamped);
        }
        clamped
    }

    fn clamp_caret(&mut self) {
        let clamped = clamp_to_rope(&self.text, self.caret);
        if clamped != self.caret {
            self.caret = clamped;
            self.events.caret_changed.emit(&clamped);
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        self.events.selection_changed.emit(&selected);
    }

    pub fn outputs(&self) -> &[CellOutput] {
        match &self.body {
            CellBody::Code(code) => &code.outputs,
            CellBody::Markdown => &[],
        }
    }

    pub fn errors(&self) -> &[CellError] {
        match &self.body {
            CellBody::Code(code) => &code.errors,
            CellBody::Markdown => &[],
        }
    }

    pub fn executing(&self) -> bool {
        matches!(&self.body, CellBody::Code(code) if code.executing)
    }

    pub fn notebook_executing(&self) -> bool {
        matches!(&self.body, CellBody::Code(code) if code.notebook_executing)
    }

    /// 追加一条输出；Markdown 单元没有输出，返回 `false`
    pub fn push_output(&mut self, output: CellOutput) -> bool {
        let CellBody::Code(code) = &mut self.body else {
            return false;
        };
        code.outputs.push(output);
        self.revision += 1;
        self.events.outputs_changed.emit(&());
        true
    }

    pub fn push_error(&mut self, error: CellError) -> bool {
        let CellBody::Code(code) = &mut self.body else {
            return false;
        };
        code.errors.push(error);
        self.revision += 1;
        self.events.errors_changed.emit(&());
        true
    }

    pub fn clear_outputs(&mut self) -> bool {
        let CellBody::Code(code) = &mut self.body else {
            return false;
        };
        let had_outputs = !code.outputs.is_empty();
        let had_errors = !code.errors.is_empty();
        code.outputs.clear();
        code.errors.clear();
        if had_outputs || had_errors {
            self.revision += 1;
        }
        if had_outputs {
            self.events.outputs_changed.emit(&());
        }
        if had_errors {
            self.events.errors_changed.emit(&());
        }
        had_outputs || had_errors
    }

    pub fn notify_eval_started(&mut self) {
        self.clear_outputs();
        self.set_executing(true);
    }

    pub fn notify_eval_completed(&mut self) {
        self.set_executing(false);
    }

    pub(crate) fn notify_notebook_eval_started(&mut self) {
        if let CellBody::Code(code) = &mut self.body {
            code.notebook_executing = true;
        }
    }

    pub(crate) fn notify_notebook_eval_completed(&mut self) {
        if let CellBody::Code(code) = &mut self.body {
            code.notebook_executing = false;
        }
        self.set_executing(false);
    }

    fn set_executing(&mut self, executing: bool) {
        let CellBody::Code(code) = &mut self.body else {
            return;
        };
        if code.executing == executing {
            return;
        }
        code.executing = executing;
        self.events.executing_changed.emit(&executing);
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = CellId::generate();
    }

    pub fn to_serialized(&self, include_outputs: bool) -> SerializedCell {
        match &self.body {
            CellBody::Code(code) => SerializedCell::Code(SerializedCodeCell {
                id: self.id.clone(),
                code: self.source(),
                output: if include_outputs {
                    code.outputs.clone()
                } else {
                    Vec::new()
                },
                errors: if include_outputs {
                    code.errors.clone()
                } else {
                    Vec::new()
                },
            }),
            CellBody::Markdown => SerializedCell::Markdown(SerializedMarkdownCell {
                id: self.id.clone(),
                markdown: self.source(),
            }),
        }
    }

    pub fn from_serialized(cell: SerializedCell) -> Self {
        match cell {
            SerializedCell::Code(code) => {
                let mut cell = Self::with_id(code.id, CellKind::Code, &code.code);
                if let CellBody::Code(state) = &mut cell.body {
                    state.outputs = code.output;
                    state.errors = code.errors;
                }
                cell
            }
            SerializedCell::Markdown(md) => {
                Self::with_id(md.id, CellKind::Markdown, &md.markdown)
            }
        }
    }
}

fn clamp_to_rope(rope: &Rope, caret: CaretPosition) -> CaretPosition {
    let last_line = rope.len_lines().saturating_sub(1);
    let line = caret.line.min(last_line);
    let column = caret.column.min(line_len_chars(rope, line));
    CaretPosition { line, column }
}

fn line_len_chars(rope: &Rope, line: usize) -> usize {
    let slice = rope.line(line);
    let mut len = slice.len_chars();
    while len > 0 {
        let ch = slice.char(len - 1);
        if ch == '\n' || ch == '\r' {
            len -= 1;
        } else {
            break;
        }
    }
    len
}

#[cfg(test)]
#[path = "../../tests/unit/models/cell.rs"]
mod tests;
