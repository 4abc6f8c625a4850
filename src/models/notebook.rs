//! 笔记本视图模型
//!
//! 有序单元格集合 + 文档级元数据。顺序即显示顺序，也是序列化/执行顺序。
//! 笔记本独占单元格；对单元格的可变访问统一经过 [`CellMut`]，
//! 守卫释放时根据 revision 变化标记笔记本为已修改。

use super::cell::{Cell, CellKind};
use super::document::{normalize_language, DocumentV3, SerializedNotebook, CURRENT_VERSION};
use super::error::{NotebookError, Result};
use super::ids::{CellId, InstanceId, StorageId};
use crate::core::Emitter;
use rustc_hash::FxHashSet;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Default)]
pub struct NotebookEvents {
    pub cells_changed: Emitter<()>,
    pub cell_changed: Emitter<CellId>,
    pub modified_changed: Emitter<bool>,
    pub selection_changed: Emitter<Option<CellId>>,
    pub eval_started: Emitter<()>,
    pub eval_completed: Emitter<()>,
    pub will_save: Emitter<()>,
}

/// 待写入的文档快照，以及快照时的笔记本版本号
#[derive(Debug, Clone)]
pub struct SaveTicket {
    storage_id: StorageId,
    document: DocumentV3,
    revision: u64,
}

impl SaveTicket {
    pub fn storage_id(&self) -> &StorageId {
        &self.storage_id
    }

    pub fn document(&self) -> &DocumentV3 {
        &self.document
    }
}

#[derive(Debug)]
pub struct Notebook {
    instance_id: InstanceId,
    storage_id: StorageId,
    language: String,
    nodejs_version: Option<String>,
    default_nodejs_version: String,
    description: Option<String>,
    cells: Vec<Cell>,
    modified: bool,
    unsaved: bool,
    read_only: bool,
    executing: bool,
    selected: Option<CellId>,
    revision: u64,
    events: NotebookEvents,
}

impl Notebook {
    pub fn new(
        storage_id: StorageId,
        language: impl Into<String>,
        cells: Vec<Cell>,
        default_nodejs_version: impl Into<String>,
    ) -> Self {
        let mut notebook = Self {
            instance_id: InstanceId::generate(),
            storage_id,
            language: normalize_language(Some(language.into())),
            nodejs_version: None,
            default_nodejs_version: default_nodejs_version.into(),
            description: None,
            cells,
            modified: false,
            unsaved: false,
            read_only: false,
            executing: false,
            selected: None,
            revision: 0,
            events: NotebookEvents::default(),
        };
        notebook.ensure_unique_ids();
        for cell in &mut notebook.cells {
            cell.set_selected(false);
        }
        notebook
    }

    pub fn with_nodejs_version(mut self, version: Option<String>) -> Self {
        self.nodejs_version = version.filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_unsaved(mut self, unsaved: bool) -> Self {
        self.unsaved = unsaved;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    fn ensure_unique_ids(&mut self) {
        let mut seen = FxHashSet::default();
        for cell in &mut self.cells {
            if !seen.insert(cell.id().clone()) {
                let duplicate = cell.id().clone();
                cell.regenerate_id();
                tracing::warn!(
                    duplicate = %duplicate,
                    replacement = %cell.id(),
                    "duplicate cell id, assigned a fresh one"
                );
                seen.insert(cell.id().clone());
            }
        }
    }

    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    pub fn storage_id(&self) -> &StorageId {
        &self.storage_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// 有覆盖值用覆盖值，否则用注入的默认值
    pub fn nodejs_version(&self) -> &str {
        self.nodejs_version
            .as_deref()
            .unwrap_or(&self.default_nodejs_version)
    }

    pub fn nodejs_override(&self) -> Option<&str> {
        self.nodejs_version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn events(&self) -> &NotebookEvents {
        &self.events
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn set_modified(&mut self, modified: bool) {
        if self.modified == modified {
            return;
        }
        self.modified = modified;
        self.events.modified_changed.emit(&modified);
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.set_modified(true);
    }

    pub fn set_language(&mut self, language: &str) {
        let language = normalize_language(Some(language.to_string()));
        if language != self.language {
            self.language = language;
            self.touch();
        }
    }

    pub fn set_nodejs_version(&mut self, version: Option<String>) {
        let version = version.filter(|v| !v.trim().is_empty());
        if version != self.nodejs_version {
            self.nodejs_version = version;
            self.touch();
        }
    }

    pub fn set_description(&mut self, description: Option<String>) {
        if description != self.description {
            self.description = description;
            self.touch();
        }
    }

    // ---- cells -------------------------------------------------------------

    pub fn add_cell(&mut self, index: usize, mut cell: Cell) -> Result<()> {
        if index > self.cells.len() {
            return Err(NotebookError::OutOfRange {
                index,
                len: self.cells.len(),
            });
        }
        if self.position(cell.id()).is_some() {
            cell.regenerate_id();
        }
        cell.set_selected(false);
        self.cells.insert(index, cell);
        self.events.cells_changed.emit(&());
        self.touch();
        Ok(())
    }

    pub fn delete_cell(&mut self, id: &CellId) -> Result<Cell> {
        let index = self
            .position(id)
            .ok_or_else(|| NotebookError::NotFound(id.clone()))?;
        if self.selected.as_ref() == Some(id) {
            self.deselect();
        }
        let cell = self.cells.remove(index);
        self.events.cells_changed.emit(&());
        self.touch();
        Ok(cell)
    }

    /// 按键盘导航的方式删除单元：选中项移到顶替它的单元，
    /// 删除的是最后一个时移到新的最后一个。返回新选中的 id。
    pub fn delete_cell_and_select_next(&mut self, id: &CellId) -> Result<Option<CellId>> {
        let index = self
            .position(id)
            .ok_or_else(|| NotebookError::NotFound(id.clone()))?;
        self.delete_cell(id)?;

        let next = match self.cells.get(index) {
            Some(cell) => Some(cell.id().clone()),
            None => self.cells.last().map(|cell| cell.id().clone()),
        };

        if let Some(next) = &next {
            self.select_cell(next)?;
        }
        Ok(next)
    }

    /// splice 语义：先从 `source` 移除，再插入到缩短后序列的 `dest` 处
    pub fn move_cell(&mut self, source: usize, dest: usize) -> Result<()> {
        let len = self.cells.len();
        if source >= len {
            return Err(NotebookError::OutOfRange { index: source, len });
        }
        if dest >= len {
            return Err(NotebookError::OutOfRange { index: dest, len });
        }
        if source == dest {
            return Ok(());
        }
        let cell = self.cells.remove(source);
        self.cells.insert(dest, cell);
        self.events.cells_changed.emit(&());
        self.touch();
        Ok(())
    }

    pub fn position(&self, id: &CellId) -> Option<usize> {
        self.cells.iter().position(|cell| cell.id() == id)
    }

    pub fn find_cell(&self, id: &CellId) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id() == id)
    }

    pub fn find_next_cell(&self, id: &CellId) -> Option<&Cell> {
        let index = self.position(id)?;
        self.cells.get(index + 1)
    }

    pub fn find_prev_cell(&self, id: &CellId) -> Option<&Cell> {
        let index = self.position(id)?;
        index.checked_sub(1).and_then(|i| self.cells.get(i))
    }

    pub fn first_code_cell(&self) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.kind() == CellKind::Code)
    }

    pub fn cell_mut(&mut self, id: &CellId) -> Option<CellMut<'_>> {
        let index = self.position(id)?;
        let revision = self.cells[index].revision();
        Some(CellMut {
            notebook: self,
            index,
            revision,
        })
    }

    // ---- selection ---------------------------------------------------------

    pub fn selected_cell(&self) -> Option<&Cell> {
        self.selected.as_ref().and_then(|id| self.find_cell(id))
    }

    pub fn selected_cell_id(&self) -> Option<&CellId> {
        self.selected.as_ref()
    }

    pub fn select_cell(&mut self, id: &CellId) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| NotebookError::NotFound(id.clone()))?;

        if self.selected.as_ref() == Some(id) {
            self.cells[index].set_selected(true);
            return Ok(());
        }

        if let Some(prev) = self.selected.take() {
            if let Some(prev_index) = self.position(&prev) {
                self.cells[prev_index].set_selected(false);
            }
        }

        self.cells[index].set_selected(true);
        self.selected = Some(id.clone());
        self.events.selection_changed.emit(&self.selected);
        Ok(())
    }

    pub fn deselect(&mut self) {
        let Some(prev) = self.selected.take() else {
            return;
        };
        if let Some(index) = self.position(&prev) {
            self.cells[index].set_selected(false);
        }
        self.events.selection_changed.emit(&None);
    }

    // ---- outputs / evaluation lifecycle -----------------------------------

    pub fn clear_outputs(&mut self) -> bool {
        let mut changed = Vec::new();
        for cell in &mut self.cells {
            if cell.clear_outputs() {
                changed.push(cell.id().clone());
            }
        }
        if changed.is_empty() {
            return false;
        }
        for id in &changed {
            self.events.cell_changed.emit(id);
        }
        self.touch();
        true
    }

    pub fn notify_code_eval_started(&mut self) {
        let was_executing = self.executing;
        self.executing = true;
        for cell in &mut self.cells {
            cell.notify_notebook_eval_started();
        }
        if !was_executing {
            self.events.eval_started.emit(&());
        }
    }

    pub fn notify_code_eval_complete(&mut self) {
        let was_executing = self.executing;
        self.executing = false;
        for cell in &mut self.cells {
            cell.notify_notebook_eval_completed();
        }
        if was_executing {
            self.events.eval_completed.emit(&());
        }
    }

    /// 提交进行中的编辑；写盘或发给引擎前调用
    pub fn flush_changes(&mut self) {
        self.events.will_save.emit(&());
        let mut changed = Vec::new();
        for cell in &mut self.cells {
            if cell.flush_changes() {
                changed.push(cell.id().clone());
            }
        }
        if changed.is_empty() {
            return;
        }
        for id in &changed {
            self.events.cell_changed.emit(id);
        }
        self.touch();
    }

    // ---- persistence -------------------------------------------------------

    pub fn prepare_save(&mut self) -> Result<SaveTicket> {
        if self.read_only {
            return Err(NotebookError::ReadOnlyViolation);
        }
        if self.unsaved {
            return Err(NotebookError::NeverSaved);
        }
        self.flush_changes();
        Ok(SaveTicket {
            storage_id: self.storage_id.clone(),
            document: self.serialize(),
            revision: self.revision,
        })
    }

    pub fn commit_save(&mut self, ticket: &SaveTicket) {
        if ticket.revision == self.revision {
            self.set_modified(false);
        }
    }

    pub fn prepare_save_as(&mut self, storage_id: StorageId) -> SaveTicket {
        self.flush_changes();
        SaveTicket {
            storage_id,
            document: self.serialize(),
            revision: self.revision,
        }
    }

    pub fn commit_save_as(&mut self, ticket: &SaveTicket) {
        self.storage_id = ticket.storage_id.clone();
        self.unsaved = false;
        self.read_only = false;
        self.commit_save(ticket);
    }

    pub fn serialize(&self) -> DocumentV3 {
        self.to_document(true)
    }

    /// 给求值引擎的精简文档，不含输出和错误
    pub fn serialize_for_eval(&self) -> DocumentV3 {
        self.to_document(false)
    }

    fn to_document(&self, include_outputs: bool) -> DocumentV3 {
        DocumentV3 {
            version: CURRENT_VERSION,
            language: self.language.clone(),
            nodejs: self.nodejs_version.clone(),
            description: self.description.clone(),
            cells: self
                .cells
                .iter()
                .map(|cell| cell.to_serialized(include_outputs))
                .collect(),
        }
    }

    pub fn deserialize(
        storage_id: StorageId,
        unsaved: bool,
        read_only: bool,
        default_nodejs_version: impl Into<String>,
        document: SerializedNotebook,
    ) -> Self {
        let doc = document.migrate();
        let cells = doc.cells.into_iter().map(Cell::from_serialized).collect();
        Notebook::new(storage_id, doc.language, cells, default_nodejs_version)
            .with_nodejs_version(doc.nodejs)
            .with_description(doc.description)
            .with_unsaved(unsaved)
            .with_read_only(read_only)
    }
}

/// 可变访问单个单元。drop 时若内容有变化，标记笔记本已修改并触发 `cell_changed`。
pub struct CellMut<'a> {
    notebook: &'a mut Notebook,
    index: usize,
    revision: u64,
}

impl Deref for CellMut<'_> {
    type Target = Cell;

    fn deref(&self) -> &Cell {
        &self.notebook.cells[self.index]
    }
}

impl DerefMut for CellMut<'_> {
    fn deref_mut(&mut self) -> &mut Cell {
        &mut self.notebook.cells[self.index]
    }
}

impl Drop for CellMut<'_> {
    fn drop(&mut self) {
        let cell = &self.notebook.cells[self.index];
        if cell.revision() == self.revision {
            return;
        }
        let id = cell.id().clone();
        self.notebook.events.cell_changed.emit(&id);
        self.notebook.touch();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/notebook.rs"]
mod tests;
