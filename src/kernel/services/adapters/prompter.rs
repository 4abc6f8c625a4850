//! 无界面的提示器：答案预先配置，通知写入日志并留存。

use crate::kernel::services::ports::prompter::{Prompter, SaveChoice};
use crate::kernel::services::ports::runtime::LocalBoxFuture;
use crate::models::StorageId;
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Warning(String),
}

#[derive(Debug)]
pub struct HeadlessPrompter {
    save_choice: SaveChoice,
    open_id: RefCell<Option<StorageId>>,
    save_as_id: RefCell<Option<StorageId>>,
    notices: RefCell<Vec<Notice>>,
}

impl HeadlessPrompter {
    pub fn new(save_choice: SaveChoice) -> Self {
        Self {
            save_choice,
            open_id: RefCell::new(None),
            save_as_id: RefCell::new(None),
            notices: RefCell::new(Vec::new()),
        }
    }

    /// 打开对话框的下一个答案，用一次即清空
    pub fn set_open_id(&self, id: Option<StorageId>) {
        *self.open_id.borrow_mut() = id;
    }

    /// 另存为对话框的下一个答案，用一次即清空
    pub fn set_save_as_id(&self, id: Option<StorageId>) {
        *self.save_as_id.borrow_mut() = id;
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }
}

impl Default for HeadlessPrompter {
    fn default() -> Self {
        Self::new(SaveChoice::Cancel)
    }
}

impl Prompter for HeadlessPrompter {
    fn confirm_save<'a>(&'a self, notebook_name: &'a str) -> LocalBoxFuture<'a, SaveChoice> {
        let choice = self.save_choice;
        tracing::info!(notebook = notebook_name, ?choice, "unsaved changes");
        Box::pin(async move { choice })
    }

    fn pick_open_id(&self) -> LocalBoxFuture<'_, Option<StorageId>> {
        let id = self.open_id.borrow_mut().take();
        Box::pin(async move { id })
    }

    fn pick_save_as_id<'a>(
        &'a self,
        current: &'a StorageId,
    ) -> LocalBoxFuture<'a, Option<StorageId>> {
        let id = self.save_as_id.borrow_mut().take();
        if id.is_none() {
            tracing::info!(current = %current, "no save-as target available");
        }
        Box::pin(async move { id })
    }

    fn show_error(&self, message: &str) {
        tracing::error!("{message}");
        self.notices
            .borrow_mut()
            .push(Notice::Error(message.to_string()));
    }

    fn show_warning(&self, message: &str) {
        tracing::warn!("{message}");
        self.notices
            .borrow_mut()
            .push(Notice::Warning(message.to_string()));
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/prompter.rs"]
mod tests;
