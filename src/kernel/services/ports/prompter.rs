use super::runtime::LocalBoxFuture;
use crate::models::StorageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// 面向用户的对话框与通知
pub trait Prompter {
    /// 丢弃已修改的笔记本前询问
    fn confirm_save<'a>(&'a self, notebook_name: &'a str) -> LocalBoxFuture<'a, SaveChoice>;

    fn pick_open_id(&self) -> LocalBoxFuture<'_, Option<StorageId>>;

    fn pick_save_as_id<'a>(&'a self, current: &'a StorageId)
        -> LocalBoxFuture<'a, Option<StorageId>>;

    fn show_error(&self, message: &str);

    fn show_warning(&self, message: &str);
}
