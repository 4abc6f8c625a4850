use super::{CommandOutcome, NotebookEditor};
use crate::kernel::services::ports::SaveChoice;
use crate::models::{Cell, Notebook, NotebookError, SaveTicket, StorageId};

enum SaveRoute {
    Save(SaveTicket),
    SaveAs(StorageId),
    Refused(NotebookError),
}

impl NotebookEditor {
    pub async fn new_notebook(&self) -> CommandOutcome {
        if self.is_busy() {
            return self.reject_busy("new");
        }
        let _working = self.working.start();

        if !self.confirm_discard().await {
            return CommandOutcome::Cancelled;
        }

        let notebook = Notebook::new(
            self.storage.make_untitled_id(),
            self.settings.default_language.as_str(),
            vec![Cell::new_code("")],
            self.settings.default_nodejs_version.as_str(),
        )
        .with_unsaved(true);
        self.set_notebook(notebook, false).await;
        CommandOutcome::Done
    }

    /// 让用户选择要打开的笔记本
    pub async fn open_notebook(&self) -> CommandOutcome {
        if self.is_busy() {
            return self.reject_busy("open");
        }
        let _working = self.working.start();

        if !self.confirm_discard().await {
            return CommandOutcome::Cancelled;
        }
        let Some(id) = self.prompter.pick_open_id().await else {
            return CommandOutcome::Cancelled;
        };
        self.load_and_bind(id, false).await
    }

    pub async fn open_specific(&self, id: StorageId) -> CommandOutcome {
        if self.is_busy() {
            return self.reject_busy("open");
        }
        let _working = self.working.start();

        if !self.confirm_discard().await {
            return CommandOutcome::Cancelled;
        }
        self.load_and_bind(id, false).await
    }

    /// 原地保存；从未保存或只读的笔记本改走另存为
    pub async fn save_notebook(&self) -> CommandOutcome {
        if self.is_busy() {
            return self.reject_busy("save");
        }
        let _working = self.working.start();
        self.save_current(false).await
    }

    pub async fn save_notebook_as(&self) -> CommandOutcome {
        if self.is_busy() {
            return self.reject_busy("save as");
        }
        let _working = self.working.start();
        self.save_current(true).await
    }

    /// 从存储重新读取当前笔记本
    pub async fn reload_notebook(&self) -> CommandOutcome {
        if self.is_busy() {
            return self.reject_busy("reload");
        }
        let _working = self.working.start();

        let Some(id) = self.with_notebook(|nb| nb.storage_id().clone()) else {
            return CommandOutcome::NoNotebook;
        };
        if id.is_untitled() {
            tracing::warn!(storage_id = %id, "reload of a never-saved notebook");
            self.prompter
                .show_warning(&format!("{} has never been saved.", id.display_name()));
            return CommandOutcome::Rejected;
        }
        if !self.confirm_discard().await {
            return CommandOutcome::Cancelled;
        }
        self.load_and_bind(id, true).await
    }

    pub fn clear_outputs(&self) -> CommandOutcome {
        match self.with_notebook_mut(|nb| nb.clear_outputs()) {
            Some(_) => CommandOutcome::Done,
            None => CommandOutcome::NoNotebook,
        }
    }

    /// 编辑器关闭前给用户保存的机会。
    /// 返回 `Done` 表示可以关闭。
    pub async fn confirm_close(&self) -> CommandOutcome {
        if self.confirm_discard().await {
            CommandOutcome::Done
        } else {
            CommandOutcome::Cancelled
        }
    }

    /// 当前笔记本可以丢弃时返回 `true`：没有打开的笔记本、没有修改、
    /// 用户选择放弃，或用户保存成功。
    async fn confirm_discard(&self) -> bool {
        let Some(Some(name)) = self.with_notebook(|nb| {
            nb.is_modified().then(|| nb.storage_id().display_name())
        }) else {
            return true;
        };

        match self.prompter.confirm_save(&name).await {
            SaveChoice::Save => self.save_current(false).await == CommandOutcome::Done,
            SaveChoice::Discard => true,
            SaveChoice::Cancel => false,
        }
    }

    async fn save_current(&self, force_save_as: bool) -> CommandOutcome {
        let Some((instance, route)) = self.with_notebook_mut(|nb| {
            let route = if force_save_as {
                SaveRoute::SaveAs(nb.storage_id().clone())
            } else {
                match nb.prepare_save() {
                    Ok(ticket) => SaveRoute::Save(ticket),
                    Err(NotebookError::NeverSaved | NotebookError::ReadOnlyViolation) => {
                        SaveRoute::SaveAs(nb.storage_id().clone())
                    }
                    Err(e) => SaveRoute::Refused(e),
                }
            };
            (nb.instance_id().clone(), route)
        }) else {
            return CommandOutcome::NoNotebook;
        };

        let (ticket, save_as) = match route {
            SaveRoute::Save(ticket) => (ticket, false),
            SaveRoute::Refused(e) => return self.report_failure("save", &e),
            SaveRoute::SaveAs(current) => {
                let Some(target) = self.prompter.pick_save_as_id(&current).await else {
                    return CommandOutcome::Cancelled;
                };
                match self.with_notebook_mut(|nb| nb.prepare_save_as(target)) {
                    Some(ticket) => (ticket, true),
                    None => return CommandOutcome::NoNotebook,
                }
            }
        };

        if let Err(e) = self
            .storage
            .write_notebook(ticket.document(), ticket.storage_id())
            .await
        {
            return self.report_failure("save", &e);
        }

        let committed = self.with_notebook_mut(|nb| {
            if nb.instance_id() != &instance {
                return false;
            }
            if save_as {
                nb.commit_save_as(&ticket);
            } else {
                nb.commit_save(&ticket);
            }
            true
        });
        if committed != Some(true) {
            tracing::warn!(storage_id = %ticket.storage_id(), "notebook replaced while saving");
        }
        tracing::info!(storage_id = %ticket.storage_id(), save_as, "notebook saved");
        CommandOutcome::Done
    }

    /// 读取 `id` 并绑定；失败时保留当前笔记本不变
    async fn load_and_bind(&self, id: StorageId, is_reload: bool) -> CommandOutcome {
        let loaded = match self.storage.read_notebook(&id).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::debug!(storage_id = %id, is_reload, "read notebook failed");
                return self.report_failure(if is_reload { "reload" } else { "open" }, &e);
            }
        };

        let notebook = Notebook::deserialize(
            id,
            false,
            loaded.read_only,
            self.settings.default_nodejs_version.as_str(),
            loaded.document,
        );
        self.set_notebook(notebook, is_reload).await;
        CommandOutcome::Done
    }
}
