//! 笔记本编辑器：单个打开笔记本的编排层
//!
//! - 同一时刻最多持有一个 [`Notebook`]
//! - 新建/打开/保存/重载由忙碌计数器互斥
//! - 存储、求值引擎、用户提示均以 trait 对象注入
//!
//! 所有 `await` 之前都会先释放对笔记本的借用；
//! 事件处理函数里再访问编辑器时，借用冲突会得到 `None` 而不是 panic。

mod commands;
mod eval;

use crate::core::{Emitter, Subscription};
use crate::kernel::services::ports::{Evaluator, NotebookSettings, NotebookStorage, Prompter};
use crate::kernel::working::WorkingCounter;
use crate::models::{InstanceId, Notebook};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// 另一个会替换笔记本的命令正在执行
    Busy,
    /// 用户在对话框中取消
    Cancelled,
    NoNotebook,
    /// 当前笔记本不允许该命令（只读、从未保存）
    Rejected,
    Failed,
    /// 停止了进行中的求值，而不是开始新的求值
    Stopped,
}

#[derive(Debug, Default)]
pub struct EditorEvents {
    pub will_change: Emitter<()>,
    /// 参数为 `is_reload`
    pub changed: Emitter<bool>,
    pub rendered: Emitter<()>,
    pub modified_changed: Emitter<bool>,
    pub busy_changed: Emitter<bool>,
}

pub struct NotebookEditor {
    storage: Rc<dyn NotebookStorage>,
    evaluator: Rc<dyn Evaluator>,
    prompter: Rc<dyn Prompter>,
    settings: NotebookSettings,
    notebook: RefCell<Option<Notebook>>,
    forwarding: Cell<Option<Subscription>>,
    working: WorkingCounter,
    events: EditorEvents,
}

impl NotebookEditor {
    pub fn new(
        storage: Rc<dyn NotebookStorage>,
        evaluator: Rc<dyn Evaluator>,
        prompter: Rc<dyn Prompter>,
        settings: NotebookSettings,
    ) -> Self {
        let events = EditorEvents::default();
        let working = WorkingCounter::new(events.busy_changed.clone());
        Self {
            storage,
            evaluator,
            prompter,
            settings,
            notebook: RefCell::new(None),
            forwarding: Cell::new(None),
            working,
            events,
        }
    }

    pub fn events(&self) -> &EditorEvents {
        &self.events
    }

    pub fn settings(&self) -> &NotebookSettings {
        &self.settings
    }

    pub fn is_busy(&self) -> bool {
        self.working.is_busy()
    }

    pub fn has_notebook(&self) -> bool {
        self.with_notebook(|_| ()).is_some()
    }

    pub fn instance_id(&self) -> Option<InstanceId> {
        self.with_notebook(|nb| nb.instance_id().clone())
    }

    /// 只读访问当前笔记本。没有打开的笔记本或调用栈上层已可变借用时返回 `None`。
    pub fn with_notebook<R>(&self, f: impl FnOnce(&Notebook) -> R) -> Option<R> {
        let slot = self.notebook.try_borrow().ok()?;
        slot.as_ref().map(f)
    }

    pub fn with_notebook_mut<R>(&self, f: impl FnOnce(&mut Notebook) -> R) -> Option<R> {
        let mut slot = self.notebook.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    }

    /// 替换当前笔记本
    ///
    /// 旧笔记本解绑并停止之前触发 `will_change`；
    /// 新笔记本安装到求值引擎之后触发 `changed` 和 `rendered`。
    pub async fn set_notebook(&self, notebook: Notebook, is_reload: bool) {
        self.events.will_change.emit(&());

        let previous = self.notebook.borrow_mut().take();
        if let Some(old) = previous {
            if let Some(subscription) = self.forwarding.take() {
                old.events().modified_changed.unsubscribe(subscription);
            }
            if let Err(e) = self.evaluator.stop_evaluation(old.instance_id()).await {
                tracing::warn!(
                    instance_id = %old.instance_id(),
                    error = %e,
                    "stop evaluation for closed notebook failed"
                );
            }
        }

        let document = notebook.serialize_for_eval();
        let containing = self.storage.containing_dir(notebook.storage_id());
        if let Err(e) = self
            .evaluator
            .install_notebook(notebook.instance_id(), &document, containing.as_deref())
            .await
        {
            tracing::error!(
                instance_id = %notebook.instance_id(),
                error = %e,
                "install notebook with evaluation engine failed"
            );
        }

        let forward = self.events.modified_changed.clone();
        let subscription = notebook
            .events()
            .modified_changed
            .subscribe(move |modified| forward.emit(modified));
        self.forwarding.set(Some(subscription));

        tracing::info!(
            storage_id = %notebook.storage_id(),
            instance_id = %notebook.instance_id(),
            cells = notebook.len(),
            is_reload,
            "notebook bound"
        );
        *self.notebook.borrow_mut() = Some(notebook);

        self.events.changed.emit(&is_reload);
        self.events.rendered.emit(&());
    }

    fn reject_busy(&self, command: &str) -> CommandOutcome {
        tracing::warn!(command, "editor busy, command ignored");
        self.prompter
            .show_warning("Another notebook operation is still in progress.");
        CommandOutcome::Busy
    }

    fn report_failure(&self, action: &str, error: &dyn std::error::Error) -> CommandOutcome {
        tracing::error!(action, error = %error, "notebook command failed");
        self.prompter
            .show_error(&format!("Failed to {action} notebook: {error}"));
        CommandOutcome::Failed
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/notebook_editor.rs"]
mod tests;
