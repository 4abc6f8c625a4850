use super::{CommandOutcome, NotebookEditor};
use crate::kernel::protocol::{EngineMessage, EvalEvent, DEFAULT_OUTPUT_CAP};
use crate::kernel::services::ports::EvalResult;
use crate::models::{CellId, DocumentV3, InstanceId, Notebook, NotebookError};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
enum EvalScope<'a> {
    Notebook,
    ToCell(&'a CellId),
    SingleCell(&'a CellId),
}

impl EvalScope<'_> {
    fn cell_id(&self) -> Option<&CellId> {
        match self {
            EvalScope::Notebook => None,
            EvalScope::ToCell(id) | EvalScope::SingleCell(id) => Some(id),
        }
    }
}

enum Prepared {
    ReadOnly,
    Running(InstanceId),
    UnknownCell(CellId),
    Ready {
        instance: InstanceId,
        document: DocumentV3,
        containing: Option<PathBuf>,
    },
}

impl NotebookEditor {
    pub async fn evaluate_notebook(&self) -> CommandOutcome {
        self.evaluate(EvalScope::Notebook).await
    }

    /// 运行到 `cell_id`（含）为止的所有单元
    pub async fn evaluate_to_cell(&self, cell_id: &CellId) -> CommandOutcome {
        self.evaluate(EvalScope::ToCell(cell_id)).await
    }

    pub async fn evaluate_single_cell(&self, cell_id: &CellId) -> CommandOutcome {
        self.evaluate(EvalScope::SingleCell(cell_id)).await
    }

    async fn evaluate(&self, scope: EvalScope<'_>) -> CommandOutcome {
        if self.is_busy() {
            return self.reject_busy("evaluate");
        }

        let Some(prepared) = self.with_notebook_mut(|nb| self.prepare_eval(nb, scope)) else {
            return CommandOutcome::NoNotebook;
        };

        let (instance, document, containing) = match prepared {
            Prepared::ReadOnly => {
                tracing::warn!("evaluation requested on a read-only notebook");
                self.prompter
                    .show_warning("Read-only notebooks cannot be evaluated. Save a copy first.");
                return CommandOutcome::Rejected;
            }
            Prepared::UnknownCell(id) => {
                return self.report_failure("evaluate", &NotebookError::NotFound(id));
            }
            Prepared::Running(instance) => return self.stop_running(instance).await,
            Prepared::Ready {
                instance,
                document,
                containing,
            } => (instance, document, containing),
        };

        if let Err(e) = self
            .dispatch(scope, &instance, &document, containing.as_deref())
            .await
        {
            return self.report_failure("evaluate", &e);
        }

        self.with_notebook_mut(|nb| {
            if nb.instance_id() == &instance {
                nb.notify_code_eval_started();
            }
        });
        tracing::info!(instance_id = %instance, ?scope, "evaluation dispatched");
        CommandOutcome::Done
    }

    fn prepare_eval(&self, nb: &mut Notebook, scope: EvalScope<'_>) -> Prepared {
        if nb.is_read_only() {
            return Prepared::ReadOnly;
        }
        if nb.is_executing() {
            return Prepared::Running(nb.instance_id().clone());
        }
        if let Some(id) = scope.cell_id() {
            if nb.find_cell(id).is_none() {
                return Prepared::UnknownCell(id.clone());
            }
        }
        nb.flush_changes();
        Prepared::Ready {
            instance: nb.instance_id().clone(),
            document: nb.serialize_for_eval(),
            containing: self.storage.containing_dir(nb.storage_id()),
        }
    }

    async fn dispatch(
        &self,
        scope: EvalScope<'_>,
        instance: &InstanceId,
        document: &DocumentV3,
        containing: Option<&std::path::Path>,
    ) -> EvalResult<()> {
        match scope {
            EvalScope::Notebook => {
                self.evaluator
                    .eval_notebook(instance, document, containing)
                    .await
            }
            EvalScope::ToCell(cell_id) => {
                self.evaluator
                    .eval_to_cell(instance, document, cell_id, containing)
                    .await
            }
            EvalScope::SingleCell(cell_id) => {
                self.evaluator
                    .eval_single_cell(instance, document, cell_id, containing)
                    .await
            }
        }
    }

    /// 停止是协作式的：引擎可能仍在运行，模型一律标记为已完成
    async fn stop_running(&self, instance: InstanceId) -> CommandOutcome {
        if let Err(e) = self.evaluator.stop_evaluation(&instance).await {
            tracing::warn!(instance_id = %instance, error = %e, "stop evaluation failed");
        }
        self.with_notebook_mut(|nb| {
            if nb.instance_id() == &instance {
                nb.notify_code_eval_complete();
            }
        });
        tracing::info!(instance_id = %instance, "evaluation stopped");
        CommandOutcome::Stopped
    }

    /// 把一条引擎事件应用到当前笔记本；无法路由的事件记日志后丢弃
    pub fn handle_engine_message(&self, message: EngineMessage) {
        let tag = message.event.tag();
        let warning = {
            let Ok(mut slot) = self.notebook.try_borrow_mut() else {
                tracing::warn!(event = tag, "engine message while notebook is borrowed, dropped");
                return;
            };
            let Some(nb) = slot.as_mut() else {
                tracing::debug!(event = tag, "engine message without an open notebook");
                return;
            };
            if let Some(instance) = &message.instance_id {
                if instance != nb.instance_id() {
                    tracing::debug!(event = tag, instance_id = %instance, "engine message for another notebook");
                    return;
                }
            }
            route_event(nb, message.event)
        };

        if let Some(warning) = warning {
            self.prompter.show_warning(&warning);
        }
    }
}

/// 事件需要提示用户时返回警告文本
fn route_event(nb: &mut Notebook, event: EvalEvent) -> Option<String> {
    match event {
        EvalEvent::CellEvalStarted { cell_id } => match nb.cell_mut(&cell_id) {
            Some(mut cell) => cell.notify_eval_started(),
            None => tracing::error!(cell_id = %cell_id, "eval started for unknown cell"),
        },
        EvalEvent::CellEvalCompleted { cell_id } => match nb.cell_mut(&cell_id) {
            Some(mut cell) => cell.notify_eval_completed(),
            None => tracing::error!(cell_id = %cell_id, "eval completed for unknown cell"),
        },
        EvalEvent::NotebookEvalCompleted => nb.notify_code_eval_complete(),
        EvalEvent::OutputCapped { limit } => {
            let limit = limit.unwrap_or(DEFAULT_OUTPUT_CAP);
            tracing::warn!(limit, "engine output capped");
            return Some(format!(
                "Output limit reached: only the first {limit} items are shown."
            ));
        }
        EvalEvent::ReceiveDisplay { outputs } => {
            for item in outputs {
                match nb.cell_mut(&item.cell_id) {
                    Some(mut cell) => {
                        if !cell.push_output(item.output) {
                            tracing::warn!(cell_id = %item.cell_id, "display output for a markdown cell");
                        }
                    }
                    None => tracing::error!(cell_id = %item.cell_id, "display output for unknown cell"),
                }
            }
        }
        EvalEvent::ReceiveError { cell_id, error } => {
            let target = cell_id
                .filter(|id| nb.find_cell(id).is_some_and(|cell| cell.is_code()))
                .or_else(|| nb.first_code_cell().map(|cell| cell.id().clone()));
            match target {
                Some(id) => {
                    if let Some(mut cell) = nb.cell_mut(&id) {
                        if !cell.push_error(error) {
                            tracing::warn!(cell_id = %id, "evaluation error for a markdown cell");
                        }
                    }
                }
                None => tracing::error!(msg = %error.msg, "unrouted evaluation error"),
            }
        }
    }
    None
}
