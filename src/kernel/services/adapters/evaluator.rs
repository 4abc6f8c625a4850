//! 求值引擎进程
//!
//! 每个请求编码为一行 JSON 写入 stdin；stdout 的每一行解析为
//! `EngineMessage` 后转发到 `events` 通道。stderr 只写日志。

use crate::kernel::protocol::{EngineMessage, EvalRequest};
use crate::kernel::services::ports::evaluator::{EvalError, Evaluator, Result};
use crate::kernel::services::ports::runtime::LocalBoxFuture;
use crate::models::{CellId, DocumentV3, InstanceId};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub struct ProcessEvaluator {
    out_tx: UnboundedSender<Vec<u8>>,
}

impl ProcessEvaluator {
    /// 必须在 tokio 运行时内调用
    pub fn spawn(command: &[String], events: UnboundedSender<EngineMessage>) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| {
            EvalError::Spawn(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty engine command",
            ))
        })?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(EvalError::Spawn)?;
        let stdin = child.stdin.take().ok_or(EvalError::Closed)?;
        let stdout = child.stdout.take().ok_or(EvalError::Closed)?;
        let stderr = child.stderr.take().ok_or(EvalError::Closed)?;

        tracing::info!(program = %program, pid = ?child.id(), "evaluation engine started");

        let (out_tx, out_rx) = unbounded_channel::<Vec<u8>>();
        tokio::spawn(writer_loop(stdin, out_rx));
        tokio::spawn(reader_loop(child, stdout, events));
        tokio::spawn(stderr_loop(stderr));

        Ok(Self { out_tx })
    }

    fn send(&self, request: &EvalRequest<'_>) -> Result<()> {
        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');
        self.out_tx.send(line).map_err(|_| EvalError::Closed)
    }

    fn dispatch<'a>(&'a self, request: EvalRequest<'a>) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move { self.send(&request) })
    }
}

async fn writer_loop<W: AsyncWrite + Unpin>(mut stdin: W, mut rx: UnboundedReceiver<Vec<u8>>) {
    while let Some(line) = rx.recv().await {
        if let Err(e) = stdin.write_all(&line).await {
            tracing::warn!(error = %e, "engine stdin closed");
            break;
        }
        if let Err(e) = stdin.flush().await {
            tracing::warn!(error = %e, "engine stdin flush failed");
            break;
        }
    }
    tracing::debug!("engine writer loop ended");
}

async fn reader_loop(
    mut child: tokio::process::Child,
    stdout: tokio::process::ChildStdout,
    events: UnboundedSender<EngineMessage>,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<EngineMessage>(&line) {
                    Ok(message) => {
                        if events.send(message).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "invalid engine message"),
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "engine read error");
                break;
            }
        }
    }

    let _ = child.kill().await;
    match child.wait().await {
        Ok(status) => tracing::info!(%status, "evaluation engine exited"),
        Err(e) => tracing::warn!(error = %e, "evaluation engine wait failed"),
    }
}

async fn stderr_loop(stderr: tokio::process::ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::info!(target: "zbook::engine", "{line}");
    }
}

impl Evaluator for ProcessEvaluator {
    fn install_notebook<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.dispatch(EvalRequest::InstallNotebook {
            instance_id,
            notebook,
            containing_path,
        })
    }

    fn eval_notebook<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.dispatch(EvalRequest::EvalNotebook {
            instance_id,
            notebook,
            containing_path,
        })
    }

    fn eval_to_cell<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        cell_id: &'a CellId,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.dispatch(EvalRequest::EvalToCell {
            instance_id,
            notebook,
            cell_id,
            containing_path,
        })
    }

    fn eval_single_cell<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        cell_id: &'a CellId,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.dispatch(EvalRequest::EvalSingleCell {
            instance_id,
            notebook,
            cell_id,
            containing_path,
        })
    }

    fn stop_evaluation<'a>(&'a self, instance_id: &'a InstanceId) -> LocalBoxFuture<'a, Result<()>> {
        self.dispatch(EvalRequest::StopEvaluation { instance_id })
    }
}

/// 未配置引擎时的替身：接受请求后直接丢弃
#[derive(Debug, Default)]
pub struct NullEvaluator;

impl NullEvaluator {
    fn accept<'a>(&'a self, what: &'static str) -> LocalBoxFuture<'a, Result<()>> {
        tracing::debug!(request = what, "no evaluation engine configured");
        Box::pin(async { Ok(()) })
    }
}

impl Evaluator for NullEvaluator {
    fn install_notebook<'a>(
        &'a self,
        _instance_id: &'a InstanceId,
        _notebook: &'a DocumentV3,
        _containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.accept("install-notebook")
    }

    fn eval_notebook<'a>(
        &'a self,
        _instance_id: &'a InstanceId,
        _notebook: &'a DocumentV3,
        _containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.accept("eval-notebook")
    }

    fn eval_to_cell<'a>(
        &'a self,
        _instance_id: &'a InstanceId,
        _notebook: &'a DocumentV3,
        _cell_id: &'a CellId,
        _containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.accept("eval-to-cell")
    }

    fn eval_single_cell<'a>(
        &'a self,
        _instance_id: &'a InstanceId,
        _notebook: &'a DocumentV3,
        _cell_id: &'a CellId,
        _containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.accept("eval-single-cell")
    }

    fn stop_evaluation<'a>(&'a self, _instance_id: &'a InstanceId) -> LocalBoxFuture<'a, Result<()>> {
        self.accept("stop-evaluation")
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/evaluator.rs"]
mod tests;
