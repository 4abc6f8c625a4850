use super::runtime::LocalBoxFuture;
use crate::models::{CellId, DocumentV3, InstanceId};
use std::io;
use std::path::Path;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to start evaluation engine: {0}")]
    Spawn(#[source] io::Error),
    #[error("evaluation engine io: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode engine request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("evaluation engine is not running")]
    Closed,
}

/// 进程外求值引擎的接口。请求交出后即返回，进度通过引擎消息回传。
pub trait Evaluator {
    fn install_notebook<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>>;

    fn eval_notebook<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>>;

    fn eval_to_cell<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        cell_id: &'a CellId,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>>;

    fn eval_single_cell<'a>(
        &'a self,
        instance_id: &'a InstanceId,
        notebook: &'a DocumentV3,
        cell_id: &'a CellId,
        containing_path: Option<&'a Path>,
    ) -> LocalBoxFuture<'a, Result<()>>;

    fn stop_evaluation<'a>(&'a self, instance_id: &'a InstanceId) -> LocalBoxFuture<'a, Result<()>>;
}
