use super::runtime::LocalBoxFuture;
use crate::models::{DocumentError, DocumentV3, SerializedNotebook, StorageId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("notebook not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{0} has never been saved")]
    NotPersisted(StorageId),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Clone)]
pub struct LoadedNotebook {
    pub document: SerializedNotebook,
    pub read_only: bool,
}

pub trait NotebookStorage {
    fn read_notebook<'a>(&'a self, id: &'a StorageId) -> LocalBoxFuture<'a, Result<LoadedNotebook>>;

    fn write_notebook<'a>(
        &'a self,
        document: &'a DocumentV3,
        id: &'a StorageId,
    ) -> LocalBoxFuture<'a, Result<()>>;

    fn make_untitled_id(&self) -> StorageId;

    /// 引擎用作笔记本工作目录的路径
    fn containing_dir(&self, id: &StorageId) -> Option<PathBuf>;
}
