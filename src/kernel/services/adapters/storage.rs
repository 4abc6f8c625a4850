//! 本地文件系统存储
//!
//! StorageId::Path 直接对应磁盘上的 JSON 文件；
//! StorageId::Untitled 只存在于内存，无法读写。

use crate::kernel::services::ports::runtime::LocalBoxFuture;
use crate::kernel::services::ports::storage::{
    LoadedNotebook, NotebookStorage, Result, StorageError,
};
use crate::models::{DocumentV3, SerializedNotebook, StorageId};
use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};

pub struct LocalNotebookStorage {
    next_untitled: Cell<u32>,
    pretty: bool,
}

impl LocalNotebookStorage {
    pub fn new(pretty: bool) -> Self {
        Self {
            next_untitled: Cell::new(1),
            pretty,
        }
    }
}

impl Default for LocalNotebookStorage {
    fn default() -> Self {
        Self::new(true)
    }
}

fn io_error(path: &Path, source: io::Error) -> StorageError {
    if source.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(path.to_path_buf())
    } else {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

async fn read_from_path(path: &Path) -> Result<LoadedNotebook> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;
    let document = SerializedNotebook::from_json(&text)?;
    tracing::debug!(
        path = %path.display(),
        version = document.version(),
        "notebook read"
    );
    Ok(LoadedNotebook {
        document,
        read_only: metadata.permissions().readonly(),
    })
}

async fn write_to_path(path: &Path, document: &DocumentV3, pretty: bool) -> Result<()> {
    let content = document.to_json(pretty)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| io_error(path, e))?;
    tracing::debug!(path = %path.display(), cells = document.cells.len(), "notebook written");
    Ok(())
}

impl NotebookStorage for LocalNotebookStorage {
    fn read_notebook<'a>(&'a self, id: &'a StorageId) -> LocalBoxFuture<'a, Result<LoadedNotebook>> {
        Box::pin(async move {
            match id {
                StorageId::Path(path) => read_from_path(path).await,
                StorageId::Untitled(_) => Err(StorageError::NotPersisted(id.clone())),
            }
        })
    }

    fn write_notebook<'a>(
        &'a self,
        document: &'a DocumentV3,
        id: &'a StorageId,
    ) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match id {
                StorageId::Path(path) => write_to_path(path, document, self.pretty).await,
                StorageId::Untitled(_) => Err(StorageError::NotPersisted(id.clone())),
            }
        })
    }

    fn make_untitled_id(&self) -> StorageId {
        let n = self.next_untitled.get();
        self.next_untitled.set(n + 1);
        StorageId::untitled(n)
    }

    fn containing_dir(&self, id: &StorageId) -> Option<PathBuf> {
        id.as_path()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/storage.rs"]
mod tests;
