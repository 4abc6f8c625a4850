//! Service ports: traits + data contracts.

pub mod evaluator;
pub mod prompter;
pub mod runtime;
pub mod settings;
pub mod storage;

pub use evaluator::{EvalError, Evaluator, Result as EvalResult};
pub use prompter::{Prompter, SaveChoice};
pub use runtime::LocalBoxFuture;
pub use settings::{NotebookSettings, DEFAULT_NODEJS_VERSION};
pub use storage::{LoadedNotebook, NotebookStorage, Result as StorageResult, StorageError};
