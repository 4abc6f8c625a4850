//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod app_dirs;
pub mod evaluator;
pub mod prompter;
pub mod settings;
pub mod storage;

pub use app_dirs::{ensure_log_dir, get_log_dir};
pub use evaluator::{NullEvaluator, ProcessEvaluator};
pub use prompter::{HeadlessPrompter, Notice};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
pub use storage::LocalNotebookStorage;
